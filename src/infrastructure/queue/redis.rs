// src/infrastructure/queue/redis.rs
use super::{BASE_BACKOFF, MAX_ATTEMPTS, backoff_for_attempt};
use crate::application::{
    ApplicationResult,
    dto::jobs::{JobState, JobStatusDto, PublishOutcome},
    error::ApplicationError,
    ports::queue::{
        ClaimedJob, EnqueueOptions, PRIORITY_HIGH, PRIORITY_LOW, PublishJobPayload, PublishQueue,
        RetryDecision,
    },
};
use async_trait::async_trait;
use chrono::Utc;
use deadpool_redis::{Config as DeadpoolConfig, Connection, Pool, Runtime};
use std::collections::HashMap;
use uuid::Uuid;

const JOB_KEY_PREFIX: &str = "publish:job:";
const DELAYED_KEY: &str = "publish:delayed";
const COMPLETED_KEY: &str = "publish:completed";
const FAILED_KEY: &str = "publish:failed";

// Retention: completed jobs are pruned aggressively, failed jobs are kept
// around longer for postmortem.
const COMPLETED_MAX_COUNT: i64 = 100;
const COMPLETED_MAX_AGE_SECS: i64 = 24 * 3600;
const FAILED_MAX_COUNT: i64 = 1_000;
const FAILED_MAX_AGE_SECS: i64 = 7 * 24 * 3600;

const PROMOTE_BATCH: usize = 32;

// Removes members of a terminal-state zset that are past the age cutoff or
// beyond the count cap, deleting their job hashes along the way.
const TRIM_SCRIPT: &str = r#"
    local ids = redis.call('ZRANGEBYSCORE', KEYS[1], 0, ARGV[1])
    local total = redis.call('ZCARD', KEYS[1])
    local max = tonumber(ARGV[2])
    if total > max then
        local overflow = redis.call('ZRANGE', KEYS[1], 0, total - max - 1)
        for i = 1, #overflow do
            ids[#ids + 1] = overflow[i]
        end
    end
    for i = 1, #ids do
        redis.call('ZREM', KEYS[1], ids[i])
        redis.call('DEL', ARGV[3] .. ids[i])
    end
    return #ids
"#;

fn job_key(job_id: &str) -> String {
    format!("{JOB_KEY_PREFIX}{job_id}")
}

fn ready_key(priority: u8) -> String {
    format!("publish:ready:{priority}")
}

fn map_redis(err: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::infrastructure(err.to_string())
}

/// Redis-backed publish queue: a hash per job, one ready list per
/// priority, a delayed zset scored by due time, and completed/failed
/// zsets driving retention. Jobs survive process restarts; a list pop is
/// the claim, so each job is delivered to exactly one worker at a time.
#[derive(Clone)]
pub struct RedisPublishQueue {
    pool: Pool,
}

impl RedisPublishQueue {
    /// Create a queue from a redis URL (e.g. redis://:password@host:6379/0).
    pub fn from_url(url: &str) -> Result<Self, ApplicationError> {
        let cfg = DeadpoolConfig::from_url(url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        Ok(Self { pool })
    }

    async fn conn(&self) -> ApplicationResult<Connection> {
        self.pool.get().await.map_err(map_redis)
    }

    /// Move delayed jobs whose due time has passed onto their ready list.
    /// The ZREM is the ownership guard: only the connection that removes
    /// a member pushes it, so two promoting workers cannot duplicate it.
    async fn promote_due(&self, conn: &mut Connection) -> ApplicationResult<()> {
        let now_ms = Utc::now().timestamp_millis();
        let due: Vec<String> = redis::cmd("ZRANGEBYSCORE")
            .arg(DELAYED_KEY)
            .arg(0)
            .arg(now_ms)
            .arg("LIMIT")
            .arg(0)
            .arg(PROMOTE_BATCH)
            .query_async(conn)
            .await
            .map_err(map_redis)?;

        for id in due {
            let removed: i64 = redis::cmd("ZREM")
                .arg(DELAYED_KEY)
                .arg(&id)
                .query_async(conn)
                .await
                .map_err(map_redis)?;
            if removed == 0 {
                continue;
            }
            let priority: Option<u8> = redis::cmd("HGET")
                .arg(job_key(&id))
                .arg("priority")
                .query_async(conn)
                .await
                .map_err(map_redis)?;
            let priority = priority.unwrap_or(PRIORITY_HIGH).clamp(PRIORITY_HIGH, PRIORITY_LOW);
            let _: () = redis::cmd("RPUSH")
                .arg(ready_key(priority))
                .arg(&id)
                .query_async(conn)
                .await
                .map_err(map_redis)?;
        }

        Ok(())
    }

    async fn record_terminal(
        &self,
        conn: &mut Connection,
        job_id: &str,
        zset: &str,
        max_age_secs: i64,
        max_count: i64,
    ) -> ApplicationResult<()> {
        let now_ms = Utc::now().timestamp_millis();
        let _: () = redis::cmd("EXPIRE")
            .arg(job_key(job_id))
            .arg(max_age_secs)
            .query_async(conn)
            .await
            .map_err(map_redis)?;
        let _: () = redis::cmd("ZADD")
            .arg(zset)
            .arg(now_ms)
            .arg(job_id)
            .query_async(conn)
            .await
            .map_err(map_redis)?;

        let cutoff_ms = now_ms - max_age_secs * 1_000;
        let _trimmed: i64 = redis::cmd("EVAL")
            .arg(TRIM_SCRIPT)
            .arg(1)
            .arg(zset)
            .arg(cutoff_ms)
            .arg(max_count)
            .arg(JOB_KEY_PREFIX)
            .query_async(conn)
            .await
            .map_err(map_redis)?;

        Ok(())
    }
}

#[async_trait]
impl PublishQueue for RedisPublishQueue {
    async fn enqueue(
        &self,
        payload: PublishJobPayload,
        options: EnqueueOptions,
    ) -> ApplicationResult<String> {
        // An unreachable broker triggers the synchronous fallback, same
        // as no broker at all.
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(err) => return Err(ApplicationError::queue_unavailable(err.to_string())),
        };

        let job_id = Uuid::new_v4().to_string();
        let priority = options.priority.clamp(PRIORITY_HIGH, PRIORITY_LOW);
        let payload_json =
            serde_json::to_string(&payload).map_err(|err| map_redis(err.to_string()))?;
        let now = Utc::now();

        let _: () = redis::cmd("HSET")
            .arg(job_key(&job_id))
            .arg("payload")
            .arg(&payload_json)
            .arg("status")
            .arg(JobState::Pending.as_str())
            .arg("attempts")
            .arg(0)
            .arg("max_attempts")
            .arg(MAX_ATTEMPTS)
            .arg("priority")
            .arg(priority)
            .arg("enqueued_at")
            .arg(now.to_rfc3339())
            .arg("updated_at")
            .arg(now.to_rfc3339())
            .query_async(&mut conn)
            .await
            .map_err(map_redis)?;

        match options.delay {
            Some(delay) if !delay.is_zero() => {
                let due_ms = now.timestamp_millis() + delay.as_millis() as i64;
                let _: () = redis::cmd("ZADD")
                    .arg(DELAYED_KEY)
                    .arg(due_ms)
                    .arg(&job_id)
                    .query_async(&mut conn)
                    .await
                    .map_err(map_redis)?;
            }
            _ => {
                let _: () = redis::cmd("RPUSH")
                    .arg(ready_key(priority))
                    .arg(&job_id)
                    .query_async(&mut conn)
                    .await
                    .map_err(map_redis)?;
            }
        }

        Ok(job_id)
    }

    async fn status(&self, job_id: &str) -> ApplicationResult<Option<JobStatusDto>> {
        let mut conn = self.conn().await?;
        let fields: HashMap<String, String> = redis::cmd("HGETALL")
            .arg(job_key(job_id))
            .query_async(&mut conn)
            .await
            .map_err(map_redis)?;

        if fields.is_empty() {
            return Ok(None);
        }

        let status = fields
            .get("status")
            .and_then(|s| s.parse::<JobState>().ok())
            .unwrap_or(JobState::Pending);
        let attempts = fields
            .get("attempts")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(0);
        let result = fields
            .get("result")
            .and_then(|raw| serde_json::from_str::<PublishOutcome>(raw).ok());
        let error = fields.get("error").cloned();

        Ok(Some(JobStatusDto {
            id: job_id.to_string(),
            status,
            attempts,
            result,
            error,
        }))
    }

    async fn claim_next(&self) -> ApplicationResult<Option<ClaimedJob>> {
        let mut conn = self.conn().await?;
        self.promote_due(&mut conn).await?;

        for priority in PRIORITY_HIGH..=PRIORITY_LOW {
            let claimed: Option<String> = redis::cmd("LPOP")
                .arg(ready_key(priority))
                .query_async(&mut conn)
                .await
                .map_err(map_redis)?;
            let Some(job_id) = claimed else {
                continue;
            };

            // The pop made this worker the exclusive owner; the rest is
            // bookkeeping on the job hash.
            let attempts: i64 = redis::cmd("HINCRBY")
                .arg(job_key(&job_id))
                .arg("attempts")
                .arg(1)
                .query_async(&mut conn)
                .await
                .map_err(map_redis)?;
            let _: () = redis::cmd("HSET")
                .arg(job_key(&job_id))
                .arg("status")
                .arg(JobState::Processing.as_str())
                .arg("updated_at")
                .arg(Utc::now().to_rfc3339())
                .query_async(&mut conn)
                .await
                .map_err(map_redis)?;

            let (payload_json, max_attempts): (Option<String>, Option<u32>) =
                redis::cmd("HMGET")
                    .arg(job_key(&job_id))
                    .arg("payload")
                    .arg("max_attempts")
                    .query_async(&mut conn)
                    .await
                    .map_err(map_redis)?;

            let Some(payload_json) = payload_json else {
                tracing::warn!(job_id = %job_id, "claimed job has no payload, skipping");
                continue;
            };
            let payload: PublishJobPayload = serde_json::from_str(&payload_json)
                .map_err(|err| map_redis(err.to_string()))?;

            return Ok(Some(ClaimedJob {
                id: job_id,
                payload,
                attempt: attempts as u32,
                max_attempts: max_attempts.unwrap_or(MAX_ATTEMPTS),
            }));
        }

        Ok(None)
    }

    async fn complete(&self, job_id: &str, outcome: PublishOutcome) -> ApplicationResult<()> {
        let mut conn = self.conn().await?;
        let result_json =
            serde_json::to_string(&outcome).map_err(|err| map_redis(err.to_string()))?;
        let _: () = redis::cmd("HSET")
            .arg(job_key(job_id))
            .arg("status")
            .arg(JobState::Completed.as_str())
            .arg("result")
            .arg(result_json)
            .arg("updated_at")
            .arg(Utc::now().to_rfc3339())
            .query_async(&mut conn)
            .await
            .map_err(map_redis)?;

        self.record_terminal(
            &mut conn,
            job_id,
            COMPLETED_KEY,
            COMPLETED_MAX_AGE_SECS,
            COMPLETED_MAX_COUNT,
        )
        .await
    }

    async fn retry_or_fail(
        &self,
        job: &ClaimedJob,
        reason: &str,
    ) -> ApplicationResult<RetryDecision> {
        if job.attempt >= job.max_attempts {
            self.fail(&job.id, reason).await?;
            return Ok(RetryDecision::Exhausted);
        }

        let mut conn = self.conn().await?;
        let delay = backoff_for_attempt(job.attempt, BASE_BACKOFF);
        let due_ms = Utc::now().timestamp_millis() + delay.as_millis() as i64;

        let _: () = redis::cmd("HSET")
            .arg(job_key(&job.id))
            .arg("status")
            .arg(JobState::Pending.as_str())
            .arg("error")
            .arg(reason)
            .arg("updated_at")
            .arg(Utc::now().to_rfc3339())
            .query_async(&mut conn)
            .await
            .map_err(map_redis)?;
        let _: () = redis::cmd("ZADD")
            .arg(DELAYED_KEY)
            .arg(due_ms)
            .arg(&job.id)
            .query_async(&mut conn)
            .await
            .map_err(map_redis)?;

        Ok(RetryDecision::Retried { delay })
    }

    async fn fail(&self, job_id: &str, reason: &str) -> ApplicationResult<()> {
        let mut conn = self.conn().await?;
        let _: () = redis::cmd("HSET")
            .arg(job_key(job_id))
            .arg("status")
            .arg(JobState::Failed.as_str())
            .arg("error")
            .arg(reason)
            .arg("updated_at")
            .arg(Utc::now().to_rfc3339())
            .query_async(&mut conn)
            .await
            .map_err(map_redis)?;

        self.record_terminal(
            &mut conn,
            job_id,
            FAILED_KEY,
            FAILED_MAX_AGE_SECS,
            FAILED_MAX_COUNT,
        )
        .await
    }

    async fn close(&self) -> ApplicationResult<()> {
        self.pool.close();
        Ok(())
    }
}
