// src/application/ports/queue.rs
use crate::application::{
    ApplicationResult,
    dto::jobs::{JobStatusDto, PublishOutcome},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Highest priority. Lower numbers are served first.
pub const PRIORITY_HIGH: u8 = 1;
pub const PRIORITY_LOW: u8 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishJobPayload {
    pub article_id: i64,
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy)]
pub struct EnqueueOptions {
    pub priority: u8,
    pub delay: Option<Duration>,
}

impl Default for EnqueueOptions {
    fn default() -> Self {
        Self {
            priority: PRIORITY_HIGH,
            delay: None,
        }
    }
}

/// A job leased to exactly one worker. `attempt` counts this delivery.
#[derive(Debug, Clone)]
pub struct ClaimedJob {
    pub id: String,
    pub payload: PublishJobPayload,
    pub attempt: u32,
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// The job was re-queued with the given backoff delay.
    Retried { delay: Duration },
    /// The attempt cap is exhausted; the job is now failed.
    Exhausted,
}

/// Durable hand-off between the request path and the publish worker.
///
/// FIFO holds within a single priority; jobs for different articles are
/// independent and may be claimed concurrently by multiple workers.
#[async_trait]
pub trait PublishQueue: Send + Sync {
    /// Returns the queue-assigned job id, or `QueueUnavailable` when no
    /// broker is configured or reachable (callers fall back to the
    /// synchronous publish path).
    async fn enqueue(
        &self,
        payload: PublishJobPayload,
        options: EnqueueOptions,
    ) -> ApplicationResult<String>;

    /// `Ok(None)` when the job is unknown or already reaped by retention
    /// policy. Never an error for an absent id.
    async fn status(&self, job_id: &str) -> ApplicationResult<Option<JobStatusDto>>;

    /// Claim the next due job, if any. Promotes delayed jobs whose time
    /// has come before popping the highest-priority ready list.
    async fn claim_next(&self) -> ApplicationResult<Option<ClaimedJob>>;

    async fn complete(&self, job_id: &str, outcome: PublishOutcome) -> ApplicationResult<()>;

    /// Re-queue a claimed job with exponential backoff, or mark it failed
    /// once its attempt cap is exhausted.
    async fn retry_or_fail(&self, job: &ClaimedJob, reason: &str)
    -> ApplicationResult<RetryDecision>;

    /// Terminal failure without retry, for non-retryable errors.
    async fn fail(&self, job_id: &str, reason: &str) -> ApplicationResult<()>;

    async fn close(&self) -> ApplicationResult<()>;
}
