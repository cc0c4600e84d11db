// src/infrastructure/queue/memory.rs
use super::{BASE_BACKOFF, MAX_ATTEMPTS, backoff_for_attempt};
use crate::application::{
    ApplicationResult,
    dto::jobs::{JobState, JobStatusDto, PublishOutcome},
    ports::queue::{
        ClaimedJob, EnqueueOptions, PRIORITY_HIGH, PRIORITY_LOW, PublishJobPayload, PublishQueue,
        RetryDecision,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    sync::Mutex,
    time::Duration,
};
use uuid::Uuid;

const COMPLETED_MAX_COUNT: usize = 100;
const FAILED_MAX_COUNT: usize = 1_000;

#[derive(Debug, Clone)]
struct StoredJob {
    payload: PublishJobPayload,
    status: JobState,
    attempts: u32,
    max_attempts: u32,
    priority: u8,
    run_at: Option<DateTime<Utc>>,
    result: Option<PublishOutcome>,
    error: Option<String>,
}

#[derive(Default)]
struct Inner {
    jobs: HashMap<String, StoredJob>,
    ready: BTreeMap<u8, VecDeque<String>>,
    delayed: Vec<String>,
    completed: VecDeque<String>,
    failed: VecDeque<String>,
}

impl Inner {
    fn promote_due(&mut self, now: DateTime<Utc>) {
        let mut still_delayed = Vec::with_capacity(self.delayed.len());
        for id in self.delayed.drain(..) {
            let due = self
                .jobs
                .get(&id)
                .and_then(|job| job.run_at)
                .is_some_and(|run_at| run_at <= now);
            if due {
                if let Some(job) = self.jobs.get(&id) {
                    self.ready.entry(job.priority).or_default().push_back(id);
                }
            } else {
                still_delayed.push(id);
            }
        }
        self.delayed = still_delayed;
    }

    fn trim_terminal(&mut self, terminal: JobState) {
        let (list, cap) = match terminal {
            JobState::Completed => (&mut self.completed, COMPLETED_MAX_COUNT),
            JobState::Failed => (&mut self.failed, FAILED_MAX_COUNT),
            _ => return,
        };
        while list.len() > cap {
            if let Some(reaped) = list.pop_front() {
                self.jobs.remove(&reaped);
            }
        }
    }
}

/// Process-local publish queue with the same semantics as the Redis
/// backend: per-priority FIFO, delayed promotion, bounded retries, and
/// count-based retention of terminal jobs. Used by tests and broker-less
/// development setups that still want an async publish path.
pub struct InMemoryPublishQueue {
    inner: Mutex<Inner>,
    base_backoff: Duration,
}

impl Default for InMemoryPublishQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPublishQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            base_backoff: BASE_BACKOFF,
        }
    }

    /// Shrink the retry backoff so tests do not wait on wall-clock time.
    pub fn with_base_backoff(mut self, base_backoff: Duration) -> Self {
        self.base_backoff = base_backoff;
        self
    }

    pub fn pending_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.ready.values().map(VecDeque::len).sum::<usize>() + inner.delayed.len()
    }
}

#[async_trait]
impl PublishQueue for InMemoryPublishQueue {
    async fn enqueue(
        &self,
        payload: PublishJobPayload,
        options: EnqueueOptions,
    ) -> ApplicationResult<String> {
        let job_id = Uuid::new_v4().to_string();
        let priority = options.priority.clamp(PRIORITY_HIGH, PRIORITY_LOW);
        let now = Utc::now();
        let run_at = options.delay.filter(|d| !d.is_zero()).map(|delay| {
            now + chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero())
        });

        let mut inner = self.inner.lock().unwrap();
        inner.jobs.insert(
            job_id.clone(),
            StoredJob {
                payload,
                status: JobState::Pending,
                attempts: 0,
                max_attempts: MAX_ATTEMPTS,
                priority,
                run_at,
                result: None,
                error: None,
            },
        );
        if run_at.is_some() {
            inner.delayed.push(job_id.clone());
        } else {
            inner
                .ready
                .entry(priority)
                .or_default()
                .push_back(job_id.clone());
        }

        Ok(job_id)
    }

    async fn status(&self, job_id: &str) -> ApplicationResult<Option<JobStatusDto>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.jobs.get(job_id).map(|job| JobStatusDto {
            id: job_id.to_string(),
            status: job.status,
            attempts: job.attempts,
            result: job.result.clone(),
            error: job.error.clone(),
        }))
    }

    async fn claim_next(&self) -> ApplicationResult<Option<ClaimedJob>> {
        let mut inner = self.inner.lock().unwrap();
        inner.promote_due(Utc::now());

        let claimed = inner
            .ready
            .values_mut()
            .find_map(|queue| queue.pop_front());
        let Some(job_id) = claimed else {
            return Ok(None);
        };

        let Some(job) = inner.jobs.get_mut(&job_id) else {
            return Ok(None);
        };
        job.attempts += 1;
        job.status = JobState::Processing;

        Ok(Some(ClaimedJob {
            id: job_id,
            payload: job.payload.clone(),
            attempt: job.attempts,
            max_attempts: job.max_attempts,
        }))
    }

    async fn complete(&self, job_id: &str, outcome: PublishOutcome) -> ApplicationResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(job) = inner.jobs.get_mut(job_id) {
            job.status = JobState::Completed;
            job.result = Some(outcome);
        }
        inner.completed.push_back(job_id.to_string());
        inner.trim_terminal(JobState::Completed);
        Ok(())
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

        let delay = backoff_for_attempt(job.attempt, self.base_backoff);
        let run_at = Utc::now()
            + chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero());

        let mut inner = self.inner.lock().unwrap();
        if let Some(stored) = inner.jobs.get_mut(&job.id) {
            stored.status = JobState::Pending;
            stored.error = Some(reason.to_string());
            stored.run_at = Some(run_at);
        }
        inner.delayed.push(job.id.clone());

        Ok(RetryDecision::Retried { delay })
    }

    async fn fail(&self, job_id: &str, reason: &str) -> ApplicationResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(job) = inner.jobs.get_mut(job_id) {
            job.status = JobState::Failed;
            job.error = Some(reason.to_string());
        }
        inner.failed.push_back(job_id.to_string());
        inner.trim_terminal(JobState::Failed);
        Ok(())
    }

    async fn close(&self) -> ApplicationResult<()> {
        Ok(())
    }
}
