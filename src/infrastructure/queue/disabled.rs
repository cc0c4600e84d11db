// src/infrastructure/queue/disabled.rs
use crate::application::{
    ApplicationResult,
    dto::jobs::{JobStatusDto, PublishOutcome},
    error::ApplicationError,
    ports::queue::{ClaimedJob, EnqueueOptions, PublishJobPayload, PublishQueue, RetryDecision},
};
use async_trait::async_trait;

/// Stand-in used when no broker is configured. Every enqueue reports
/// `QueueUnavailable`, which routes callers onto the synchronous
/// fallback; nothing is ever stored or claimed.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPublishQueue;

#[async_trait]
impl PublishQueue for DisabledPublishQueue {
    async fn enqueue(
        &self,
        _payload: PublishJobPayload,
        _options: EnqueueOptions,
    ) -> ApplicationResult<String> {
        Err(ApplicationError::queue_unavailable("no broker configured"))
    }

    async fn status(&self, _job_id: &str) -> ApplicationResult<Option<JobStatusDto>> {
        Ok(None)
    }

    async fn claim_next(&self) -> ApplicationResult<Option<ClaimedJob>> {
        Ok(None)
    }

    async fn complete(&self, _job_id: &str, _outcome: PublishOutcome) -> ApplicationResult<()> {
        Ok(())
    }

    async fn retry_or_fail(
        &self,
        _job: &ClaimedJob,
        _reason: &str,
    ) -> ApplicationResult<RetryDecision> {
        Ok(RetryDecision::Exhausted)
    }

    async fn fail(&self, _job_id: &str, _reason: &str) -> ApplicationResult<()> {
        Ok(())
    }

    async fn close(&self) -> ApplicationResult<()> {
        Ok(())
    }
}
