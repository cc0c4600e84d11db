// src/application/queries/jobs.rs
use crate::application::{
    dto::{AuthenticatedUser, JobStatusDto, Role},
    error::{ApplicationError, ApplicationResult},
    ports::queue::PublishQueue,
};
use std::sync::Arc;

pub struct JobQueryService {
    queue: Arc<dyn PublishQueue>,
}

impl JobQueryService {
    pub fn new(queue: Arc<dyn PublishQueue>) -> Self {
        Self { queue }
    }

    /// Current lifecycle state of a publish job. A job reaped by the
    /// broker's retention policy surfaces as not found.
    pub async fn status(
        &self,
        actor: &AuthenticatedUser,
        job_id: &str,
    ) -> ApplicationResult<JobStatusDto> {
        actor.require_role(Role::Viewer)?;
        self.queue
            .status(job_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("job not found"))
    }
}
