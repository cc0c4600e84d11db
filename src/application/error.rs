// src/application/error.rs
use crate::domain::errors::DomainError;
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    /// No broker configured or the broker is unreachable. Callers fall
    /// back to the synchronous publish path; never user-visible.
    #[error("queue unavailable: {0}")]
    QueueUnavailable(String),

    /// Publish precondition failed: the article is absent, already
    /// published, or archived. Terminal and non-retryable.
    #[error("article not publishable: {0}")]
    NotPublishable(String),

    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl ApplicationError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn queue_unavailable(msg: impl Into<String>) -> Self {
        Self::QueueUnavailable(msg.into())
    }

    pub fn not_publishable(msg: impl Into<String>) -> Self {
        Self::NotPublishable(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    /// Whether retrying the failed operation can succeed. Only transient
    /// store and infrastructure failures qualify; precondition failures
    /// are terminal because a retry would observe the same state.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Infrastructure(_) | Self::Domain(DomainError::Persistence(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_failures_are_retryable() {
        assert!(ApplicationError::infrastructure("timeout").is_retryable());
        assert!(ApplicationError::from(DomainError::Persistence("pool".into())).is_retryable());
    }

    #[test]
    fn precondition_failures_are_terminal() {
        assert!(!ApplicationError::not_publishable("already published").is_retryable());
        assert!(!ApplicationError::not_found("gone").is_retryable());
        assert!(!ApplicationError::queue_unavailable("no broker").is_retryable());
    }
}
