// src/application/ports/revalidate.rs
use crate::application::ApplicationResult;
use async_trait::async_trait;

/// Notifies the public-facing page cache that paths are stale.
///
/// Invalidation is best-effort: callers log failures and move on, since a
/// stale cache self-heals on the next natural revalidation.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    async fn invalidate(&self, paths: &[String]) -> ApplicationResult<()>;
}
