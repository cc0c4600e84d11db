// src/application/ports/page_cache.rs
use crate::application::ApplicationResult;
use async_trait::async_trait;

/// Receiving side of cache invalidation: drops cached pages by path or tag.
#[async_trait]
pub trait PageCache: Send + Sync {
    async fn revalidate_path(&self, path: &str) -> ApplicationResult<()>;

    /// Drops every page associated with the tag; returns how many were
    /// dropped.
    async fn revalidate_tag(&self, tag: &str) -> ApplicationResult<usize>;
}
