use crate::domain::article::entity::Article;
use crate::domain::article::value_objects::ArticleId;
use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait ArticleReadRepository: Send + Sync {
    async fn find_by_id(&self, id: ArticleId) -> DomainResult<Option<Article>>;
}

#[async_trait]
pub trait ArticleWriteRepository: Send + Sync {
    /// Conditionally transition an article to published. The update must be
    /// a single atomic read-modify-write keyed on both the id and the
    /// current status being draft or scheduled, so concurrent publishers
    /// can never both succeed. Returns the post-transition article, or
    /// `None` when the precondition did not hold.
    async fn mark_published(
        &self,
        id: ArticleId,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<Article>>;
}
