// src/application/commands/articles/transition.rs
use super::ArticleCommandService;
use crate::{
    application::{
        dto::ArticleDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        article::{Article, ArticleId},
        audit::AuditLog,
    },
};
use serde_json::json;

impl ArticleCommandService {
    /// Perform the publish transition and its best-effort side effects.
    ///
    /// Shared by the worker and the synchronous fallback so both paths
    /// enforce the same precondition and produce the same audit entry.
    /// The conditional write is the sole mechanism preventing a
    /// double-publish: a duplicate or racing invocation finds the article
    /// no longer in draft/scheduled state and gets `NotPublishable`.
    pub async fn publish_now(
        &self,
        article_id: ArticleId,
        actor_user_id: i64,
    ) -> ApplicationResult<ArticleDto> {
        let now = self.clock.now();
        let article = self
            .write_repo
            .mark_published(article_id, now)
            .await?
            .ok_or_else(|| {
                ApplicationError::not_publishable(format!(
                    "article {article_id} not found or already published"
                ))
            })?;

        tracing::info!(article_id = %article.id, slug = %article.slug, "article published");

        self.run_side_effects(&article, actor_user_id).await;

        Ok(article.into())
    }

    /// Post-transition steps, each in its own error boundary. Failures are
    /// logged and swallowed: publish success is independent of cache
    /// freshness and audit durability.
    async fn run_side_effects(&self, article: &Article, actor_user_id: i64) {
        let paths = article.stale_paths();
        if let Err(err) = self.invalidator.invalidate(&paths).await {
            tracing::warn!(
                article_id = %article.id,
                error = %err,
                "cache invalidation failed, continuing"
            );
        }

        let entry = AuditLog {
            user_id: actor_user_id,
            action: "publish_article".into(),
            resource_type: "article".into(),
            resource_id: article.id.into(),
            details: Some(json!({
                "status": article.status.as_str(),
                "published_at": article.published_at,
            })),
            created_at: self.clock.now(),
        };
        if let Err(err) = self.audit_repo.insert(entry).await {
            tracing::warn!(
                article_id = %article.id,
                error = %err,
                "audit logging failed, continuing"
            );
        }
    }
}
