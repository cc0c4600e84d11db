// src/application/commands/articles/publish.rs
use super::ArticleCommandService;
use crate::{
    application::{
        dto::{AuthenticatedUser, PublishReceiptDto, Role},
        error::{ApplicationError, ApplicationResult},
        ports::queue::{EnqueueOptions, PublishJobPayload},
    },
    domain::article::{ArticleId, ArticleStatus},
};
use chrono::{DateTime, Utc};

pub struct PublishArticleCommand {
    pub article_id: i64,
    pub scheduled_for: Option<DateTime<Utc>>,
}

impl ArticleCommandService {
    /// Entry point for the publish endpoint: enqueue a publish job, or
    /// perform the transition synchronously when no broker is configured.
    pub async fn request_publish(
        &self,
        actor: &AuthenticatedUser,
        command: PublishArticleCommand,
    ) -> ApplicationResult<PublishReceiptDto> {
        actor.require_role(Role::Editor)?;
        let id = ArticleId::new(command.article_id)?;

        let article = self
            .read_repo
            .find_by_id(id)
            .await?
            .filter(|article| article.status == ArticleStatus::Draft)
            .ok_or_else(|| {
                ApplicationError::not_found("article not found or already published")
            })?;

        let payload = PublishJobPayload {
            article_id: article.id.into(),
            user_id: actor.id,
            scheduled_for: command.scheduled_for,
        };
        let options = EnqueueOptions {
            delay: command
                .scheduled_for
                .and_then(|at| at.signed_duration_since(self.clock.now()).to_std().ok()),
            ..EnqueueOptions::default()
        };

        match self.queue.enqueue(payload, options).await {
            Ok(job_id) => {
                tracing::info!(article_id = %id, job_id = %job_id, "publish job enqueued");
                Ok(PublishReceiptDto {
                    success: true,
                    job_id: Some(job_id),
                    message: "article queued for publishing".into(),
                })
            }
            Err(ApplicationError::QueueUnavailable(reason)) => {
                tracing::warn!(article_id = %id, %reason, "queue unavailable, publishing synchronously");
                self.publish_now(id, actor.id).await?;
                Ok(PublishReceiptDto {
                    success: true,
                    job_id: None,
                    message: "article published successfully".into(),
                })
            }
            Err(err) => Err(err),
        }
    }
}
