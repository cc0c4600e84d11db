// src/application/services/mod.rs
use std::sync::Arc;

use crate::{
    application::{
        commands::{articles::ArticleCommandService, revalidate::RevalidateCommandService},
        ports::{
            page_cache::PageCache,
            queue::PublishQueue,
            revalidate::CacheInvalidator,
            security::TokenManager,
            time::Clock,
        },
        queries::jobs::JobQueryService,
    },
    domain::{
        article::{ArticleReadRepository, ArticleWriteRepository},
        audit::AuditLogRepository,
    },
};

/// Wires repositories and ports into the application services. Everything
/// is constructed explicitly and injected; there are no module-level
/// singletons, so tests and multi-instance deployments assemble their own.
pub struct ApplicationServices {
    pub article_commands: Arc<ArticleCommandService>,
    pub job_queries: Arc<JobQueryService>,
    pub revalidation: Arc<RevalidateCommandService>,
    token_manager: Arc<dyn TokenManager>,
    queue: Arc<dyn PublishQueue>,
}

impl ApplicationServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        article_read_repo: Arc<dyn ArticleReadRepository>,
        article_write_repo: Arc<dyn ArticleWriteRepository>,
        audit_log_repo: Arc<dyn AuditLogRepository>,
        queue: Arc<dyn PublishQueue>,
        invalidator: Arc<dyn CacheInvalidator>,
        page_cache: Arc<dyn PageCache>,
        token_manager: Arc<dyn TokenManager>,
        clock: Arc<dyn Clock>,
        revalidation_secret: impl Into<String>,
    ) -> Self {
        let article_commands = Arc::new(ArticleCommandService::new(
            Arc::clone(&article_read_repo),
            Arc::clone(&article_write_repo),
            Arc::clone(&audit_log_repo),
            Arc::clone(&queue),
            Arc::clone(&invalidator),
            Arc::clone(&clock),
        ));

        let job_queries = Arc::new(JobQueryService::new(Arc::clone(&queue)));
        let revalidation = Arc::new(RevalidateCommandService::new(
            page_cache,
            revalidation_secret,
        ));

        Self {
            article_commands,
            job_queries,
            revalidation,
            token_manager,
            queue,
        }
    }

    pub fn token_manager(&self) -> Arc<dyn TokenManager> {
        Arc::clone(&self.token_manager)
    }

    pub fn queue(&self) -> Arc<dyn PublishQueue> {
        Arc::clone(&self.queue)
    }
}
