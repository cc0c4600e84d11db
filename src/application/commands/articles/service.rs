// src/application/commands/articles/service.rs
use std::sync::Arc;

use crate::{
    application::ports::{
        queue::PublishQueue, revalidate::CacheInvalidator, time::Clock,
    },
    domain::{
        article::{ArticleReadRepository, ArticleWriteRepository},
        audit::AuditLogRepository,
    },
};

pub struct ArticleCommandService {
    pub(super) read_repo: Arc<dyn ArticleReadRepository>,
    pub(super) write_repo: Arc<dyn ArticleWriteRepository>,
    pub(super) audit_repo: Arc<dyn AuditLogRepository>,
    pub(super) queue: Arc<dyn PublishQueue>,
    pub(super) invalidator: Arc<dyn CacheInvalidator>,
    pub(super) clock: Arc<dyn Clock>,
}

impl ArticleCommandService {
    pub fn new(
        read_repo: Arc<dyn ArticleReadRepository>,
        write_repo: Arc<dyn ArticleWriteRepository>,
        audit_repo: Arc<dyn AuditLogRepository>,
        queue: Arc<dyn PublishQueue>,
        invalidator: Arc<dyn CacheInvalidator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            read_repo,
            write_repo,
            audit_repo,
            queue,
            invalidator,
            clock,
        }
    }
}
