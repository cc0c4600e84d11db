// src/infrastructure/repositories/mod.rs
mod postgres_article;
mod postgres_audit_log;

pub use postgres_article::{PostgresArticleReadRepository, PostgresArticleWriteRepository};
pub use postgres_audit_log::PostgresAuditLogRepository;

use crate::domain::errors::DomainError;

pub(crate) fn map_sqlx(err: sqlx::Error) -> DomainError {
    match err {
        sqlx::Error::RowNotFound => DomainError::NotFound("row not found".into()),
        other => DomainError::Persistence(other.to_string()),
    }
}
