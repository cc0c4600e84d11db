// src/domain/audit/entity.rs
use chrono::{DateTime, Utc};

/// Append-only record of an administrative action. Entries are never
/// updated or deleted by this service; retention belongs to the store.
#[derive(Debug, Clone)]
pub struct AuditLog {
    pub user_id: i64,
    pub action: String,
    pub resource_type: String,
    pub resource_id: i64,
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
