//! Audit log entity models. Entries are immutable once created
//! (no `updated_at`).

use formline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single audit log entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditEntry {
    pub id: DbId,
    /// `None` for system-level entries.
    pub user_id: Option<DbId>,
    pub action: String,
    pub details: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for appending a new audit entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuditEntry {
    pub user_id: Option<DbId>,
    pub action: String,
    pub details: Option<String>,
}

/// A trail item: entry fields joined with the acting user's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditTrailItem {
    pub id: DbId,
    pub username: Option<String>,
    pub action: String,
    pub details: Option<String>,
    pub created_at: Timestamp,
}
