//! Repository for the append-only `audit_log` table.

use sqlx::PgPool;

use crate::models::audit::{AuditEntry, AuditTrailItem, CreateAuditEntry};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, action, details, created_at";

/// Provides append and read operations for the audit trail.
pub struct AuditRepo;

impl AuditRepo {
    /// Append one audit entry, returning the created row.
    pub async fn append(
        pool: &PgPool,
        input: &CreateAuditEntry,
    ) -> Result<AuditEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_log (user_id, action, details)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditEntry>(&query)
            .bind(input.user_id)
            .bind(&input.action)
            .bind(&input.details)
            .fetch_one(pool)
            .await
    }

    /// List the most recent entries joined with usernames, newest first.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<AuditTrailItem>, sqlx::Error> {
        sqlx::query_as::<_, AuditTrailItem>(
            "SELECT a.id, u.username, a.action, a.details, a.created_at
             FROM audit_log a
             LEFT JOIN users u ON a.user_id = u.id
             ORDER BY a.created_at DESC, a.id DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
