//! Repository for the `approvals` table. Rows are written only through
//! `FormRepo::record_decision`; this repo is read-only.

use formline_core::types::DbId;
use sqlx::PgPool;

use crate::models::approval::{Approval, ApprovalHistoryItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, form_id, user_id, step_number, action, comments, created_at";

/// Provides read operations for approval records.
pub struct ApprovalRepo;

impl ApprovalRepo {
    /// List all decisions recorded for a form, in chain order.
    pub async fn list_for_form(
        pool: &PgPool,
        form_id: DbId,
    ) -> Result<Vec<Approval>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM approvals WHERE form_id = $1 ORDER BY step_number ASC"
        );
        sqlx::query_as::<_, Approval>(&query)
            .bind(form_id)
            .fetch_all(pool)
            .await
    }

    /// List a form's decision history joined with approver usernames.
    pub async fn history_for_form(
        pool: &PgPool,
        form_id: DbId,
    ) -> Result<Vec<ApprovalHistoryItem>, sqlx::Error> {
        sqlx::query_as::<_, ApprovalHistoryItem>(
            "SELECT a.step_number, a.action, u.username AS approved_by,
                    a.comments, a.created_at
             FROM approvals a
             JOIN users u ON a.user_id = u.id
             WHERE a.form_id = $1
             ORDER BY a.step_number ASC",
        )
        .bind(form_id)
        .fetch_all(pool)
        .await
    }
}
