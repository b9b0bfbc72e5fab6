//! Approval record models. Rows are append-only: one per decision,
//! never mutated or deleted.

use formline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `approvals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Approval {
    pub id: DbId,
    pub form_id: DbId,
    pub user_id: DbId,
    pub step_number: i32,
    pub action: String,
    pub comments: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for recording a new approval decision.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApproval {
    pub form_id: DbId,
    pub user_id: DbId,
    pub step_number: i32,
    pub action: String,
    pub comments: Option<String>,
}

/// A history item: approval fields joined with the approver's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApprovalHistoryItem {
    pub step_number: i32,
    pub action: String,
    pub approved_by: String,
    pub comments: Option<String>,
    pub created_at: Timestamp,
}
