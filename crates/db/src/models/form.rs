//! Form entity model and DTOs.

use formline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `forms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Form {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    /// Opaque structured payload, stored as JSONB.
    pub form_data: serde_json::Value,
    pub created_by: DbId,
    /// Raw status string; parse with `formline_core::status::FormStatus::parse`.
    pub current_status: String,
    pub current_step: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new form.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateForm {
    pub title: String,
    pub description: Option<String>,
    pub form_data: serde_json::Value,
    pub created_by: DbId,
}

/// A pending-queue item: form fields joined with the creator's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingForm {
    pub id: DbId,
    pub title: String,
    pub created_by_username: String,
    pub current_status: String,
    pub current_step: i32,
    pub created_at: Timestamp,
}
