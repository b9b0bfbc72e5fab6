//! User entity model and DTOs.

use formline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this outward.
/// Use [`UserSummary`] for anything user-facing.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    /// Raw role string; parse with `formline_core::role::Role::parse`.
    pub role: String,
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// Safe user representation for listings (no password hash).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub username: String,
    pub role: String,
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a new user. `password_hash` must already be hashed;
/// plaintext never reaches this layer.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub email: Option<String>,
}
