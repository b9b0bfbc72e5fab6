//! The error taxonomy every layer of the workspace speaks.
//!
//! Persistence failures with a domain meaning (a duplicate username, a
//! dangling form reference) are classified into these variants by the
//! application layer; raw database errors stay outside this enum.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A row a caller asked for does not exist.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Caller-supplied input was rejected before anything was persisted.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation lost to an earlier write: a duplicate username, or a
    /// decision against a form another approver already moved.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Authentication failed. The message is the same for unknown
    /// usernames and wrong passwords.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but their role does not permit the
    /// operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A failure with no domain meaning, e.g. from password hashing.
    #[error("Internal error: {0}")]
    Internal(String),
}
