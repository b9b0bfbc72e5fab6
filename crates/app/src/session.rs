//! The authenticated session context.

use formline_core::role::Role;
use formline_core::types::DbId;
use serde::Serialize;

/// An authenticated user's context, returned by
/// [`crate::service::FormService::login`] and passed explicitly to every
/// service operation. There is no process-wide current-user state.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user_id: DbId,
    pub username: String,
    pub role: Role,
}
