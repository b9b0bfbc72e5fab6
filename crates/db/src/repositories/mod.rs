//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. All SQL in the workspace lives
//! here; callers work with typed models only.

pub mod approval_repo;
pub mod audit_repo;
pub mod form_repo;
pub mod user_repo;

pub use approval_repo::ApprovalRepo;
pub use audit_repo::AuditRepo;
pub use form_repo::FormRepo;
pub use user_repo::UserRepo;
