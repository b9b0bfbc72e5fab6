//! First-run bootstrap: seed the default admin account.

use formline_core::audit::action_types;
use formline_core::error::CoreError;
use formline_core::role::Role;
use formline_db::models::audit::CreateAuditEntry;
use formline_db::models::user::CreateUser;
use formline_db::repositories::{AuditRepo, UserRepo};
use formline_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::password::hash_password;

/// Username of the seeded admin account.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Initial password of the seeded admin account. Stored only as an
/// Argon2id hash; operators are expected to change it after first login.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Create the default admin account if no Admin user exists yet.
///
/// Idempotent, and safe when several instances start against the same
/// database: the loser of the insert race hits the username unique
/// constraint and treats that as success.
pub async fn ensure_default_admin(pool: &DbPool) -> AppResult<()> {
    let admin_count = UserRepo::count_by_role(pool, Role::Admin.as_str()).await?;
    if admin_count > 0 {
        return Ok(());
    }

    let password_hash = hash_password(DEFAULT_ADMIN_PASSWORD)
        .map_err(|e| CoreError::Internal(format!("Password hashing error: {e}")))?;

    let result = UserRepo::create(
        pool,
        &CreateUser {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            password_hash,
            role: Role::Admin.as_str().to_string(),
            email: Some("admin@company.com".to_string()),
        },
    )
    .await
    .map_err(AppError::from);

    match result {
        Ok(user) => {
            AuditRepo::append(
                pool,
                &CreateAuditEntry {
                    user_id: None,
                    action: action_types::SYSTEM.to_string(),
                    details: Some("Seeded default admin account".to_string()),
                },
            )
            .await?;
            tracing::info!(user_id = user.id, username = DEFAULT_ADMIN_USERNAME,
                "Seeded default admin account");
            Ok(())
        }
        // Another instance seeded it between our count and our insert.
        Err(AppError::Core(CoreError::Conflict(_))) => Ok(()),
        Err(err) => Err(err),
    }
}
