//! Persistence gateway: pool construction, embedded migrations, and the
//! typed repository operations the workflow and application layers use.
//! No SQL leaves this crate.

pub mod config;
pub mod models;
pub mod repositories;

pub use config::DbConfig;

pub type DbPool = sqlx::PgPool;

/// Bounded pool size. Every operation draws a connection from this pool
/// and returns it when the future completes, including on error paths.
pub const POOL_SIZE: u32 = 10;

/// Apply embedded migrations. Idempotent: safe to run on every startup,
/// creating the schema on first connection.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Cheap connectivity probe.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
