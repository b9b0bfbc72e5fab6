use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use formline_app::bootstrap;
use formline_db::DbConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formline=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = DbConfig::from_env();

    // --- Database ---
    let pool = config
        .connect()
        .await
        .context("Failed to connect to database")?;
    tracing::info!(pool_size = formline_db::POOL_SIZE, "Database connection pool created");

    formline_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    formline_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    bootstrap::ensure_default_admin(&pool)
        .await
        .context("Failed to seed default admin account")?;

    tracing::info!("Formline database ready");
    Ok(())
}
