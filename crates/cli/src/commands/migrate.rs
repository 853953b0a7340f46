//! Database migration command.
//!
//! Migrations live in `crates/api/migrations/` and are embedded at build time.

use super::{CommandError, connect};

/// Apply every pending migration.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running catalog migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Catalog migrations complete!");
    Ok(())
}
