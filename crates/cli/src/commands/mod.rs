//! CLI subcommands.

pub mod migrate;
pub mod user;

use catalog_api::config::{ApiConfig, ConfigError};
use catalog_api::services::AccountError;
use sqlx::PgPool;
use thiserror::Error;

/// Errors surfaced by any subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Account(#[from] AccountError),
}

/// Connect using the API's own configuration.
async fn connect() -> Result<PgPool, CommandError> {
    let config = ApiConfig::from_env()?;
    tracing::info!("Connecting to catalog database...");
    Ok(catalog_api::db::create_pool(&config).await?)
}
