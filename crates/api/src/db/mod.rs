//! Database operations for the catalog `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `products`, `variants`, `variant_attributes` - The catalog proper
//! - `product_images` - Image records (files live in media storage)
//! - `collections`, `collection_items` - Product groupings
//! - `lookbooks`, `lookbook_variants` - Variant groupings
//! - `users`, `address_register` - Customer accounts
//! - `orders` - Customer orders and their status
//! - `categories`, `brands`, `attributes` - Master data, referenced by id only
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p catalog-cli -- migrate
//! ```
//!
//! # Constraint naming
//!
//! Foreign keys are named `<table>_fk_<field>` and unique constraints
//! `<table>_uq_<field>`, where `<field>` is the JSON field the client sent.
//! [`RepositoryError`] reads the field back out of a violation so the API can
//! point at the offending input.

pub mod addresses;
pub mod collection_items;
pub mod collections;
pub mod lookbooks;
pub mod orders;
pub mod product_images;
pub mod products;
pub mod users;
pub mod variants;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use addresses::AddressRepository;
pub use collection_items::CollectionItemRepository;
pub use collections::CollectionRepository;
pub use lookbooks::LookBookRepository;
pub use orders::OrderRepository;
pub use product_images::ProductImageRepository;
pub use products::ProductRepository;
pub use users::UserRepository;
pub use variants::VariantRepository;

use crate::config::ApiConfig;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation on the named field.
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Foreign key points at a row that does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && let Some(constraint) = db_err.constraint()
        {
            if db_err.is_unique_violation()
                && let Some(field) = constraint_field(constraint, "_uq_")
            {
                return Self::Conflict(field.to_string());
            }
            if db_err.is_foreign_key_violation()
                && let Some(field) = constraint_field(constraint, "_fk_")
            {
                return Self::InvalidReference(field.to_string());
            }
        }
        Self::Database(err)
    }
}

/// Extract the field name from a `<table><marker><field>` constraint name.
fn constraint_field<'a>(constraint: &'a str, marker: &str) -> Option<&'a str> {
    constraint
        .rsplit_once(marker)
        .map(|(_, field)| field)
        .filter(|field| !field.is_empty())
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &ApiConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(config.database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_field() {
        assert_eq!(constraint_field("products_uq_sku", "_uq_"), Some("sku"));
        assert_eq!(
            constraint_field("variant_attributes_fk_attributes", "_fk_"),
            Some("attributes")
        );
        assert_eq!(
            constraint_field("collection_items_fk_collection", "_fk_"),
            Some("collection")
        );
        assert_eq!(constraint_field("products_pkey", "_uq_"), None);
        assert_eq!(constraint_field("broken_fk_", "_fk_"), None);
    }

    #[test]
    fn test_non_database_errors_pass_through() {
        let err = RepositoryError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, RepositoryError::Database(sqlx::Error::RowNotFound)));
    }
}
