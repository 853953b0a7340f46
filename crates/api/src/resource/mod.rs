//! Generic resource controller.
//!
//! A resource is a zero-sized marker type implementing [`Resource`]. The
//! trait names the resource's representations (stored row, read-enriched
//! detail, full and partial write payloads, filter set), its static
//! [`ResourceConfig`] (base query, search fields, default fields), and the
//! persistence operations. The handlers in [`handlers`] are generic over it,
//! so `list`, `retrieve`, `create`, `update`, `partial_update` and `destroy`
//! exist once and every resource gets them by implementing the trait.
//!
//! # Write flow
//!
//! ```text
//! ValidJson<Write>  ->  Resource::create / update / partial_update  (primary save)
//!                   ->  re-read Row by id
//!                   ->  Resource::perform_db_action                  (best effort)
//!                   ->  Resource::present  ->  JSON
//! ```
//!
//! A failing `perform_db_action` never fails the request: the controller logs
//! it, counts it in `catalog_side_effect_failures_total`, and responds with
//! the row as saved.

pub mod fields;
pub mod handlers;
pub mod list;

use std::fmt::Display;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use thiserror::Error;
use validator::Validate;

use crate::db::RepositoryError;
use crate::error::AppError;
use crate::state::AppState;

pub use handlers::crud_router;
pub use list::{ListParams, Page};

/// Static description of how a resource is listed and trimmed.
#[derive(Debug)]
pub struct ResourceConfig {
    /// `SELECT ... FROM ... [JOIN ...]` producing `Row` columns, no `WHERE`.
    pub select: &'static str,
    /// Qualified primary key column, e.g. `p.id`.
    pub id_column: &'static str,
    /// Column expressions matched case-insensitively by `?search=`.
    pub search_fields: &'static [&'static str],
    /// JSON keys kept when a response is not expanded (`id` is always kept).
    pub default_fields: &'static [&'static str],
    /// `ORDER BY` expression for listings.
    pub order_by: &'static str,
}

/// Extra `WHERE` conditions derived from query parameters.
pub trait FilterSet {
    /// Append `AND ...` clauses for every filter that is set.
    fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>);
}

/// The write that just succeeded, as passed to [`Resource::perform_db_action`].
pub enum Written<'a, R: Resource> {
    Created(&'a R::Write),
    Replaced(&'a R::Write),
    Patched(&'a R::Patch),
}

/// A best-effort secondary effect failed.
#[derive(Debug, Error)]
#[error("{effect} failed: {source}")]
pub struct SideEffectError {
    /// Short label used in logs and metrics, e.g. `thumbnail`.
    pub effect: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl SideEffectError {
    pub fn new(effect: &'static str, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            effect,
            source: Box::new(source),
        }
    }
}

/// A resource served by the generic controller.
#[async_trait]
pub trait Resource: Sized + Send + Sync + 'static {
    /// Label for logs, metrics and 404 messages.
    const NAME: &'static str;

    type Id: DeserializeOwned
        + Copy
        + Display
        + Send
        + Sync
        + sqlx::Type<Postgres>
        + for<'q> sqlx::Encode<'q, Postgres>
        + 'static;

    /// Stored representation: list items and write responses.
    type Row: Serialize + for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin + 'static;

    /// Read-enriched representation returned by retrieve.
    type Detail: Serialize + Send + 'static;

    /// Full payload for create and update.
    type Write: DeserializeOwned + Validate + Send + Sync + 'static;

    /// Partial payload for partial update.
    type Patch: DeserializeOwned + Validate + Send + Sync + 'static;

    type Filter: FilterSet + DeserializeOwned + Default + Send + Sync + 'static;

    fn config() -> &'static ResourceConfig;

    async fn retrieve(state: &AppState, id: Self::Id) -> Result<Self::Detail, AppError>;

    async fn create(state: &AppState, input: &Self::Write) -> Result<Self::Id, AppError>;

    async fn update(state: &AppState, id: Self::Id, input: &Self::Write) -> Result<(), AppError>;

    async fn partial_update(
        state: &AppState,
        id: Self::Id,
        input: &Self::Patch,
    ) -> Result<(), AppError>;

    async fn delete(state: &AppState, id: Self::Id) -> Result<(), AppError>;

    /// Secondary effect after a successful write.
    ///
    /// Return `Some(row)` when the effect changed the row.
    async fn perform_db_action(
        _state: &AppState,
        _row: &Self::Row,
        _written: Written<'_, Self>,
    ) -> Result<Option<Self::Row>, SideEffectError> {
        Ok(None)
    }

    /// Final adjustment of a row before it is serialized for a client.
    fn present(_state: &AppState, row: Self::Row) -> Self::Row {
        row
    }
}

/// Load one row through the resource's base query.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn fetch_row<R: Resource>(
    pool: &PgPool,
    id: R::Id,
) -> Result<Option<R::Row>, RepositoryError> {
    let config = R::config();
    let sql = format!("{} WHERE {} = $1", config.select, config.id_column);
    let row = sqlx::query_as::<_, R::Row>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Re-read a freshly written row and run the resource's secondary effect.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the row vanished between write and read.
pub async fn finish_write<R: Resource>(
    state: &AppState,
    id: R::Id,
    written: Written<'_, R>,
) -> Result<R::Row, AppError> {
    let row = fetch_row::<R>(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(R::NAME, id))?;

    match R::perform_db_action(state, &row, written).await {
        Ok(Some(updated)) => Ok(updated),
        Ok(None) => Ok(row),
        Err(err) => {
            tracing::warn!(
                resource = R::NAME,
                id = %id,
                effect = err.effect,
                error = %err,
                "Secondary effect failed; keeping saved row"
            );
            metrics::counter!(
                "catalog_side_effect_failures_total",
                "resource" => R::NAME,
                "effect" => err.effect
            )
            .increment(1);
            Ok(row)
        }
    }
}
