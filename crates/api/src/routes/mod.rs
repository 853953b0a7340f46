//! HTTP routes for the catalog API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness
//! GET  /health/ready                        - Readiness (database reachable)
//!
//! # Catalog (generic CRUD: list, create, retrieve, update, partial update, delete)
//! /products, /products/{id}
//! POST /products/{id}/enable
//! POST /products/{id}/disable
//! POST /products/{id}/add-to-collection
//! /variants, /variants/{id}                  - PUT upserts nested attributes
//! /product-images, /product-images/{id}
//! /collections, /collections/{id}
//! POST /collections/{id}/add-product
//! /collection-items, /collection-items/{id}
//! /lookbooks, /lookbooks/{id}
//!
//! # Accounts
//! POST /users/signup
//! GET  /users/{id}
//! /addresses, /addresses/{id}
//! /orders, /orders/{id}                      - filter by user, status
//! ```

pub mod addresses;
pub mod collection_items;
pub mod collections;
pub mod lookbooks;
pub mod orders;
pub mod product_images;
pub mod products;
pub mod users;
pub mod variants;

use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// `{"message": "..."}` body returned by domain actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub const fn new(message: String) -> Self {
        Self { message }
    }
}

/// Every API route, without middleware or state.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(products::router())
        .merge(variants::router())
        .merge(product_images::router())
        .merge(collections::router())
        .merge(collection_items::router())
        .merge(lookbooks::router())
        .merge(users::router())
        .merge(addresses::router())
        .merge(orders::router())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(err) => {
            tracing::warn!(error = %err, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
