//! Catalog API library.
//!
//! REST backend for products, variants, images, collections, lookbooks and
//! customer accounts. Exposed as a library so the binary, the CLI and the
//! integration tests share one router and one set of repositories.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod resource;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

use axum::{Router, extract::DefaultBodyLimit, middleware::from_fn};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::state::AppState;

/// Build the full application: routes, media, request tracing and Sentry.
pub fn app(state: AppState) -> Router {
    let config = state.config();
    let max_body_size = config.max_body_size;
    let mut router = routes::routes().fallback(fallback);

    // Absolute media URLs are served by something else (a CDN)
    if config.media.url.len() > 1 && config.media.url.starts_with('/') {
        router = router.nest_service(&config.media.url, ServeDir::new(&config.media.root));
    }

    router
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

async fn fallback() -> AppError {
    AppError::NotFound("Not found.".to_string())
}
