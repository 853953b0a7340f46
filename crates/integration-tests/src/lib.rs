//! Integration tests for the catalog backend.
//!
//! # Running Tests
//!
//! ```bash
//! # Router-level tests (no database)
//! cargo test -p catalog-integration-tests
//!
//! # Database-backed tests (each gets a fresh, migrated database)
//! DATABASE_URL=postgres://localhost/catalog cargo test -p catalog-integration-tests -- --ignored
//! ```
//!
//! The app is driven in-process with `tower::ServiceExt::oneshot`; no server
//! needs to be running.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::Path;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use catalog_api::config::ApiConfig;
use catalog_api::state::AppState;

/// Nothing listens here; queries against it fail.
pub const UNREACHABLE_DATABASE_URL: &str = "postgres://catalog@127.0.0.1:1/catalog";

/// Configuration with media stored under `media_root`.
#[must_use]
pub fn test_config(media_root: &Path) -> ApiConfig {
    let root = media_root.to_string_lossy().into_owned();
    ApiConfig::from_lookup(move |key| match key {
        "DATABASE_URL" => Some(UNREACHABLE_DATABASE_URL.to_string()),
        "MEDIA_ROOT" => Some(root.clone()),
        "MEDIA_URL" => Some("/media".to_string()),
        "THUMBNAIL_MAX_EDGE" => Some("64".to_string()),
        _ => None,
    })
    .unwrap()
}

/// The full app over a real pool.
#[must_use]
pub fn app_with_pool(pool: PgPool, media_root: &Path) -> Router {
    catalog_api::app(AppState::new(test_config(media_root), pool))
}

/// The full app over a pool that never connects.
///
/// Good for anything that must be answered before the database is touched.
#[must_use]
pub fn app_without_database(media_root: &Path) -> Router {
    let pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_millis(200))
        .connect_lazy(UNREACHABLE_DATABASE_URL)
        .unwrap();
    app_with_pool(pool, media_root)
}

/// Send one request and decode the JSON response (`Null` for empty bodies).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

/// `{"file_name", "content"}` upload payload.
#[must_use]
pub fn upload(file_name: &str, bytes: &[u8]) -> Value {
    serde_json::json!({"file_name": file_name, "content": STANDARD.encode(bytes)})
}

/// A solid-colour PNG.
#[must_use]
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        width,
        height,
        image::Rgb([20, 120, 200]),
    ));
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// Insert one attribute row and return its id.
pub async fn seed_attribute(pool: &PgPool, name: &str) -> i32 {
    sqlx::query_scalar("INSERT INTO attributes (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Create a product through the API and return its id.
pub async fn create_product(app: &Router, name: &str, sku: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/products",
        Some(serde_json::json!({"name": name, "sku": sku, "price": "19.99"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

/// Create a collection through the API and return its id.
pub async fn create_collection(app: &Router, name: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/collections",
        Some(serde_json::json!({"name": name})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}
