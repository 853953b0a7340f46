//! Router-level behaviour that never reaches the database.
//!
//! The app runs over a pool pointing at a closed port, so any request that
//! did touch the database would come back as a 500.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use catalog_api::middleware::REQUEST_ID_HEADER;
use catalog_integration_tests::{app_without_database, send};

#[tokio::test]
async fn test_health() {
    let media = tempfile::tempdir().unwrap();
    let app = app_without_database(media.path());

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let media = tempfile::tempdir().unwrap();
    let app = app_without_database(media.path());

    let (status, body) = send(&app, Method::GET, "/carts", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not found.");
}

#[tokio::test]
async fn test_unparsable_id_is_404() {
    let media = tempfile::tempdir().unwrap();
    let app = app_without_database(media.path());

    let (status, _) = send(&app, Method::GET, "/products/red-shirt", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::POST, "/products/abc/disable", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_product_rejected_before_persistence() {
    let media = tempfile::tempdir().unwrap();
    let app = app_without_database(media.path());

    let (status, body) = send(
        &app,
        Method::POST,
        "/products",
        Some(json!({"name": "  ", "sku": "", "price": "-1"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["name"].is_array());
    assert!(body["errors"]["sku"].is_array());
    assert!(body["errors"]["price"].is_array());
}

#[tokio::test]
async fn test_missing_fields_are_validation_errors() {
    let media = tempfile::tempdir().unwrap();
    let app = app_without_database(media.path());

    let (status, body) = send(&app, Method::POST, "/collections", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["non_field_errors"].is_array());
}

#[tokio::test]
async fn test_unknown_order_status_rejected() {
    let media = tempfile::tempdir().unwrap();
    let app = app_without_database(media.path());

    let (status, body) = send(
        &app,
        Method::POST,
        "/orders",
        Some(json!({"user": 1, "status": "lost_in_transit"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["non_field_errors"].is_array());

    let (status, _) = send(&app, Method::GET, "/orders?status=lost_in_transit", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_to_collection_requires_counterpart() {
    let media = tempfile::tempdir().unwrap();
    let app = app_without_database(media.path());

    let (status, _) = send(
        &app,
        Method::POST,
        "/products/1/add-to-collection",
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/collections/1/add-product",
        Some(json!({"collection": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_variant_update_validates_nested_attributes() {
    let media = tempfile::tempdir().unwrap();
    let app = app_without_database(media.path());

    let (status, body) = send(
        &app,
        Method::PUT,
        "/variants/7",
        Some(json!({"attributes": [{"id": 3, "attributes": 9, "value": ""}]})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["attributes[0].value"].is_array(), "{body}");
}

#[tokio::test]
async fn test_signup_validates_password() {
    let media = tempfile::tempdir().unwrap();
    let app = app_without_database(media.path());

    let (status, body) = send(
        &app,
        Method::POST,
        "/users/signup",
        Some(json!({"username": "jane", "password": "short", "email": "jane@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["password"].is_array());
}

#[tokio::test]
async fn test_page_zero_rejected() {
    let media = tempfile::tempdir().unwrap();
    let app = app_without_database(media.path());

    let (status, body) = send(&app, Method::GET, "/products?page=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["page"].is_array());
}

#[tokio::test]
async fn test_request_id_echoed() {
    let media = tempfile::tempdir().unwrap();
    let app = app_without_database(media.path());

    let response = app
        .oneshot(
            Request::get("/health")
                .header(REQUEST_ID_HEADER, "lb-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "lb-42");
}

#[tokio::test]
async fn test_media_served_from_root() {
    let media = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(media.path().join("product_images")).unwrap();
    std::fs::write(media.path().join("product_images/a.txt"), "hello").unwrap();
    let app = app_without_database(media.path());

    let (status, body) = send(&app, Method::GET, "/media/product_images/a.txt", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("hello"));
}
