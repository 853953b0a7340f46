//! Lookbooks and their variant sets.
//!
//! Requires `DATABASE_URL`; run with `-- --ignored`.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;

use catalog_integration_tests::{app_with_pool, create_product, send};

async fn create_variant(app: &axum::Router, product: i64, sku: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/variants",
        Some(json!({"product": product, "sku": sku})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires DATABASE_URL"]
async fn test_variant_set_is_replaced(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = app_with_pool(pool, media.path());
    let product = create_product(&app, "Red Shirt", "RS-001").await;
    let small = create_variant(&app, product, "RS-001-S").await;
    let large = create_variant(&app, product, "RS-001-L").await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/lookbooks",
        Some(json!({"name": "Summer Looks", "variants": [small, large]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    let id = created["id"].as_i64().unwrap();

    let (_, detail) = send(&app, Method::GET, &format!("/lookbooks/{id}"), None).await;
    assert_eq!(detail["variants"].as_array().unwrap().len(), 2);
    assert_eq!(detail["variants"][0]["product_name"], "Red Shirt");

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/lookbooks/{id}"),
        Some(json!({"variants": [large]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = send(&app, Method::GET, &format!("/lookbooks/{id}"), None).await;
    let variants = detail["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 1);
    assert_eq!(variants[0]["id"], large);

    // Renaming alone leaves the set alone
    send(
        &app,
        Method::PATCH,
        &format!("/lookbooks/{id}"),
        Some(json!({"name": "Late Summer"})),
    )
    .await;
    let (_, page) = send(&app, Method::GET, &format!("/lookbooks?variant={large}"), None).await;
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["name"], "Late Summer");
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires DATABASE_URL"]
async fn test_unknown_variant_rolls_back(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = app_with_pool(pool.clone(), media.path());

    let (status, body) = send(
        &app,
        Method::POST,
        "/lookbooks",
        Some(json!({"name": "Empty", "variants": [12345]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["variants"].is_array(), "{body}");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lookbooks")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}
