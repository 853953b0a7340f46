//! Product availability and collection membership.
//!
//! These tests require `DATABASE_URL` pointing at a `PostgreSQL` server where
//! `sqlx::test` may create scratch databases. Run with `-- --ignored`.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;

use catalog_integration_tests::{app_with_pool, create_collection, create_product, send};

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires DATABASE_URL"]
async fn test_disable_then_enable_is_idempotent(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = app_with_pool(pool, media.path());
    let id = create_product(&app, "Red Shirt", "RS-001").await;

    for _ in 0..2 {
        let (status, body) = send(&app, Method::POST, &format!("/products/{id}/disable"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Red Shirt successfully disabled.!"}));
    }

    let (_, product) = send(&app, Method::GET, &format!("/products/{id}"), None).await;
    assert_eq!(product["is_disabled"], true);

    for _ in 0..2 {
        let (status, body) = send(&app, Method::POST, &format!("/products/{id}/enable"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Red Shirt successfully enabled.!"}));
    }

    let (_, product) = send(&app, Method::GET, &format!("/products/{id}"), None).await;
    assert_eq!(product["is_disabled"], false);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires DATABASE_URL"]
async fn test_availability_of_unknown_product(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = app_with_pool(pool, media.path());

    let (status, _) = send(&app, Method::POST, "/products/999/disable", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires DATABASE_URL"]
async fn test_add_to_collection_from_both_sides(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = app_with_pool(pool.clone(), media.path());
    let product = create_product(&app, "Red Shirt", "RS-001").await;
    let collection = create_collection(&app, "Summer").await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/products/{product}/add-to-collection"),
        Some(json!({"collection": collection})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Red Shirt successfully added to the collection.!");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/collections/{collection}/add-product"),
        Some(json!({"product": product})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Summer successfully added to the collection.!");

    // Same association twice; duplicates are not prevented
    let pairs: Vec<(i32, i32)> = sqlx::query_as(
        "SELECT collection_id, product_id FROM collection_items ORDER BY id",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    let expected = (i32::try_from(collection).unwrap(), i32::try_from(product).unwrap());
    assert_eq!(pairs, vec![expected, expected]);

    let (_, detail) = send(&app, Method::GET, &format!("/collections/{collection}"), None).await;
    assert_eq!(detail["items"].as_array().unwrap().len(), 2);
    assert_eq!(detail["items"][0]["product_name"], "Red Shirt");
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires DATABASE_URL"]
async fn test_add_to_unknown_collection(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = app_with_pool(pool, media.path());
    let product = create_product(&app, "Red Shirt", "RS-001").await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/products/{product}/add-to-collection"),
        Some(json!({"collection": 404})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["collection"].is_array(), "{body}");

    let (status, _) = send(
        &app,
        Method::POST,
        "/collections/404/add-product",
        Some(json!({"product": product})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires DATABASE_URL"]
async fn test_duplicate_sku_conflicts(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = app_with_pool(pool, media.path());
    create_product(&app, "Red Shirt", "RS-001").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/products",
        Some(json!({"name": "Other", "sku": "RS-001", "price": "5"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "A record with this sku already exists.");
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires DATABASE_URL"]
async fn test_list_search_filters_and_trimming(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = app_with_pool(pool, media.path());
    create_product(&app, "Red Shirt", "RS-001").await;
    create_product(&app, "Blue Jeans", "BJ-RED").await;
    let hat = create_product(&app, "Green Hat", "GH-001").await;
    send(&app, Method::POST, &format!("/products/{hat}/disable"), None).await;

    // Case-insensitive, ORed across name and sku
    let (status, page) = send(&app, Method::GET, "/products?search=red", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 2);

    let (_, page) = send(&app, Method::GET, "/products?is_disabled=true", None).await;
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["name"], "Green Hat");

    // Trimmed by default, full with expand
    assert!(page["results"][0].get("created_at").is_none());
    let (_, page) = send(&app, Method::GET, "/products?is_disabled=true&expand=true", None).await;
    assert!(page["results"][0].get("created_at").is_some());

    let (_, page) = send(&app, Method::GET, "/products?page_size=1&page=2", None).await;
    assert_eq!(page["count"], 3);
    assert_eq!(page["results"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires DATABASE_URL"]
async fn test_delete_then_retrieve(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = app_with_pool(pool, media.path());
    let id = create_product(&app, "Red Shirt", "RS-001").await;

    let (status, _) = send(&app, Method::DELETE, &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
