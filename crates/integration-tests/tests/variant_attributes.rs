//! Variant writes with nested attribute upserts.
//!
//! Requires `DATABASE_URL`; run with `-- --ignored`.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};
use sqlx::PgPool;

use catalog_api::db::VariantRepository;
use catalog_api::models::VariantWrite;
use catalog_core::VariantId;
use catalog_integration_tests::{app_with_pool, create_product, seed_attribute, send};

async fn attribute_rows(pool: &PgPool, variant: i64) -> Vec<(i32, String)> {
    sqlx::query_as("SELECT id, value FROM variant_attributes WHERE variant_id = $1 ORDER BY id")
        .bind(i32::try_from(variant).unwrap())
        .fetch_all(pool)
        .await
        .unwrap()
}

async fn create_variant(app: &axum::Router, product: i64, attributes: Value) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/variants",
        Some(json!({"product": product, "sku": "RS-001-L", "attributes": attributes})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires DATABASE_URL"]
async fn test_put_updates_owned_and_inserts_new(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = app_with_pool(pool.clone(), media.path());
    let size = seed_attribute(&pool, "Size").await;
    let product = create_product(&app, "Red Shirt", "RS-001").await;

    let created = create_variant(&app, product, json!([{"attributes": size, "value": "L"}])).await;
    let variant = created["id"].as_i64().unwrap();
    let owned = created["attributes"][0]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/variants/{variant}"),
        Some(json!({"attributes": [
            {"id": owned, "attributes": size, "value": "XL"},
            {"attributes": size, "value": "M"},
        ]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Successfully Updated");
    assert_eq!(body["data"]["attributes"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["attributes"][0]["attribute_name"], "Size");

    let rows = attribute_rows(&pool, variant).await;
    assert_eq!(rows.len(), 2);
    assert_eq!(i64::from(rows[0].0), owned);
    assert_eq!(rows[0].1, "XL");
    assert_eq!(rows[1].1, "M");
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires DATABASE_URL"]
async fn test_put_rejects_other_variants_attribute(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = app_with_pool(pool.clone(), media.path());
    let size = seed_attribute(&pool, "Size").await;
    let product = create_product(&app, "Red Shirt", "RS-001").await;

    let first = create_variant(&app, product, json!([{"attributes": size, "value": "L"}])).await;
    let second = create_variant(&app, product, json!([{"attributes": size, "value": "S"}])).await;
    let foreign = first["attributes"][0]["id"].as_i64().unwrap();
    let target = second["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/variants/{target}"),
        Some(json!({
            "sku": "CHANGED",
            "attributes": [
                {"attributes": size, "value": "M"},
                {"id": foreign, "attributes": size, "value": "hijacked"},
            ],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        format!("Variant attribute {foreign} not found for variant {target}")
    );

    // Nothing from the rejected write landed
    let first_rows = attribute_rows(&pool, first["id"].as_i64().unwrap()).await;
    assert_eq!(first_rows[0].1, "L");
    assert_eq!(attribute_rows(&pool, target).await.len(), 1);
    let (_, detail) = send(&app, Method::GET, &format!("/variants/{target}?expand=true"), None).await;
    assert_eq!(detail["sku"], "RS-001-L");
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires DATABASE_URL"]
async fn test_omitted_attributes_untouched(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = app_with_pool(pool.clone(), media.path());
    let size = seed_attribute(&pool, "Size").await;
    let product = create_product(&app, "Red Shirt", "RS-001").await;
    let created = create_variant(&app, product, json!([{"attributes": size, "value": "L"}])).await;
    let variant = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/variants/{variant}"),
        Some(json!({"stock": 12})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["stock"], 12);
    assert_eq!(attribute_rows(&pool, variant).await, vec![(
        i32::try_from(created["attributes"][0]["id"].as_i64().unwrap()).unwrap(),
        "L".to_string()
    )]);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires DATABASE_URL"]
async fn test_create_rejects_attribute_ids(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = app_with_pool(pool.clone(), media.path());
    let size = seed_attribute(&pool, "Size").await;
    let product = create_product(&app, "Red Shirt", "RS-001").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/variants",
        Some(json!({"product": product, "attributes": [{"id": 1, "attributes": size, "value": "L"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM variants")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires DATABASE_URL"]
async fn test_unknown_attribute_is_validation_error(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = app_with_pool(pool, media.path());
    let product = create_product(&app, "Red Shirt", "RS-001").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/variants",
        Some(json!({"product": product, "attributes": [{"attributes": 999, "value": "L"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["attributes"].is_array(), "{body}");
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires DATABASE_URL"]
async fn test_full_update_replaces_fields(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = app_with_pool(pool.clone(), media.path());
    let size = seed_attribute(&pool, "Size").await;
    let product = create_product(&app, "Red Shirt", "RS-001").await;
    let created = create_variant(&app, product, json!([{"attributes": size, "value": "L"}])).await;
    let id = VariantId::new(i32::try_from(created["id"].as_i64().unwrap()).unwrap());

    let input: VariantWrite =
        serde_json::from_value(json!({"product": product, "stock": 3})).unwrap();
    VariantRepository::new(&pool).update(id, &input).await.unwrap();

    let variant = VariantRepository::new(&pool).get(id).await.unwrap().unwrap();
    assert_eq!(variant.sku, None);
    assert_eq!(variant.stock, 3);
    assert_eq!(variant.attributes.0.len(), 1);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires DATABASE_URL"]
async fn test_put_clears_explicit_nulls_only(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = app_with_pool(pool, media.path());
    let product = create_product(&app, "Red Shirt", "RS-001").await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/variants",
        Some(json!({"product": product, "sku": "RS-001-L", "price": "24.50", "stock": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    let variant = created["id"].as_i64().unwrap();

    // Absent keys keep their values
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/variants/{variant}"),
        Some(json!({"stock": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["sku"], "RS-001-L");
    assert_eq!(body["data"]["price"], "24.50");
    assert_eq!(body["data"]["stock"], 5);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/variants/{variant}"),
        Some(json!({"sku": null, "price": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["data"]["sku"].is_null());
    assert!(body["data"]["price"].is_null());
    assert_eq!(body["data"]["stock"], 5);

    let (_, body) = send(
        &app,
        Method::PATCH,
        &format!("/variants/{variant}"),
        Some(json!({"price": "9.99"})),
    )
    .await;
    assert_eq!(body["price"], "9.99");
    assert!(body["sku"].is_null());
}
