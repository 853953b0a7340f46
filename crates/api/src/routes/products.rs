//! Products, plus the enable/disable and add-to-collection actions.

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::State,
    routing::post,
};
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use tracing::instrument;

use catalog_core::{BrandId, CategoryId, CollectionId, ProductCondition, ProductId};

use super::MessageResponse;
use super::product_images::ProductImages;
use crate::db::{CollectionItemRepository, ProductImageRepository, ProductRepository, VariantRepository, products};
use crate::error::AppError;
use crate::extract::{IdPath, ValidJson};
use crate::models::collection::added_message;
use crate::models::product::availability_message;
use crate::models::{AddToCollection, NewCollectionItem, Product, ProductDetail, ProductPatch, ProductWrite};
use crate::resource::{FilterSet, Resource, ResourceConfig, crud_router};
use crate::state::AppState;

static CONFIG: ResourceConfig = ResourceConfig {
    select: products::SELECT,
    id_column: "p.id",
    search_fields: &["p.name", "p.sku"],
    default_fields: &[
        "name",
        "short_description",
        "description",
        "sku",
        "price",
        "selling_price",
        "condition",
        "category",
        "brand",
        "is_disabled",
        "hsn_code",
        "rating",
        "no_of_reviews",
        "tags",
        "dimension",
    ],
    order_by: "p.created_at DESC, p.id DESC",
};

pub struct Products;

/// `GET /products` filters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    pub category: Option<CategoryId>,
    pub brand: Option<BrandId>,
    pub condition: Option<ProductCondition>,
    pub is_disabled: Option<bool>,
    pub sku: Option<String>,
    /// Products whose `tags` contain this value.
    pub tag: Option<String>,
    /// Products attached to this collection.
    pub collection: Option<CollectionId>,
}

impl FilterSet for ProductFilter {
    fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(category) = self.category {
            qb.push(" AND p.category_id = ").push_bind(category);
        }
        if let Some(brand) = self.brand {
            qb.push(" AND p.brand_id = ").push_bind(brand);
        }
        if let Some(condition) = self.condition {
            qb.push(" AND p.condition = ").push_bind(condition);
        }
        if let Some(is_disabled) = self.is_disabled {
            qb.push(" AND p.is_disabled = ").push_bind(is_disabled);
        }
        if let Some(sku) = &self.sku {
            qb.push(" AND p.sku = ").push_bind(sku.clone());
        }
        if let Some(tag) = &self.tag {
            qb.push(" AND ").push_bind(tag.clone()).push(" = ANY(p.tags)");
        }
        if let Some(collection) = self.collection {
            qb.push(
                " AND EXISTS (SELECT 1 FROM collection_items ci WHERE ci.product_id = p.id AND ci.collection_id = ",
            )
            .push_bind(collection)
            .push(")");
        }
    }
}

#[async_trait]
impl Resource for Products {
    const NAME: &'static str = "Product";

    type Id = ProductId;
    type Row = Product;
    type Detail = ProductDetail;
    type Write = ProductWrite;
    type Patch = ProductPatch;
    type Filter = ProductFilter;

    fn config() -> &'static ResourceConfig {
        &CONFIG
    }

    async fn retrieve(state: &AppState, id: ProductId) -> Result<ProductDetail, AppError> {
        let product = ProductRepository::new(state.pool())
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(Self::NAME, id))?;
        let variants = VariantRepository::new(state.pool())
            .list_for_product(id)
            .await?;
        let images = ProductImageRepository::new(state.pool())
            .list_for_product(id)
            .await?
            .into_iter()
            .map(|image| ProductImages::present(state, image))
            .collect();

        Ok(ProductDetail {
            product,
            variants,
            images,
        })
    }

    async fn create(state: &AppState, input: &ProductWrite) -> Result<ProductId, AppError> {
        Ok(ProductRepository::new(state.pool()).create(input).await?)
    }

    async fn update(state: &AppState, id: ProductId, input: &ProductWrite) -> Result<(), AppError> {
        Ok(ProductRepository::new(state.pool()).update(id, input).await?)
    }

    async fn partial_update(
        state: &AppState,
        id: ProductId,
        input: &ProductPatch,
    ) -> Result<(), AppError> {
        Ok(ProductRepository::new(state.pool()).patch(id, input).await?)
    }

    async fn delete(state: &AppState, id: ProductId) -> Result<(), AppError> {
        Ok(ProductRepository::new(state.pool()).delete(id).await?)
    }
}

pub fn router() -> Router<AppState> {
    crud_router::<Products>("/products")
        .route("/products/{id}/enable", post(enable))
        .route("/products/{id}/disable", post(disable))
        .route("/products/{id}/add-to-collection", post(add_to_collection))
}

/// `POST /products/{id}/enable`
#[instrument(skip(state))]
pub async fn enable(
    State(state): State<AppState>,
    IdPath(id): IdPath<ProductId>,
) -> Result<Json<MessageResponse>, AppError> {
    set_availability(&state, id, false).await
}

/// `POST /products/{id}/disable`
#[instrument(skip(state))]
pub async fn disable(
    State(state): State<AppState>,
    IdPath(id): IdPath<ProductId>,
) -> Result<Json<MessageResponse>, AppError> {
    set_availability(&state, id, true).await
}

async fn set_availability(
    state: &AppState,
    id: ProductId,
    disabled: bool,
) -> Result<Json<MessageResponse>, AppError> {
    let name = ProductRepository::new(state.pool())
        .set_disabled(id, disabled)
        .await?;
    tracing::info!(product_id = %id, disabled, "Product availability set");
    Ok(Json(MessageResponse::new(availability_message(&name, disabled))))
}

/// `POST /products/{id}/add-to-collection`
#[instrument(skip(state, input))]
pub async fn add_to_collection(
    State(state): State<AppState>,
    IdPath(id): IdPath<ProductId>,
    ValidJson(input): ValidJson<AddToCollection>,
) -> Result<Json<MessageResponse>, AppError> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(Products::NAME, id))?;

    CollectionItemRepository::new(state.pool())
        .create(NewCollectionItem::from_product(product.id, &input))
        .await?;

    Ok(Json(MessageResponse::new(added_message(&product.name))))
}
