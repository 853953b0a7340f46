//! Variants and their nested attributes.
//!
//! `PUT /variants/{id}` is not the generic replace: it accepts any subset of
//! the variant's fields plus nested `attributes`, upserts the entries and
//! answers `{"data": <variant>, "message": "Successfully Updated"}`.

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};
use tracing::instrument;

use catalog_core::{AttributeId, ProductId, VariantId};

use crate::db::{VariantRepository, variants};
use crate::error::AppError;
use crate::extract::{IdPath, ValidJson};
use crate::models::{Variant, VariantDetail, VariantPatch, VariantWrite};
use crate::resource::handlers::{create, destroy, list, partial_update, retrieve};
use crate::resource::{FilterSet, Resource, ResourceConfig, Written, finish_write};
use crate::state::AppState;

pub const UPDATED_MESSAGE: &str = "Successfully Updated";

static CONFIG: ResourceConfig = ResourceConfig {
    select: variants::SELECT,
    id_column: "v.id",
    search_fields: &["p.name", "v.sku"],
    default_fields: &["product", "attributes"],
    order_by: "v.created_at DESC, v.id DESC",
};

pub struct Variants;

#[derive(Debug, Default, Deserialize)]
pub struct VariantFilter {
    pub product: Option<ProductId>,
    pub sku: Option<String>,
    pub product_name: Option<String>,
    /// Variants carrying a value for this attribute.
    pub attribute: Option<AttributeId>,
}

impl FilterSet for VariantFilter {
    fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(product) = self.product {
            qb.push(" AND v.product_id = ").push_bind(product);
        }
        if let Some(sku) = &self.sku {
            qb.push(" AND v.sku = ").push_bind(sku.clone());
        }
        if let Some(name) = &self.product_name {
            qb.push(" AND p.name = ").push_bind(name.clone());
        }
        if let Some(attribute) = self.attribute {
            qb.push(
                " AND EXISTS (SELECT 1 FROM variant_attributes va WHERE va.variant_id = v.id AND va.attribute_id = ",
            )
            .push_bind(attribute)
            .push(")");
        }
    }
}

#[async_trait]
impl Resource for Variants {
    const NAME: &'static str = "Variant";

    type Id = VariantId;
    type Row = Variant;
    type Detail = VariantDetail;
    type Write = VariantWrite;
    type Patch = VariantPatch;
    type Filter = VariantFilter;

    fn config() -> &'static ResourceConfig {
        &CONFIG
    }

    async fn retrieve(state: &AppState, id: VariantId) -> Result<VariantDetail, AppError> {
        let repo = VariantRepository::new(state.pool());
        let variant = repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(Self::NAME, id))?;
        let product_name = repo.product_name(id).await?;
        Ok(VariantDetail {
            variant,
            product_name,
        })
    }

    async fn create(state: &AppState, input: &VariantWrite) -> Result<VariantId, AppError> {
        Ok(VariantRepository::new(state.pool()).create(input).await?)
    }

    async fn update(state: &AppState, id: VariantId, input: &VariantWrite) -> Result<(), AppError> {
        Ok(VariantRepository::new(state.pool()).update(id, input).await?)
    }

    async fn partial_update(
        state: &AppState,
        id: VariantId,
        input: &VariantPatch,
    ) -> Result<(), AppError> {
        Ok(VariantRepository::new(state.pool()).patch(id, input).await?)
    }

    async fn delete(state: &AppState, id: VariantId) -> Result<(), AppError> {
        Ok(VariantRepository::new(state.pool()).delete(id).await?)
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/variants",
            get(list::<Variants>).post(create::<Variants>),
        )
        .route(
            "/variants/{id}",
            get(retrieve::<Variants>)
                .put(update)
                .patch(partial_update::<Variants>)
                .delete(destroy::<Variants>),
        )
}

/// Body of a successful `PUT /variants/{id}`.
#[derive(Debug, Serialize)]
pub struct VariantUpdated {
    pub data: Variant,
    pub message: &'static str,
}

/// `PUT /variants/{id}`
#[instrument(skip(state, input), fields(attributes = input.attributes.as_ref().map_or(0, Vec::len)))]
pub async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath<VariantId>,
    ValidJson(input): ValidJson<VariantPatch>,
) -> Result<Json<VariantUpdated>, AppError> {
    Variants::partial_update(&state, id, &input).await?;
    let row = finish_write::<Variants>(&state, id, Written::Patched(&input)).await?;
    tracing::info!(variant_id = %id, "Variant updated");
    Ok(Json(VariantUpdated {
        data: row,
        message: UPDATED_MESSAGE,
    }))
}
