//! Collections and the add-product action.

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::State,
    routing::post,
};
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use tracing::instrument;

use catalog_core::{CollectionId, ProductId};

use super::MessageResponse;
use crate::db::{CollectionItemRepository, CollectionRepository, collections};
use crate::error::AppError;
use crate::extract::{IdPath, ValidJson};
use crate::models::collection::added_message;
use crate::models::{AddProduct, Collection, CollectionPatch, CollectionWrite, NewCollectionItem};
use crate::resource::{FilterSet, Resource, ResourceConfig, crud_router};
use crate::state::AppState;

static CONFIG: ResourceConfig = ResourceConfig {
    select: collections::SELECT,
    id_column: "c.id",
    search_fields: &["c.name"],
    default_fields: &["name", "items"],
    order_by: "c.created_at DESC, c.id DESC",
};

pub struct Collections;

#[derive(Debug, Default, Deserialize)]
pub struct CollectionFilter {
    pub name: Option<String>,
    /// Collections containing this product.
    pub product: Option<ProductId>,
}

impl FilterSet for CollectionFilter {
    fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(name) = &self.name {
            qb.push(" AND c.name = ").push_bind(name.clone());
        }
        if let Some(product) = self.product {
            qb.push(
                " AND EXISTS (SELECT 1 FROM collection_items ci WHERE ci.collection_id = c.id AND ci.product_id = ",
            )
            .push_bind(product)
            .push(")");
        }
    }
}

#[async_trait]
impl Resource for Collections {
    const NAME: &'static str = "Collection";

    type Id = CollectionId;
    type Row = Collection;
    type Detail = Collection;
    type Write = CollectionWrite;
    type Patch = CollectionPatch;
    type Filter = CollectionFilter;

    fn config() -> &'static ResourceConfig {
        &CONFIG
    }

    async fn retrieve(state: &AppState, id: CollectionId) -> Result<Collection, AppError> {
        CollectionRepository::new(state.pool())
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(Self::NAME, id))
    }

    async fn create(state: &AppState, input: &CollectionWrite) -> Result<CollectionId, AppError> {
        Ok(CollectionRepository::new(state.pool()).create(input).await?)
    }

    async fn update(
        state: &AppState,
        id: CollectionId,
        input: &CollectionWrite,
    ) -> Result<(), AppError> {
        Ok(CollectionRepository::new(state.pool()).update(id, input).await?)
    }

    async fn partial_update(
        state: &AppState,
        id: CollectionId,
        input: &CollectionPatch,
    ) -> Result<(), AppError> {
        Ok(CollectionRepository::new(state.pool()).patch(id, input).await?)
    }

    async fn delete(state: &AppState, id: CollectionId) -> Result<(), AppError> {
        Ok(CollectionRepository::new(state.pool()).delete(id).await?)
    }
}

pub fn router() -> Router<AppState> {
    crud_router::<Collections>("/collections")
        .route("/collections/{id}/add-product", post(add_product))
}

/// `POST /collections/{id}/add-product`
#[instrument(skip(state, input))]
pub async fn add_product(
    State(state): State<AppState>,
    IdPath(id): IdPath<CollectionId>,
    ValidJson(input): ValidJson<AddProduct>,
) -> Result<Json<MessageResponse>, AppError> {
    let collection = CollectionRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(Collections::NAME, id))?;

    CollectionItemRepository::new(state.pool())
        .create(NewCollectionItem::from_collection(collection.id, &input))
        .await?;

    Ok(Json(MessageResponse::new(added_message(&collection.name))))
}
