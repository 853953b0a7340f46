//! Collection items: the collection/product association as a resource.

use async_trait::async_trait;
use axum::Router;
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

use catalog_core::{CollectionId, CollectionItemId, ProductId};

use crate::db::{CollectionItemRepository, collection_items};
use crate::error::AppError;
use crate::models::{CollectionItem, CollectionItemPatch, NewCollectionItem};
use crate::resource::{FilterSet, Resource, ResourceConfig, crud_router};
use crate::state::AppState;

static CONFIG: ResourceConfig = ResourceConfig {
    select: collection_items::SELECT,
    id_column: "ci.id",
    search_fields: &["p.name", "c.name"],
    default_fields: &["collection", "product"],
    order_by: "ci.created_at DESC, ci.id DESC",
};

pub struct CollectionItems;

#[derive(Debug, Default, Deserialize)]
pub struct CollectionItemFilter {
    pub collection: Option<CollectionId>,
    pub product: Option<ProductId>,
    pub collection_name: Option<String>,
}

impl FilterSet for CollectionItemFilter {
    fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(collection) = self.collection {
            qb.push(" AND ci.collection_id = ").push_bind(collection);
        }
        if let Some(product) = self.product {
            qb.push(" AND ci.product_id = ").push_bind(product);
        }
        if let Some(name) = &self.collection_name {
            qb.push(" AND c.name = ").push_bind(name.clone());
        }
    }
}

#[async_trait]
impl Resource for CollectionItems {
    const NAME: &'static str = "CollectionItem";

    type Id = CollectionItemId;
    type Row = CollectionItem;
    type Detail = CollectionItem;
    type Write = NewCollectionItem;
    type Patch = CollectionItemPatch;
    type Filter = CollectionItemFilter;

    fn config() -> &'static ResourceConfig {
        &CONFIG
    }

    async fn retrieve(state: &AppState, id: CollectionItemId) -> Result<CollectionItem, AppError> {
        CollectionItemRepository::new(state.pool())
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(Self::NAME, id))
    }

    async fn create(
        state: &AppState,
        input: &NewCollectionItem,
    ) -> Result<CollectionItemId, AppError> {
        Ok(CollectionItemRepository::new(state.pool()).create(*input).await?)
    }

    async fn update(
        state: &AppState,
        id: CollectionItemId,
        input: &NewCollectionItem,
    ) -> Result<(), AppError> {
        let full = CollectionItemPatch {
            collection: Some(input.collection),
            product: Some(input.product),
        };
        Ok(CollectionItemRepository::new(state.pool()).update(id, full).await?)
    }

    async fn partial_update(
        state: &AppState,
        id: CollectionItemId,
        input: &CollectionItemPatch,
    ) -> Result<(), AppError> {
        Ok(CollectionItemRepository::new(state.pool()).update(id, *input).await?)
    }

    async fn delete(state: &AppState, id: CollectionItemId) -> Result<(), AppError> {
        Ok(CollectionItemRepository::new(state.pool()).delete(id).await?)
    }
}

pub fn router() -> Router<AppState> {
    crud_router::<CollectionItems>("/collection-items")
}
