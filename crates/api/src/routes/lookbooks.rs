//! Lookbooks.

use async_trait::async_trait;
use axum::Router;
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

use catalog_core::{LookBookId, ProductId, VariantId};

use crate::db::{LookBookRepository, lookbooks};
use crate::error::AppError;
use crate::models::{LookBook, LookBookDetail, LookBookPatch, LookBookWrite};
use crate::resource::{FilterSet, Resource, ResourceConfig, crud_router};
use crate::state::AppState;

static CONFIG: ResourceConfig = ResourceConfig {
    select: lookbooks::SELECT,
    id_column: "l.id",
    search_fields: &["l.name"],
    default_fields: &["name", "variants"],
    order_by: "l.created_at DESC, l.id DESC",
};

pub struct LookBooks;

#[derive(Debug, Default, Deserialize)]
pub struct LookBookFilter {
    pub name: Option<String>,
    pub variant: Option<VariantId>,
    /// Lookbooks featuring any variant of this product.
    pub product: Option<ProductId>,
}

impl FilterSet for LookBookFilter {
    fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(name) = &self.name {
            qb.push(" AND l.name = ").push_bind(name.clone());
        }
        if let Some(variant) = self.variant {
            qb.push(
                " AND EXISTS (SELECT 1 FROM lookbook_variants lv WHERE lv.lookbook_id = l.id AND lv.variant_id = ",
            )
            .push_bind(variant)
            .push(")");
        }
        if let Some(product) = self.product {
            qb.push(
                " AND EXISTS (SELECT 1 FROM lookbook_variants lv JOIN variants v ON v.id = lv.variant_id WHERE lv.lookbook_id = l.id AND v.product_id = ",
            )
            .push_bind(product)
            .push(")");
        }
    }
}

#[async_trait]
impl Resource for LookBooks {
    const NAME: &'static str = "LookBook";

    type Id = LookBookId;
    type Row = LookBook;
    type Detail = LookBookDetail;
    type Write = LookBookWrite;
    type Patch = LookBookPatch;
    type Filter = LookBookFilter;

    fn config() -> &'static ResourceConfig {
        &CONFIG
    }

    async fn retrieve(state: &AppState, id: LookBookId) -> Result<LookBookDetail, AppError> {
        let repo = LookBookRepository::new(state.pool());
        let lookbook = repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(Self::NAME, id))?;
        let variants = repo.variants(id).await?;
        Ok(LookBookDetail::new(lookbook, variants))
    }

    async fn create(state: &AppState, input: &LookBookWrite) -> Result<LookBookId, AppError> {
        Ok(LookBookRepository::new(state.pool()).create(input).await?)
    }

    async fn update(
        state: &AppState,
        id: LookBookId,
        input: &LookBookWrite,
    ) -> Result<(), AppError> {
        Ok(LookBookRepository::new(state.pool()).update(id, input).await?)
    }

    async fn partial_update(
        state: &AppState,
        id: LookBookId,
        input: &LookBookPatch,
    ) -> Result<(), AppError> {
        Ok(LookBookRepository::new(state.pool()).patch(id, input).await?)
    }

    async fn delete(state: &AppState, id: LookBookId) -> Result<(), AppError> {
        Ok(LookBookRepository::new(state.pool()).delete(id).await?)
    }
}

pub fn router() -> Router<AppState> {
    crud_router::<LookBooks>("/lookbooks")
}
