//! Address register. Every representation embeds the owner as `user`.

use async_trait::async_trait;
use axum::Router;
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

use catalog_core::{AddressId, UserId};

use crate::db::{AddressRepository, addresses};
use crate::error::AppError;
use crate::models::{Address, AddressPatch, AddressWrite};
use crate::resource::{FilterSet, Resource, ResourceConfig, crud_router};
use crate::state::AppState;

static CONFIG: ResourceConfig = ResourceConfig {
    select: addresses::SELECT,
    id_column: "a.id",
    search_fields: &["a.full_name", "a.city", "u.username"],
    default_fields: &[
        "user",
        "full_name",
        "line1",
        "city",
        "postal_code",
        "country",
        "is_default",
    ],
    order_by: "a.created_at DESC, a.id DESC",
};

pub struct Addresses;

#[derive(Debug, Default, Deserialize)]
pub struct AddressFilter {
    pub user: Option<UserId>,
    pub country: Option<String>,
    pub is_default: Option<bool>,
}

impl FilterSet for AddressFilter {
    fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(user) = self.user {
            qb.push(" AND a.user_id = ").push_bind(user);
        }
        if let Some(country) = &self.country {
            qb.push(" AND a.country = ").push_bind(country.clone());
        }
        if let Some(is_default) = self.is_default {
            qb.push(" AND a.is_default = ").push_bind(is_default);
        }
    }
}

#[async_trait]
impl Resource for Addresses {
    const NAME: &'static str = "Address";

    type Id = AddressId;
    type Row = Address;
    type Detail = Address;
    type Write = AddressWrite;
    type Patch = AddressPatch;
    type Filter = AddressFilter;

    fn config() -> &'static ResourceConfig {
        &CONFIG
    }

    async fn retrieve(state: &AppState, id: AddressId) -> Result<Address, AppError> {
        AddressRepository::new(state.pool())
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(Self::NAME, id))
    }

    async fn create(state: &AppState, input: &AddressWrite) -> Result<AddressId, AppError> {
        Ok(AddressRepository::new(state.pool()).create(input).await?)
    }

    async fn update(state: &AppState, id: AddressId, input: &AddressWrite) -> Result<(), AppError> {
        Ok(AddressRepository::new(state.pool()).update(id, input).await?)
    }

    async fn partial_update(
        state: &AppState,
        id: AddressId,
        input: &AddressPatch,
    ) -> Result<(), AppError> {
        Ok(AddressRepository::new(state.pool()).patch(id, input).await?)
    }

    async fn delete(state: &AppState, id: AddressId) -> Result<(), AppError> {
        Ok(AddressRepository::new(state.pool()).delete(id).await?)
    }
}

pub fn router() -> Router<AppState> {
    crud_router::<Addresses>("/addresses")
}
