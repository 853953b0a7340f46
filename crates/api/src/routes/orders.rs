//! Customer orders and their status.

use async_trait::async_trait;
use axum::Router;
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

use catalog_core::{OrderId, OrderStatus, UserId};

use crate::db::{OrderRepository, orders};
use crate::error::AppError;
use crate::models::{Order, OrderPatch, OrderWrite};
use crate::resource::{FilterSet, Resource, ResourceConfig, crud_router};
use crate::state::AppState;

static CONFIG: ResourceConfig = ResourceConfig {
    select: orders::SELECT,
    id_column: "o.id",
    search_fields: &["u.username", "u.email"],
    default_fields: &["user", "status", "created_at"],
    order_by: "o.created_at DESC, o.id DESC",
};

pub struct Orders;

#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub user: Option<UserId>,
    pub status: Option<OrderStatus>,
}

impl FilterSet for OrderFilter {
    fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(user) = self.user {
            qb.push(" AND o.user_id = ").push_bind(user);
        }
        if let Some(status) = self.status {
            qb.push(" AND o.status = ").push_bind(status);
        }
    }
}

#[async_trait]
impl Resource for Orders {
    const NAME: &'static str = "Order";

    type Id = OrderId;
    type Row = Order;
    type Detail = Order;
    type Write = OrderWrite;
    type Patch = OrderPatch;
    type Filter = OrderFilter;

    fn config() -> &'static ResourceConfig {
        &CONFIG
    }

    async fn retrieve(state: &AppState, id: OrderId) -> Result<Order, AppError> {
        OrderRepository::new(state.pool())
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(Self::NAME, id))
    }

    async fn create(state: &AppState, input: &OrderWrite) -> Result<OrderId, AppError> {
        Ok(OrderRepository::new(state.pool()).create(input).await?)
    }

    async fn update(state: &AppState, id: OrderId, input: &OrderWrite) -> Result<(), AppError> {
        Ok(OrderRepository::new(state.pool()).update(id, input).await?)
    }

    async fn partial_update(
        state: &AppState,
        id: OrderId,
        input: &OrderPatch,
    ) -> Result<(), AppError> {
        Ok(OrderRepository::new(state.pool()).patch(id, input).await?)
    }

    async fn delete(state: &AppState, id: OrderId) -> Result<(), AppError> {
        Ok(OrderRepository::new(state.pool()).delete(id).await?)
    }
}

pub fn router() -> Router<AppState> {
    crud_router::<Orders>("/orders")
}
