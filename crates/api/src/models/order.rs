//! Customer orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use catalog_core::{OrderId, OrderStatus, UserId};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user: UserId,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full order payload. A new order starts out `pending`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderWrite {
    pub user: UserId,
    #[serde(default)]
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct OrderPatch {
    pub user: Option<UserId>,
    pub status: Option<OrderStatus>,
}
