//! Order repository.

use sqlx::PgPool;

use catalog_core::OrderId;

use super::RepositoryError;
use crate::models::{Order, OrderPatch, OrderWrite};

/// Base query for order rows. `o` is the order, `u` its owner.
pub const SELECT: &str = r#"
    SELECT o.id, o.user_id AS "user", o.status, o.created_at, o.updated_at
    FROM orders o
    JOIN users u ON u.id = o.user_id"#;

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("{SELECT} WHERE o.id = $1");
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(order)
    }

    /// Insert an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference("user")` for an unknown user.
    pub async fn create(&self, input: &OrderWrite) -> Result<OrderId, RepositoryError> {
        let id = sqlx::query_scalar::<_, OrderId>(
            "INSERT INTO orders (user_id, status) VALUES ($1, $2) RETURNING id",
        )
        .bind(input.user)
        .bind(input.status)
        .fetch_one(self.pool)
        .await?;
        Ok(id)
    }

    /// Replace an order's owner and status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn update(&self, id: OrderId, input: &OrderWrite) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET user_id = $2, status = $3, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(input.user)
        .bind(input.status)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Update the fields present in `input`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn patch(&self, id: OrderId, input: &OrderPatch) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE orders
            SET user_id = COALESCE($2, user_id),
                status = COALESCE($3, status),
                updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(input.user)
        .bind(input.status)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
