//! Collection item repository.
//!
//! `collection_items` has no uniqueness on `(collection_id, product_id)`:
//! attaching the same product twice creates two rows.

use sqlx::PgPool;

use catalog_core::CollectionItemId;

use super::RepositoryError;
use crate::models::{CollectionItem, CollectionItemPatch, NewCollectionItem};

/// Base query for item rows. `ci` is the item, `c` its collection and `p`
/// its product.
pub const SELECT: &str = r"
    SELECT ci.id, ci.collection_id AS collection, c.name AS collection_name,
           ci.product_id AS product, p.name AS product_name, ci.created_at
    FROM collection_items ci
    JOIN collections c ON c.id = ci.collection_id
    JOIN products p ON p.id = ci.product_id";

/// Repository for collection item database operations.
pub struct CollectionItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CollectionItemRepository<'a> {
    /// Create a new collection item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an item by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        id: CollectionItemId,
    ) -> Result<Option<CollectionItem>, RepositoryError> {
        let sql = format!("{SELECT} WHERE ci.id = $1");
        let item = sqlx::query_as::<_, CollectionItem>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(item)
    }

    /// Attach a product to a collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference("collection" | "product")`
    /// if either end does not exist.
    pub async fn create(&self, item: NewCollectionItem) -> Result<CollectionItemId, RepositoryError> {
        let id = sqlx::query_scalar::<_, CollectionItemId>(
            r"
            INSERT INTO collection_items (collection_id, product_id)
            VALUES ($1, $2)
            RETURNING id
            ",
        )
        .bind(item.collection)
        .bind(item.product)
        .fetch_one(self.pool)
        .await?;

        tracing::info!(
            item = %id,
            collection = %item.collection,
            product = %item.product,
            "Product added to collection"
        );
        Ok(id)
    }

    /// Point an item at a different collection and/or product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item does not exist.
    pub async fn update(
        &self,
        id: CollectionItemId,
        input: CollectionItemPatch,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE collection_items
            SET collection_id = COALESCE($2, collection_id),
                product_id = COALESCE($3, product_id)
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(input.collection)
        .bind(input.product)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete an item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item does not exist.
    pub async fn delete(&self, id: CollectionItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM collection_items WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
