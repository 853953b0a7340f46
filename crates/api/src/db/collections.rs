//! Collection repository.

use sqlx::PgPool;

use catalog_core::CollectionId;

use super::RepositoryError;
use crate::models::{Collection, CollectionPatch, CollectionWrite};

/// Base query for collection rows, with their items embedded. `c` is the
/// collection.
pub const SELECT: &str = r"
    SELECT c.id, c.name, c.description,
           COALESCE(
               (SELECT json_agg(json_build_object(
                           'id', ci.id,
                           'product', ci.product_id,
                           'product_name', pr.name) ORDER BY ci.id)
                FROM collection_items ci
                JOIN products pr ON pr.id = ci.product_id
                WHERE ci.collection_id = c.id),
               '[]'::json) AS items,
           c.created_at, c.updated_at
    FROM collections c";

/// Repository for collection database operations.
pub struct CollectionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CollectionRepository<'a> {
    /// Create a new collection repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a collection by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CollectionId) -> Result<Option<Collection>, RepositoryError> {
        let sql = format!("{SELECT} WHERE c.id = $1");
        let collection = sqlx::query_as::<_, Collection>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(collection)
    }

    /// Insert a collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &CollectionWrite) -> Result<CollectionId, RepositoryError> {
        let id = sqlx::query_scalar::<_, CollectionId>(
            "INSERT INTO collections (name, description) VALUES ($1, $2) RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(self.pool)
        .await?;
        Ok(id)
    }

    /// Replace a collection's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the collection does not exist.
    pub async fn update(
        &self,
        id: CollectionId,
        input: &CollectionWrite,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE collections
            SET name = $2, description = $3, updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
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
    /// Returns `RepositoryError::NotFound` if the collection does not exist.
    pub async fn patch(
        &self,
        id: CollectionId,
        input: &CollectionPatch,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE collections
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a collection; its items cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the collection does not exist.
    pub async fn delete(&self, id: CollectionId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
