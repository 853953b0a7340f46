//! Lookbook repository.

use sqlx::{PgConnection, PgPool};

use catalog_core::{LookBookId, VariantId};

use super::RepositoryError;
use crate::models::{LookBook, LookBookPatch, LookBookVariant, LookBookWrite};

/// Base query for lookbook rows. `l` is the lookbook.
pub const SELECT: &str = r"
    SELECT l.id, l.name, l.description,
           COALESCE(
               (SELECT array_agg(lv.variant_id ORDER BY lv.variant_id)
                FROM lookbook_variants lv
                WHERE lv.lookbook_id = l.id),
               '{}') AS variants,
           l.created_at, l.updated_at
    FROM lookbooks l";

/// Repository for lookbook database operations.
pub struct LookBookRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LookBookRepository<'a> {
    /// Create a new lookbook repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a lookbook by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: LookBookId) -> Result<Option<LookBook>, RepositoryError> {
        let sql = format!("{SELECT} WHERE l.id = $1");
        let lookbook = sqlx::query_as::<_, LookBook>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(lookbook)
    }

    /// The lookbook's variants with their products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn variants(&self, id: LookBookId) -> Result<Vec<LookBookVariant>, RepositoryError> {
        let variants = sqlx::query_as::<_, LookBookVariant>(
            r"
            SELECT v.id, v.sku, v.product_id AS product, p.name AS product_name
            FROM lookbook_variants lv
            JOIN variants v ON v.id = lv.variant_id
            JOIN products p ON p.id = v.product_id
            WHERE lv.lookbook_id = $1
            ORDER BY v.id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;
        Ok(variants)
    }

    /// Insert a lookbook together with its variant set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference("variants")` if any variant
    /// does not exist; nothing is written in that case.
    pub async fn create(&self, input: &LookBookWrite) -> Result<LookBookId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, LookBookId>(
            "INSERT INTO lookbooks (name, description) VALUES ($1, $2) RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(&mut *tx)
        .await?;
        replace_variants(&mut tx, id, &input.variants).await?;

        tx.commit().await?;
        Ok(id)
    }

    /// Replace a lookbook's fields and variant set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the lookbook does not exist.
    pub async fn update(&self, id: LookBookId, input: &LookBookWrite) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE lookbooks SET name = $2, description = $3, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        replace_variants(&mut tx, id, &input.variants).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Update the fields present in `input`; a present `variants` list
    /// replaces the set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the lookbook does not exist.
    pub async fn patch(&self, id: LookBookId, input: &LookBookPatch) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE lookbooks
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        if let Some(variants) = &input.variants {
            replace_variants(&mut tx, id, variants).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete a lookbook.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the lookbook does not exist.
    pub async fn delete(&self, id: LookBookId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM lookbooks WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

async fn replace_variants(
    conn: &mut PgConnection,
    lookbook: LookBookId,
    variants: &[VariantId],
) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM lookbook_variants WHERE lookbook_id = $1")
        .bind(lookbook)
        .execute(&mut *conn)
        .await?;

    if !variants.is_empty() {
        sqlx::query(
            r"
            INSERT INTO lookbook_variants (lookbook_id, variant_id)
            SELECT DISTINCT $1, unnest($2::int4[])
            ",
        )
        .bind(lookbook)
        .bind(variants)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
