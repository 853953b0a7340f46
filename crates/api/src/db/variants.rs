//! Variant repository, including the nested attribute upsert.
//!
//! A variant write and its attribute entries commit or roll back together.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use thiserror::Error;

use catalog_core::{ProductId, VariantAttributeId, VariantId};

use super::RepositoryError;
use crate::models::variant::{AttributeOp, ForeignAttribute, plan_attribute_upsert};
use crate::models::{AttributeEntry, Variant, VariantPatch, VariantWrite};

/// Base query for variant rows. `v` is the variant, `p` its product.
pub const SELECT: &str = r"
    SELECT v.id, v.product_id AS product, v.sku, v.price, v.stock,
           COALESCE(
               (SELECT json_agg(json_build_object(
                           'id', va.id,
                           'attributes', va.attribute_id,
                           'attribute_name', a.name,
                           'value', va.value) ORDER BY va.id)
                FROM variant_attributes va
                JOIN attributes a ON a.id = va.attribute_id
                WHERE va.variant_id = v.id),
               '[]'::json) AS attributes,
           v.created_at, v.updated_at
    FROM variants v
    JOIN products p ON p.id = v.product_id";

/// Errors from a variant write with nested attributes.
#[derive(Debug, Error)]
pub enum VariantWriteError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    ForeignAttribute(#[from] ForeignAttribute),
}

impl From<sqlx::Error> for VariantWriteError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(err.into())
    }
}

/// Repository for variant database operations.
pub struct VariantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VariantRepository<'a> {
    /// Create a new variant repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a variant by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: VariantId) -> Result<Option<Variant>, RepositoryError> {
        let sql = format!("{SELECT} WHERE v.id = $1");
        let variant = sqlx::query_as::<_, Variant>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(variant)
    }

    /// All variants of a product, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product: ProductId,
    ) -> Result<Vec<Variant>, RepositoryError> {
        let sql = format!("{SELECT} WHERE v.product_id = $1 ORDER BY v.id");
        let variants = sqlx::query_as::<_, Variant>(&sql)
            .bind(product)
            .fetch_all(self.pool)
            .await?;
        Ok(variants)
    }

    /// Name of the product a variant belongs to.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant does not exist.
    pub async fn product_name(&self, id: VariantId) -> Result<String, RepositoryError> {
        sqlx::query_scalar::<_, String>(
            "SELECT p.name FROM variants v JOIN products p ON p.id = v.product_id WHERE v.id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Insert a variant and all of its attribute entries.
    ///
    /// # Errors
    ///
    /// Entries carrying an `id` are rejected with `ForeignAttribute`, since a
    /// new variant owns no rows yet.
    pub async fn create(&self, input: &VariantWrite) -> Result<VariantId, VariantWriteError> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, VariantId>(
            r"
            INSERT INTO variants (product_id, sku, price, stock)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(input.product)
        .bind(&input.sku)
        .bind(input.price)
        .bind(input.stock)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(entries) = &input.attributes {
            upsert_attributes(&mut tx, id, entries).await?;
        }

        tx.commit().await?;
        Ok(id)
    }

    /// Replace the variant's own fields and upsert any attribute entries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant does not exist and
    /// `ForeignAttribute` if an entry names another variant's row.
    pub async fn update(&self, id: VariantId, input: &VariantWrite) -> Result<(), VariantWriteError> {
        let fields = VariantFields {
            product: Some(input.product),
            sku: Some(input.sku.as_deref()),
            price: Some(input.price),
            stock: Some(input.stock),
        };
        self.save(id, fields, input.attributes.as_deref()).await
    }

    /// Update the fields present in `input` and upsert any attribute entries.
    ///
    /// An explicit `null` clears `sku` or `price`. Omitting `attributes`
    /// leaves every attribute row untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant does not exist and
    /// `ForeignAttribute` if an entry names another variant's row.
    pub async fn patch(&self, id: VariantId, input: &VariantPatch) -> Result<(), VariantWriteError> {
        let fields = VariantFields {
            product: input.product,
            sku: input.sku.as_ref().map(Option::as_deref),
            price: input.price,
            stock: input.stock,
        };
        self.save(id, fields, input.attributes.as_deref()).await
    }

    async fn save(
        &self,
        id: VariantId,
        fields: VariantFields<'_>,
        entries: Option<&[AttributeEntry]>,
    ) -> Result<(), VariantWriteError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE variants
            SET product_id = COALESCE($2, product_id),
                sku = CASE WHEN $6 THEN $3 ELSE sku END,
                price = CASE WHEN $7 THEN $4 ELSE price END,
                stock = COALESCE($5, stock),
                updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(fields.product)
        .bind(fields.sku.flatten())
        .bind(fields.price.flatten())
        .bind(fields.stock)
        .bind(fields.sku.is_some())
        .bind(fields.price.is_some())
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound.into());
        }

        if let Some(entries) = entries {
            upsert_attributes(&mut tx, id, entries).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete a variant; its attributes and images cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant does not exist.
    pub async fn delete(&self, id: VariantId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM variants WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// Column values for an update. The outer `Option` on `sku` and `price`
/// is "touch this column"; the inner one is the value written.
struct VariantFields<'a> {
    product: Option<ProductId>,
    sku: Option<Option<&'a str>>,
    price: Option<Option<Decimal>>,
    stock: Option<i32>,
}

/// Apply attribute entries to `variant` inside the caller's transaction.
///
/// The variant's rows are locked first, so a concurrent upsert on the same
/// variant waits rather than interleaving.
async fn upsert_attributes(
    conn: &mut PgConnection,
    variant: VariantId,
    entries: &[AttributeEntry],
) -> Result<(), VariantWriteError> {
    let owned = sqlx::query_scalar::<_, VariantAttributeId>(
        "SELECT id FROM variant_attributes WHERE variant_id = $1 FOR UPDATE",
    )
    .bind(variant)
    .fetch_all(&mut *conn)
    .await?;

    for op in plan_attribute_upsert(variant, &owned, entries)? {
        match op {
            AttributeOp::Update {
                id,
                attribute,
                value,
            } => {
                sqlx::query(
                    r"
                    UPDATE variant_attributes
                    SET attribute_id = $3, value = $4
                    WHERE id = $1 AND variant_id = $2
                    ",
                )
                .bind(id)
                .bind(variant)
                .bind(attribute)
                .bind(value)
                .execute(&mut *conn)
                .await?;
            }
            AttributeOp::Insert { attribute, value } => {
                sqlx::query(
                    r"
                    INSERT INTO variant_attributes (variant_id, attribute_id, value)
                    VALUES ($1, $2, $3)
                    ",
                )
                .bind(variant)
                .bind(attribute)
                .bind(value)
                .execute(&mut *conn)
                .await?;
            }
        }
    }

    tracing::debug!(%variant, entries = entries.len(), "Variant attributes upserted");
    Ok(())
}
