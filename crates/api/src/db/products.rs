//! Product repository.

use sqlx::PgPool;

use catalog_core::ProductId;

use super::RepositoryError;
use crate::models::{Product, ProductPatch, ProductWrite};

/// Base query for product rows; the `p` alias is used by filters and search.
pub const SELECT: &str = r"
    SELECT p.id, p.name, p.short_description, p.description, p.sku,
           p.price, p.selling_price, p.condition,
           p.category_id AS category, p.brand_id AS brand,
           p.is_disabled, p.hsn_code, p.rating, p.no_of_reviews, p.tags,
           p.dimension, p.created_at, p.updated_at
    FROM products p";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("{SELECT} WHERE p.id = $1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(product)
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict("sku")` for a duplicate SKU and
    /// `RepositoryError::InvalidReference` for an unknown category or brand.
    pub async fn create(&self, input: &ProductWrite) -> Result<ProductId, RepositoryError> {
        let id = sqlx::query_scalar::<_, ProductId>(
            r"
            INSERT INTO products (name, short_description, description, sku, price,
                                  selling_price, condition, category_id, brand_id,
                                  is_disabled, hsn_code, tags, dimension)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            ",
        )
        .bind(&input.name)
        .bind(&input.short_description)
        .bind(&input.description)
        .bind(&input.sku)
        .bind(input.price)
        .bind(input.selling_price)
        .bind(input.condition)
        .bind(input.category)
        .bind(input.brand)
        .bind(input.is_disabled)
        .bind(&input.hsn_code)
        .bind(&input.tags)
        .bind(&input.dimension)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Replace every writable field of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn update(&self, id: ProductId, input: &ProductWrite) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET name = $2, short_description = $3, description = $4, sku = $5,
                price = $6, selling_price = $7, condition = $8, category_id = $9,
                brand_id = $10, is_disabled = $11, hsn_code = $12, tags = $13,
                dimension = $14, updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.short_description)
        .bind(&input.description)
        .bind(&input.sku)
        .bind(input.price)
        .bind(input.selling_price)
        .bind(input.condition)
        .bind(input.category)
        .bind(input.brand)
        .bind(input.is_disabled)
        .bind(&input.hsn_code)
        .bind(&input.tags)
        .bind(&input.dimension)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Update only the fields present in `input`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn patch(&self, id: ProductId, input: &ProductPatch) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET name = COALESCE($2, name),
                short_description = COALESCE($3, short_description),
                description = COALESCE($4, description),
                sku = COALESCE($5, sku),
                price = COALESCE($6, price),
                selling_price = COALESCE($7, selling_price),
                condition = COALESCE($8, condition),
                category_id = COALESCE($9, category_id),
                brand_id = COALESCE($10, brand_id),
                is_disabled = COALESCE($11, is_disabled),
                hsn_code = COALESCE($12, hsn_code),
                tags = COALESCE($13, tags),
                dimension = COALESCE($14, dimension),
                updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.short_description)
        .bind(&input.description)
        .bind(&input.sku)
        .bind(input.price)
        .bind(input.selling_price)
        .bind(input.condition)
        .bind(input.category)
        .bind(input.brand)
        .bind(input.is_disabled)
        .bind(&input.hsn_code)
        .bind(&input.tags)
        .bind(&input.dimension)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Set the disabled flag, returning the product's name.
    ///
    /// Setting the flag to its current value still succeeds.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn set_disabled(
        &self,
        id: ProductId,
        disabled: bool,
    ) -> Result<String, RepositoryError> {
        sqlx::query_scalar::<_, String>(
            r"
            UPDATE products
            SET is_disabled = $2, updated_at = now()
            WHERE id = $1
            RETURNING name
            ",
        )
        .bind(id)
        .bind(disabled)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product; variants, images and collection items cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
