//! Product image repository.
//!
//! Only storage keys are persisted; file contents live in media storage.

use sqlx::PgPool;

use catalog_core::{ProductId, ProductImageId, VariantId};

use super::RepositoryError;
use crate::models::ProductImage;

/// Base query for image rows. `pi` is the image, `p` its product.
pub const SELECT: &str = r"
    SELECT pi.id, pi.product_id AS product, pi.variant_id AS variant,
           pi.image, pi.thumbnail, pi.alt_text, pi.created_at, pi.updated_at
    FROM product_images pi
    JOIN products p ON p.id = pi.product_id";

/// Column values for an image write. `image` is the new storage key, if the
/// write carried a file.
#[derive(Debug, Clone, Copy)]
pub struct ImageFields<'a> {
    pub product: Option<ProductId>,
    pub variant: Option<VariantId>,
    pub image: Option<&'a str>,
    pub alt_text: Option<&'a str>,
}

/// Repository for product image database operations.
pub struct ProductImageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductImageRepository<'a> {
    /// Create a new product image repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an image by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductImageId) -> Result<Option<ProductImage>, RepositoryError> {
        let sql = format!("{SELECT} WHERE pi.id = $1");
        let image = sqlx::query_as::<_, ProductImage>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(image)
    }

    /// All images of a product, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product: ProductId,
    ) -> Result<Vec<ProductImage>, RepositoryError> {
        let sql = format!("{SELECT} WHERE pi.product_id = $1 ORDER BY pi.id");
        let images = sqlx::query_as::<_, ProductImage>(&sql)
            .bind(product)
            .fetch_all(self.pool)
            .await?;
        Ok(images)
    }

    /// Insert an image record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` for an unknown product or
    /// variant.
    pub async fn create(
        &self,
        product: ProductId,
        fields: ImageFields<'_>,
    ) -> Result<ProductImageId, RepositoryError> {
        let id = sqlx::query_scalar::<_, ProductImageId>(
            r"
            INSERT INTO product_images (product_id, variant_id, image, alt_text)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(product)
        .bind(fields.variant)
        .bind(fields.image)
        .bind(fields.alt_text)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Update an image record.
    ///
    /// With `replace`, `variant` and `alt_text` are overwritten even when
    /// `None`; otherwise absent values keep their stored value. A new `image`
    /// always clears the thumbnail derived from the old one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the image does not exist.
    pub async fn update(
        &self,
        id: ProductImageId,
        fields: ImageFields<'_>,
        replace: bool,
    ) -> Result<(), RepositoryError> {
        let sql = if replace {
            r"
            UPDATE product_images
            SET product_id = COALESCE($2, product_id),
                variant_id = $3,
                alt_text = $5,
                image = COALESCE($4, image),
                thumbnail = CASE WHEN $4 IS NULL THEN thumbnail ELSE NULL END,
                updated_at = now()
            WHERE id = $1
            "
        } else {
            r"
            UPDATE product_images
            SET product_id = COALESCE($2, product_id),
                variant_id = COALESCE($3, variant_id),
                alt_text = COALESCE($5, alt_text),
                image = COALESCE($4, image),
                thumbnail = CASE WHEN $4 IS NULL THEN thumbnail ELSE NULL END,
                updated_at = now()
            WHERE id = $1
            "
        };
        let result = sqlx::query(sql)
            .bind(id)
            .bind(fields.product)
            .bind(fields.variant)
            .bind(fields.image)
            .bind(fields.alt_text)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Record a thumbnail derived from `image`, provided the record still
    /// points at that image.
    ///
    /// Returns `false` when the record is gone or its image has since been
    /// replaced; nothing is written in that case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_thumbnail(
        &self,
        id: ProductImageId,
        image: &str,
        thumbnail: &str,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE product_images
            SET thumbnail = $2, updated_at = now()
            WHERE id = $1 AND image = $3
            ",
        )
        .bind(id)
        .bind(thumbnail)
        .bind(image)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an image record, returning the storage keys it referenced.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the image does not exist.
    pub async fn delete(&self, id: ProductImageId) -> Result<Vec<String>, RepositoryError> {
        let (image, thumbnail) = sqlx::query_as::<_, (Option<String>, Option<String>)>(
            "DELETE FROM product_images WHERE id = $1 RETURNING image, thumbnail",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(image.into_iter().chain(thumbnail).collect())
    }
}
