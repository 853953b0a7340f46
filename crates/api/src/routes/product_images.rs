//! Product images and thumbnail derivation.
//!
//! The upload is stored as part of the primary save. The thumbnail is a
//! secondary effect: if the bytes cannot be decoded the image record is kept
//! without one.

use async_trait::async_trait;
use axum::Router;
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

use catalog_core::{ProductId, ProductImageId, VariantId};

use crate::db::product_images::ImageFields;
use crate::db::{ProductImageRepository, product_images};
use crate::error::AppError;
use crate::models::{ImageUpload, ProductImage, ProductImagePatch, ProductImageWrite};
use crate::resource::{FilterSet, Resource, ResourceConfig, SideEffectError, Written, crud_router};
use crate::services::thumbnail::{self, ThumbnailSpec};
use crate::state::AppState;

/// Media directory for originals and their thumbnails.
pub const UPLOAD_DIR: &str = "product_images";

static CONFIG: ResourceConfig = ResourceConfig {
    select: product_images::SELECT,
    id_column: "pi.id",
    search_fields: &["p.name"],
    default_fields: &["product", "variant", "image", "thumbnail", "alt_text"],
    order_by: "pi.created_at DESC, pi.id DESC",
};

pub struct ProductImages;

#[derive(Debug, Default, Deserialize)]
pub struct ProductImageFilter {
    pub product: Option<ProductId>,
    pub variant: Option<VariantId>,
}

impl FilterSet for ProductImageFilter {
    fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(product) = self.product {
            qb.push(" AND pi.product_id = ").push_bind(product);
        }
        if let Some(variant) = self.variant {
            qb.push(" AND pi.variant_id = ").push_bind(variant);
        }
    }
}

#[async_trait]
impl Resource for ProductImages {
    const NAME: &'static str = "ProductImage";

    type Id = ProductImageId;
    type Row = ProductImage;
    type Detail = ProductImage;
    type Write = ProductImageWrite;
    type Patch = ProductImagePatch;
    type Filter = ProductImageFilter;

    fn config() -> &'static ResourceConfig {
        &CONFIG
    }

    async fn retrieve(state: &AppState, id: ProductImageId) -> Result<ProductImage, AppError> {
        let image = ProductImageRepository::new(state.pool())
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(Self::NAME, id))?;
        Ok(Self::present(state, image))
    }

    async fn create(state: &AppState, input: &ProductImageWrite) -> Result<ProductImageId, AppError> {
        let key = store_upload(state, input.image.as_ref()).await?;
        let fields = ImageFields {
            product: Some(input.product),
            variant: input.variant,
            image: key.as_deref(),
            alt_text: input.alt_text.as_deref(),
        };

        match ProductImageRepository::new(state.pool())
            .create(input.product, fields)
            .await
        {
            Ok(id) => Ok(id),
            Err(err) => {
                discard(state, key.as_slice()).await;
                Err(err.into())
            }
        }
    }

    async fn update(
        state: &AppState,
        id: ProductImageId,
        input: &ProductImageWrite,
    ) -> Result<(), AppError> {
        let fields = ImageFields {
            product: Some(input.product),
            variant: input.variant,
            image: None,
            alt_text: input.alt_text.as_deref(),
        };
        save(state, id, fields, input.image.as_ref(), true).await
    }

    async fn partial_update(
        state: &AppState,
        id: ProductImageId,
        input: &ProductImagePatch,
    ) -> Result<(), AppError> {
        let fields = ImageFields {
            product: input.product,
            variant: input.variant,
            image: None,
            alt_text: input.alt_text.as_deref(),
        };
        save(state, id, fields, input.image.as_ref(), false).await
    }

    async fn delete(state: &AppState, id: ProductImageId) -> Result<(), AppError> {
        let keys = ProductImageRepository::new(state.pool()).delete(id).await?;
        discard(state, &keys).await;
        Ok(())
    }

    async fn perform_db_action(
        state: &AppState,
        row: &ProductImage,
        written: Written<'_, Self>,
    ) -> Result<Option<ProductImage>, SideEffectError> {
        let upload = match written {
            Written::Created(input) | Written::Replaced(input) => input.image.as_ref(),
            Written::Patched(input) => input.image.as_ref(),
        };
        let (Some(upload), Some(image_key)) = (upload, row.image.as_deref()) else {
            return Ok(None);
        };

        let spec = ThumbnailSpec::from(&state.config().media);
        let thumbnail_key = thumbnail::derive(state.media(), image_key, upload.bytes.clone(), spec)
            .await
            .map_err(|e| SideEffectError::new("thumbnail", e))?;
        let recorded = ProductImageRepository::new(state.pool())
            .set_thumbnail(row.id, image_key, &thumbnail_key)
            .await
            .map_err(|e| SideEffectError::new("thumbnail", e))?;
        if !recorded {
            // A newer write replaced the image while this one was resizing
            tracing::debug!(image_id = %row.id, image = image_key, "Discarding superseded thumbnail");
            discard(state, &[thumbnail_key]).await;
            return Ok(None);
        }

        Ok(Some(ProductImage {
            thumbnail: Some(thumbnail_key),
            ..row.clone()
        }))
    }

    fn present(state: &AppState, row: ProductImage) -> ProductImage {
        let media = state.media();
        ProductImage {
            image: row.image.as_deref().map(|key| media.url(key)),
            thumbnail: row.thumbnail.as_deref().map(|key| media.url(key)),
            ..row
        }
    }
}

pub fn router() -> Router<AppState> {
    crud_router::<ProductImages>("/product-images")
}

/// Update an existing record, storing a new upload first if there is one.
///
/// Files of a replaced image are removed once the row points elsewhere.
async fn save(
    state: &AppState,
    id: ProductImageId,
    fields: ImageFields<'_>,
    upload: Option<&ImageUpload>,
    replace: bool,
) -> Result<(), AppError> {
    let repo = ProductImageRepository::new(state.pool());
    let previous = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(ProductImages::NAME, id))?;

    let key = store_upload(state, upload).await?;
    let fields = ImageFields {
        image: key.as_deref(),
        ..fields
    };

    if let Err(err) = repo.update(id, fields, replace).await {
        discard(state, key.as_slice()).await;
        return Err(err.into());
    }

    if key.is_some() {
        let stale: Vec<String> = previous
            .image
            .into_iter()
            .chain(previous.thumbnail)
            .collect();
        discard(state, &stale).await;
    }
    Ok(())
}

async fn store_upload(
    state: &AppState,
    upload: Option<&ImageUpload>,
) -> Result<Option<String>, AppError> {
    let Some(upload) = upload else {
        return Ok(None);
    };
    let key = state
        .media()
        .save_upload(UPLOAD_DIR, &upload.file_name, &upload.bytes)
        .await?;
    tracing::debug!(key = %key, size = upload.bytes.len(), "Image stored");
    Ok(Some(key))
}

/// Remove stored files, logging failures.
async fn discard(state: &AppState, keys: &[String]) {
    for key in keys {
        if let Err(err) = state.media().delete(key).await {
            tracing::warn!(key = %key, error = %err, "Failed to remove media file");
        }
    }
}
