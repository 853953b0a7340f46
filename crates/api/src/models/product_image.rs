//! Product image domain types.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use catalog_core::{ProductId, ProductImageId, VariantId};

/// A product image record.
///
/// `image` and `thumbnail` hold storage keys in the database and public URLs
/// once presented to a client.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub product: ProductId,
    pub variant: Option<VariantId>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub alt_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An uploaded file, sent as `{"file_name": "...", "content": "<base64>"}`.
///
/// The content is decoded during deserialization; whether the bytes are a
/// readable image is only discovered when the thumbnail is derived.
#[derive(Clone, Deserialize)]
#[serde(try_from = "RawUpload")]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Deserialize)]
struct RawUpload {
    file_name: String,
    content: String,
}

impl TryFrom<RawUpload> for ImageUpload {
    type Error = String;

    fn try_from(raw: RawUpload) -> Result<Self, Self::Error> {
        if raw.file_name.trim().is_empty() {
            return Err("image file_name may not be blank".to_string());
        }
        let bytes = STANDARD
            .decode(raw.content.trim())
            .map_err(|e| format!("image content is not valid base64: {e}"))?;
        if bytes.is_empty() {
            return Err("image content is empty".to_string());
        }
        Ok(Self {
            file_name: raw.file_name,
            bytes,
        })
    }
}

/// Full image payload for create and replace.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductImageWrite {
    pub product: ProductId,
    pub variant: Option<VariantId>,
    pub image: Option<ImageUpload>,
    #[validate(length(max = 255))]
    pub alt_text: Option<String>,
}

/// Partial image payload; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductImagePatch {
    pub product: Option<ProductId>,
    pub variant: Option<VariantId>,
    pub image: Option<ImageUpload>,
    #[validate(length(max = 255))]
    pub alt_text: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_decodes_base64() {
        let write: ProductImageWrite = serde_json::from_value(serde_json::json!({
            "product": 1,
            "image": {"file_name": "front.png", "content": STANDARD.encode(b"not really a png")},
        }))
        .unwrap();

        let upload = write.image.unwrap();
        assert_eq!(upload.file_name, "front.png");
        assert_eq!(upload.bytes, b"not really a png");
        assert!(format!("{upload:?}").contains("len"));
    }

    #[test]
    fn test_upload_rejects_bad_base64() {
        let result = serde_json::from_value::<ProductImageWrite>(serde_json::json!({
            "product": 1,
            "image": {"file_name": "front.png", "content": "%%%"},
        }));
        assert!(result.unwrap_err().to_string().contains("base64"));
    }

    #[test]
    fn test_upload_requires_file_name() {
        let result = serde_json::from_value::<ProductImagePatch>(serde_json::json!({
            "image": {"file_name": "", "content": STANDARD.encode(b"x")},
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_image_is_optional() {
        let write: ProductImageWrite =
            serde_json::from_value(serde_json::json!({"product": 1, "alt_text": "Front"}))
                .unwrap();
        assert!(write.image.is_none());
        assert!(write.validate().is_ok());
    }
}
