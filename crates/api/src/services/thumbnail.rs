//! Thumbnail derivation for product images.
//!
//! A thumbnail is a JPEG no larger than `THUMBNAIL_MAX_EDGE` on its longest
//! side, stored beside the original as `thumbnail_<stem>.jpg`.

use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use thiserror::Error;

use super::media::{MediaError, MediaStorage};
use crate::config::MediaConfig;

/// Errors from thumbnail derivation.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    /// The upload is not an image we can read.
    #[error("could not decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("could not encode thumbnail: {0}")]
    Encode(#[source] image::ImageError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("thumbnail task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Size and quality of derived thumbnails.
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailSpec {
    pub max_edge: u32,
    pub quality: u8,
}

impl From<&MediaConfig> for ThumbnailSpec {
    fn from(config: &MediaConfig) -> Self {
        Self {
            max_edge: config.thumbnail_max_edge,
            quality: config.thumbnail_quality,
        }
    }
}

/// Decode `bytes`, shrink to fit `spec.max_edge` and re-encode as JPEG.
///
/// Images already within bounds are re-encoded at their own size.
///
/// # Errors
///
/// Returns `ThumbnailError::Decode` for unreadable input and
/// `ThumbnailError::Encode` if JPEG encoding fails.
pub fn render(bytes: &[u8], spec: ThumbnailSpec) -> Result<Vec<u8>, ThumbnailError> {
    let img = image::load_from_memory(bytes).map_err(ThumbnailError::Decode)?;
    let img = if img.width() > spec.max_edge || img.height() > spec.max_edge {
        img.thumbnail(spec.max_edge, spec.max_edge)
    } else {
        img
    };

    // JPEG has no alpha channel
    let rgb = img.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, spec.quality)
        .encode_image(&rgb)
        .map_err(ThumbnailError::Encode)?;
    Ok(out)
}

/// Storage key of the thumbnail derived from `image_key`.
#[must_use]
pub fn thumbnail_key(image_key: &str) -> String {
    let path = Path::new(image_key);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let name = format!("thumbnail_{stem}.jpg");
    match path.parent().and_then(|p| p.to_str()).filter(|p| !p.is_empty()) {
        Some(dir) => format!("{dir}/{name}"),
        None => name,
    }
}

/// Render a thumbnail of `bytes` off the async runtime and store it next to
/// `image_key`. Returns the thumbnail's storage key.
///
/// # Errors
///
/// Returns any `ThumbnailError`; nothing is written on failure.
pub async fn derive(
    media: &MediaStorage,
    image_key: &str,
    bytes: Vec<u8>,
    spec: ThumbnailSpec,
) -> Result<String, ThumbnailError> {
    let jpeg = tokio::task::spawn_blocking(move || render(&bytes, spec)).await??;
    let key = thumbnail_key(image_key);
    media.write(&key, &jpeg).await?;
    tracing::debug!(image = image_key, thumbnail = %key, size = jpeg.len(), "Thumbnail stored");
    Ok(key)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, RgbImage};

    use super::*;

    const SPEC: ThumbnailSpec = ThumbnailSpec {
        max_edge: 320,
        quality: 70,
    };

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([200, 30, 30]),
        ));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_render_shrinks_to_max_edge() {
        let jpeg = render(&png(800, 400), SPEC).unwrap();
        let thumb = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(thumb.width(), 320);
        assert_eq!(thumb.height(), 160);
        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_render_keeps_small_images() {
        let jpeg = render(&png(100, 50), SPEC).unwrap();
        let thumb = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (100, 50));
    }

    #[test]
    fn test_render_rejects_corrupt_bytes() {
        let err = render(b"definitely not an image", SPEC).unwrap_err();
        assert!(matches!(err, ThumbnailError::Decode(_)));
    }

    #[test]
    fn test_thumbnail_key() {
        assert_eq!(
            thumbnail_key("product_images/ab12cd34_red-shirt.png"),
            "product_images/thumbnail_ab12cd34_red-shirt.jpg"
        );
        assert_eq!(thumbnail_key("front.webp"), "thumbnail_front.jpg");
    }

    #[tokio::test]
    async fn test_derive_writes_beside_original() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStorage::new(&MediaConfig {
            root: dir.path().to_path_buf(),
            url: "/media".to_string(),
            thumbnail_max_edge: 64,
            thumbnail_quality: 60,
        });

        let key = derive(
            &media,
            "product_images/x_front.png",
            png(256, 256),
            ThumbnailSpec {
                max_edge: 64,
                quality: 60,
            },
        )
        .await
        .unwrap();

        assert_eq!(key, "product_images/thumbnail_x_front.jpg");
        let stored = std::fs::read(dir.path().join(&key)).unwrap();
        let thumb = image::load_from_memory(&stored).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (64, 64));
    }
}
