//! Local filesystem storage for uploaded media.
//!
//! Files are addressed by a storage key such as
//! `product_images/3f2a9c1e_red-shirt.png`. The key is what the database
//! stores; [`MediaStorage::url`] turns it into the public address under which
//! `ServeDir` exposes the media root.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use crate::config::MediaConfig;

/// Errors from media storage operations.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media I/O failed for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid media key: {0}")]
    InvalidKey(String),
}

/// Media files stored under a root directory.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    url: String,
}

impl MediaStorage {
    #[must_use]
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            root: config.root.clone(),
            url: config.url.clone(),
        }
    }

    /// Store an upload under `dir`, returning its new storage key.
    ///
    /// The key gets a random prefix so two uploads with the same file name
    /// never overwrite each other.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Io` if the file cannot be written.
    pub async fn save_upload(
        &self,
        dir: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, MediaError> {
        let prefix = Uuid::new_v4().simple().to_string();
        let key = format!(
            "{dir}/{}_{}",
            prefix.get(..8).unwrap_or(&prefix),
            sanitize_file_name(file_name)
        );
        self.write(&key, bytes).await?;
        Ok(key)
    }

    /// Write `bytes` at `key`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::InvalidKey` for keys escaping the root and
    /// `MediaError::Io` if the write fails.
    pub async fn write(&self, key: &str, bytes: &[u8]) -> Result<(), MediaError> {
        let path = self.path(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| io_error(key, source))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| io_error(key, source))
    }

    /// Remove the file at `key`. Missing files are not an error.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Io` if the file exists but cannot be removed.
    pub async fn delete(&self, key: &str) -> Result<(), MediaError> {
        let path = self.path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(io_error(key, source)),
        }
    }

    /// Public URL of a stored file.
    #[must_use]
    pub fn url(&self, key: &str) -> String {
        format!("{}/{key}", self.url)
    }

    fn path(&self, key: &str) -> Result<PathBuf, MediaError> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(MediaError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

fn io_error(key: &str, source: std::io::Error) -> MediaError {
    MediaError::Io {
        key: key.to_string(),
        source,
    }
}

/// Reduce a client-supplied file name to `[A-Za-z0-9._-]`.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
