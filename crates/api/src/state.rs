//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::media::MediaStorage;

/// Application state shared across all handlers.
///
/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    media: MediaStorage,
}

impl AppState {
    /// Build state from loaded configuration and a connection pool.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let media = MediaStorage::new(&config.media);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                media,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn media(&self) -> &MediaStorage {
        &self.inner.media
    }
}
