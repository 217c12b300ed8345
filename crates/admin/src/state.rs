//! Application state shared across handlers.

use std::sync::Arc;

use portell_gateway::Gateway;
use portell_gateway::storage::{FileStorage, StorageError};

use crate::config::{AdminConfig, StorageConfig};
use crate::services::Authenticator;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the data gateway, the login check, image storage and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    gateway: Gateway,
    authenticator: Arc<dyn Authenticator>,
    storage: Option<FileStorage>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: AdminConfig,
        gateway: Gateway,
        authenticator: Arc<dyn Authenticator>,
        storage: Option<FileStorage>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                gateway,
                authenticator,
                storage,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the data gateway.
    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.inner.gateway
    }

    /// Get a reference to the login check.
    #[must_use]
    pub fn authenticator(&self) -> &dyn Authenticator {
        self.inner.authenticator.as_ref()
    }

    /// Image storage, if configured.
    #[must_use]
    pub fn storage(&self) -> Option<&FileStorage> {
        self.inner.storage.as_ref()
    }
}

/// Build the storage client from configuration.
///
/// # Errors
///
/// Returns error if the client cannot be constructed.
pub fn build_storage(config: Option<&StorageConfig>) -> Result<Option<FileStorage>, StorageError> {
    let Some(config) = config else {
        tracing::warn!("No storage configured, image uploads disabled");
        return Ok(None);
    };
    tracing::info!(bucket = %config.bucket, "Image uploads enabled");
    FileStorage::new(&config.url, config.bucket.clone(), &config.service_key).map(Some)
}
