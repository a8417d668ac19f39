//! Application state shared across handlers.

use std::sync::Arc;

use crate::claude::{ClaudeClient, ClaudeError};
use crate::config::StorefrontConfig;
use crate::db::CatalogStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the store, the Claude client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: CatalogStore,
    claude: Option<ClaudeClient>,
}

impl AppState {
    /// Create application state with an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the Claude client cannot be built from the
    /// configured API key.
    pub fn new(config: StorefrontConfig) -> Result<Self, ClaudeError> {
        Self::with_store(config, CatalogStore::new())
    }

    /// Create application state around an existing store.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn with_store(config: StorefrontConfig, store: CatalogStore) -> Result<Self, ClaudeError> {
        let claude = config.claude.as_ref().map(ClaudeClient::new).transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                claude,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the data store.
    #[must_use]
    pub fn store(&self) -> &CatalogStore {
        &self.inner.store
    }

    /// Get the Claude client, if an API key is configured.
    #[must_use]
    pub fn claude(&self) -> Option<&ClaudeClient> {
        self.inner.claude.as_ref()
    }
}
