//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::CatalogService;
use crate::config::StorefrontConfig;
use crate::profile::ProfileStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Collaborators are built by
/// the hosting process and passed in, so tests can substitute in-memory
/// implementations.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<dyn CatalogService>,
    profiles: Arc<dyn ProfileStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Commerce backend client
    /// * `profiles` - Visitor profile store
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: Arc<dyn CatalogService>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                profiles,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the commerce backend client.
    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogService {
        self.inner.catalog.as_ref()
    }

    /// Get a reference to the visitor profile store.
    #[must_use]
    pub fn profiles(&self) -> &dyn ProfileStore {
        self.inner.profiles.as_ref()
    }
}
