//! Application state shared across screens.

use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::error::CatalogError;
use crate::store::{CartStore, CatalogStore, FavoritesStore};

/// Application state shared by every screen.
///
/// This struct is cheaply cloneable via `Arc`; all clones see the same three
/// stores, so there is exactly one catalog, cart and favorites set per process.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<CatalogStore>,
    cart: CartStore,
    favorites: FavoritesStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built from the
    /// configured endpoint.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let client = CatalogClient::new(&config.catalog)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: Arc::new(CatalogStore::new(client)),
                cart: CartStore::new(),
                favorites: FavoritesStore::new(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Catalog Store.
    #[must_use]
    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.inner.catalog
    }

    /// Get a reference to the Cart Store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the Favorites Store.
    #[must_use]
    pub fn favorites(&self) -> &FavoritesStore {
        &self.inner.favorites
    }
}
