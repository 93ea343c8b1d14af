//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::favorites::FavoritesService;
use crate::store::{CatalogStore, FavoritesStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; hands out the catalog view and the
/// favorites service, both of which sit on the document-store seam.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    catalog: Catalog,
    favorites: FavoritesService,
}

impl AppState {
    /// Create a new application state over the given store backends.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        pool: PgPool,
        catalog_store: Arc<dyn CatalogStore>,
        favorites_store: Arc<dyn FavoritesStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog: Catalog::new(catalog_store),
                favorites: FavoritesService::new(favorites_store),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the catalog view.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the favorites service.
    #[must_use]
    pub fn favorites(&self) -> &FavoritesService {
        &self.inner.favorites
    }
}
