//! Application state shared across handlers.

use std::sync::Arc;

use crate::carousel::Carousel;
use crate::catalog::Catalog;
use crate::config::{StorefrontConfig, UiConfig};
use crate::routes::home::HeroConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides read-only access
/// to the catalog, hero slides and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    hero: HeroConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog, hero: HeroConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                hero,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// UI timer settings.
    #[must_use]
    pub fn ui(&self) -> UiConfig {
        self.inner.config.ui
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Hero carousel slides.
    #[must_use]
    pub fn hero(&self) -> &HeroConfig {
        &self.inner.hero
    }

    /// A fresh carousel over the hero slides, positioned at `index`.
    #[must_use]
    pub fn carousel_at(&self, index: usize) -> Carousel {
        Carousel::at(self.inner.hero.slides.len(), index)
    }
}
