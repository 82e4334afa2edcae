//! Application state shared across handlers.

use std::sync::Arc;

use zafra_core::PricingPolicy;

use crate::catalog::{InMemoryProductRepository, ProductRepository};
use crate::config::StorefrontConfig;
use crate::middleware::InMemorySessionStore;
use crate::services::admin_api::{AdminApiClient, AdminApiError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, the admin backend client, the session store and
/// configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    products: Arc<dyn ProductRepository>,
    admin_api: AdminApiClient,
    sessions: InMemorySessionStore,
}

impl AppState {
    /// Create application state with the seeded in-memory catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the admin API client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, AdminApiError> {
        Self::with_repository(config, Arc::new(InMemoryProductRepository::seeded()))
    }

    /// Create application state around an existing catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the admin API client cannot be built.
    pub fn with_repository(
        config: StorefrontConfig,
        products: Arc<dyn ProductRepository>,
    ) -> Result<Self, AdminApiError> {
        let admin_api = AdminApiClient::new(config.admin_api_url.clone())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                products,
                admin_api,
                sessions: InMemorySessionStore::default(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the product catalog.
    #[must_use]
    pub fn products(&self) -> &dyn ProductRepository {
        self.inner.products.as_ref()
    }

    /// Get a reference to the admin backend client.
    #[must_use]
    pub fn admin_api(&self) -> &AdminApiClient {
        &self.inner.admin_api
    }

    /// Session store behind the session layer.
    #[must_use]
    pub fn sessions(&self) -> &InMemorySessionStore {
        &self.inner.sessions
    }

    /// Shipping and tax rules for cart summaries.
    #[must_use]
    pub fn pricing(&self) -> &PricingPolicy {
        &self.inner.config.pricing
    }
}
