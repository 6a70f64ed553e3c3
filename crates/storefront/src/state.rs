//! Application state shared across handlers.

use std::sync::Arc;

use domain_shop_core::search::SearchEngine;

use crate::config::StorefrontConfig;
use crate::payments::{PaymentError, PaymentGateway, StripeClient};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    search: SearchEngine,
    payments: Arc<dyn PaymentGateway>,
}

impl AppState {
    /// Create application state backed by Stripe.
    ///
    /// # Errors
    ///
    /// Returns an error if the Stripe client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, PaymentError> {
        let payments = Arc::new(StripeClient::new(&config.stripe)?);
        Ok(Self::with_gateway(config, payments))
    }

    /// Create application state with an explicit payment gateway.
    #[must_use]
    pub fn with_gateway(config: StorefrontConfig, payments: Arc<dyn PaymentGateway>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                search: SearchEngine::default(),
                payments,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the domain search engine.
    #[must_use]
    pub fn search(&self) -> &SearchEngine {
        &self.inner.search
    }

    /// Get the payment gateway.
    #[must_use]
    pub fn payments(&self) -> &dyn PaymentGateway {
        self.inner.payments.as_ref()
    }
}
