//! Client configuration.
//!
//! Every setting is a global flag with an environment fallback, so
//! `--api-url` beats `DOMAIN_SHOP_API_URL` which beats the default. `main`
//! loads `.env` before parsing.
//!
//! - `DOMAIN_SHOP_API_URL` - Storefront base URL (default: <http://localhost:3000>)
//! - `DOMAIN_SHOP_CART_FILE` - Cart storage file (default: `.domain-shop/storage.json`)
//! - `DOMAIN_SHOP_DEBOUNCE_MS` - Quiet period before a typed search runs (default: 500)

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use url::Url;

/// Path of the checkout endpoint, relative to the API base URL.
pub const CHECKOUT_PATH: &str = "api/create-checkout-session";

/// Settings shared by every command.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Storefront base URL
    #[arg(
        long,
        global = true,
        env = "DOMAIN_SHOP_API_URL",
        default_value = "http://localhost:3000"
    )]
    pub api_url: Url,

    /// File holding the persisted cart
    #[arg(
        long,
        global = true,
        env = "DOMAIN_SHOP_CART_FILE",
        default_value = ".domain-shop/storage.json"
    )]
    pub cart_file: PathBuf,

    /// Milliseconds of quiet before a typed search runs (shell only)
    #[arg(
        long,
        global = true,
        env = "DOMAIN_SHOP_DEBOUNCE_MS",
        default_value_t = 500
    )]
    pub debounce_ms: u64,
}

impl ClientConfig {
    /// Full URL of the checkout endpoint.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the base URL cannot be joined.
    pub fn checkout_endpoint(&self) -> Result<Url, url::ParseError> {
        let mut base = self.api_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        base.join(CHECKOUT_PATH)
    }

    /// Debounce delay for typed searches.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
