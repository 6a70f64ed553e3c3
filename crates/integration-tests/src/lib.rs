//! Integration tests for domain-shop.
//!
//! Each test starts a real storefront on an ephemeral port, with Stripe
//! replaced by an `httpmock` server, and drives it over HTTP the way the
//! CLI does.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p domain-shop-integration-tests
//! ```

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;

use domain_shop_cli::CheckoutClient;
use domain_shop_storefront::{app, config::StorefrontConfig, state::AppState};
use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Secret key accepted by the storefront's config validation.
pub const TEST_STRIPE_KEY: &str = "sk_test_51Hq8ZkLr4Nw2Xb9TfVy3Cd7Mp0Qs6Ue1";

/// A running storefront and its fake Stripe.
pub struct TestContext {
    pub addr: SocketAddr,
    pub stripe: MockServer,
    pub http: reqwest::Client,
    server: JoinHandle<()>,
}

impl TestContext {
    /// Start a storefront whose Stripe calls go to a mock server.
    pub async fn start() -> Self {
        let stripe = MockServer::start_async().await;
        let stripe_base = stripe.base_url();

        let config = StorefrontConfig::from_lookup(|key| match key {
            "STRIPE_SECRET_KEY" => Some(TEST_STRIPE_KEY.to_string()),
            "STRIPE_API_BASE" => Some(stripe_base.clone()),
            _ => None,
        })
        .expect("test config should load");
        let state = AppState::new(config).expect("Stripe client should build");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("listener has an address");

        let server = tokio::spawn(async move {
            axum::serve(listener, app(state))
                .await
                .expect("Server error");
        });

        Self {
            addr,
            stripe,
            http: reqwest::Client::new(),
            server,
        }
    }

    /// Absolute URL of `path` on the storefront.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Checkout client pointed at this storefront.
    #[must_use]
    pub fn checkout_client(&self) -> CheckoutClient {
        let endpoint = Url::parse(&self.url("/api/create-checkout-session"))
            .expect("endpoint url is valid");
        CheckoutClient::new(endpoint).expect("HTTP client should build")
    }

    /// Make Stripe accept every session request, answering with `session_id`.
    pub async fn stripe_accepts(&self, session_id: &str) -> Mock<'_> {
        let url = format!("https://checkout.stripe.com/c/pay/{session_id}");
        self.stripe
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/checkout/sessions")
                    .header("authorization", format!("Bearer {TEST_STRIPE_KEY}"))
                    .body_contains("mode=payment");
                then.status(200)
                    .json_body(json!({ "id": session_id, "url": url }));
            })
            .await
    }

    /// Make Stripe reject every session request with `message`.
    pub async fn stripe_rejects(&self, message: &str) -> Mock<'_> {
        self.stripe
            .mock_async(|when, then| {
                when.method(POST).path("/v1/checkout/sessions");
                then.status(400).json_body(json!({
                    "error": { "message": message, "type": "invalid_request_error" }
                }));
            })
            .await
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}
