//! Checkout initiation.
//!
//! Posts the cart to the storefront's checkout endpoint and returns the
//! hosted payment page to send the buyer to. The cart itself is left alone:
//! it is only cleared once payment has actually happened.

use std::time::Duration;

use domain_shop_core::cart::CartItem;
use domain_shop_core::checkout::{CheckoutRequest, CheckoutResponse, ErrorBody};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Shown when the failure has no message fit for the buyer.
pub const GENERIC_ERROR: &str = "An error occurred. Please try again.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors starting a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to buy; no request was sent.
    #[error("Your cart is empty")]
    EmptyCart,

    /// The endpoint answered with an error message.
    #[error("Checkout rejected: {0}")]
    Rejected(String),

    /// The endpoint could not be reached.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with something other than a session.
    #[error("Invalid checkout response: {0}")]
    InvalidResponse(String),
}

impl CheckoutError {
    /// Message to show the buyer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCart => self.to_string(),
            Self::Rejected(message) => message.clone(),
            Self::Http(_) | Self::InvalidResponse(_) => GENERIC_ERROR.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Reply {
    Failure(ErrorBody),
    Session(CheckoutResponse),
}

/// Client for the checkout endpoint.
#[derive(Debug, Clone)]
pub struct CheckoutClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl CheckoutClient {
    /// Create a client posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(endpoint: Url) -> Result<Self, CheckoutError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Create a payment session for `items` and return its redirect URL.
    ///
    /// Makes a single attempt; failures are not retried.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` without any network traffic when
    /// `items` is empty, otherwise the endpoint's rejection or a transport
    /// error.
    #[tracing::instrument(skip_all, fields(endpoint = %self.endpoint, items = items.len()))]
    pub async fn initiate(&self, items: &[CartItem]) -> Result<Url, CheckoutError> {
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&CheckoutRequest::from_cart(items))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<Reply>(&body) {
            Ok(Reply::Failure(ErrorBody { error })) => {
                tracing::warn!(status = status.as_u16(), %error, "Checkout rejected");
                Err(CheckoutError::Rejected(error))
            }
            Ok(Reply::Session(session)) => {
                tracing::info!(session_id = %session.session_id, "Checkout session created");
                Url::parse(&session.url)
                    .map_err(|e| CheckoutError::InvalidResponse(format!("bad redirect url: {e}")))
            }
            Err(e) => {
                tracing::warn!(status = status.as_u16(), error = %e, "Unreadable checkout response");
                Err(CheckoutError::InvalidResponse(format!(
                    "status {status}: {e}"
                )))
            }
        }
    }
}
