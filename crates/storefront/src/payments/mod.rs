//! Hosted payment sessions.
//!
//! The checkout endpoint never touches card data. It converts validated cart
//! lines into a [`CheckoutSessionRequest`] and asks a [`PaymentGateway`] for a
//! hosted payment page, returning the session id and redirect URL.

pub mod stripe;

use async_trait::async_trait;
use domain_shop_core::checkout::CheckoutItem;
use domain_shop_core::types::price::to_minor_units;
use domain_shop_core::{CurrencyCode, PriceError};
use thiserror::Error;

pub use stripe::StripeClient;

/// Errors raised while creating a payment session.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider rejected the request.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the provider response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl PaymentError {
    /// Message surfaced to checkout clients.
    ///
    /// Provider rejections carry the provider's own explanation; anything
    /// else is reported by its display form.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Api { message, .. } if !message.is_empty() => message.clone(),
            _ => self.to_string(),
        }
    }
}

/// One priced line on the hosted payment page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub description: String,
    /// Price per unit in minor units (cents)
    pub unit_amount: i64,
    pub quantity: u32,
}

/// Everything a gateway needs to open a one-off payment session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    pub currency: CurrencyCode,
    pub line_items: Vec<LineItem>,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutSessionRequest {
    /// Build a session request for validated checkout items.
    ///
    /// `origin` is the scheme and host the buyer came from; the success
    /// and cancel URLs point back at it.
    ///
    /// # Errors
    ///
    /// Returns `PriceError` if a price does not fit in minor units.
    pub fn build(
        items: &[CheckoutItem],
        currency: CurrencyCode,
        origin: &str,
    ) -> Result<Self, PriceError> {
        let line_items = items
            .iter()
            .map(|item| {
                Ok(LineItem {
                    name: item.name.clone(),
                    description: format!("Domain: {}", item.name),
                    unit_amount: to_minor_units(item.price)?,
                    quantity: item.quantity,
                })
            })
            .collect::<Result<Vec<_>, PriceError>>()?;

        let origin = origin.trim_end_matches('/');
        Ok(Self {
            currency,
            line_items,
            success_url: format!("{origin}/success.html?session_id={{CHECKOUT_SESSION_ID}}"),
            cancel_url: format!("{origin}/?canceled=true"),
        })
    }
}

/// A created payment session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted payment page the buyer is redirected to
    pub url: String,
}

/// A provider of hosted payment pages.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a one-off card payment session.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError` if the provider cannot be reached or rejects
    /// the request.
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError>;
}
