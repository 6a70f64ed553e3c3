//! Wire types for the checkout endpoint.
//!
//! The client posts `{ "items": [{ "name", "price", "quantity" }] }` and gets
//! back `{ "sessionId", "url" }` or `{ "error" }`. Prices travel as JSON
//! numbers in standard currency units; the endpoint converts to minor units.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartItem;

/// Reasons a checkout payload is rejected before reaching the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Items are required")]
    MissingItems,
    #[error("Item {0} has an empty name")]
    EmptyName(usize),
    #[error("Item {0} has a negative price")]
    NegativePrice(usize),
    #[error("Item {0} must have a quantity of at least 1")]
    ZeroQuantity(usize),
}

/// One line of a checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

impl From<&CartItem> for CheckoutItem {
    fn from(item: &CartItem) -> Self {
        Self {
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// Checkout request body.
///
/// `items` is optional on the wire so a missing field is reported as a
/// validation error rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<CheckoutItem>>,
}

impl CheckoutRequest {
    /// Build a request from cart rows.
    #[must_use]
    pub fn from_cart(items: &[CartItem]) -> Self {
        Self {
            items: Some(items.iter().map(CheckoutItem::from).collect()),
        }
    }

    /// Check the payload and return the items.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if items are missing or empty, or if any
    /// item has an empty name, a negative price or a zero quantity.
    pub fn validate(&self) -> Result<&[CheckoutItem], ValidationError> {
        let items = match self.items.as_deref() {
            Some(items) if !items.is_empty() => items,
            _ => return Err(ValidationError::MissingItems),
        };

        for (index, item) in items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(ValidationError::EmptyName(index));
            }
            if item.price.is_sign_negative() && !item.price.is_zero() {
                return Err(ValidationError::NegativePrice(index));
            }
            if item.quantity == 0 {
                return Err(ValidationError::ZeroQuantity(index));
            }
        }

        Ok(items)
    }
}

/// Successful checkout response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: String,
}

/// Error response body shared by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
