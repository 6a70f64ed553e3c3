//! Unified error handling with Sentry integration.
//!
//! Every API failure is rendered as JSON `{ "error": "..." }` with a status
//! that tells the client whether retrying can help. Server-side failures are
//! captured to Sentry before responding.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain_shop_core::PriceError;
use domain_shop_core::checkout::{ErrorBody, ValidationError};
use thiserror::Error;

use crate::payments::PaymentError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Payment provider call failed.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Checkout payload failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A price cannot be charged.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Request body is not valid JSON for the endpoint.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The route exists but not for this method.
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Payment(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) | Self::Price(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Text placed in the response body.
    fn client_message(&self) -> String {
        match self {
            // The checkout page shows the provider's explanation verbatim
            Self::Payment(err) => err.client_message(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Payment(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (self.status(), Json(ErrorBody::new(self.client_message()))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use rust_decimal::Decimal;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");

        let err = AppError::from(ValidationError::MissingItems);
        assert_eq!(err.to_string(), "Items are required");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(ValidationError::MissingItems.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::MethodNotAllowed),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            get_status(PriceError::Overflow(Decimal::MAX).into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_payment_error_body_carries_provider_message() {
        let err = AppError::from(PaymentError::Api {
            status: 401,
            message: "Invalid API Key provided".to_string(),
        });

        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, ErrorBody::new("Invalid API Key provided"));
    }

    #[tokio::test]
    async fn test_client_errors_render_their_message() {
        let (_, body) = render(PriceError::Negative(Decimal::NEGATIVE_ONE).into()).await;
        assert_eq!(body.error, "price must not be negative (got -1)");

        let (_, body) = render(AppError::MethodNotAllowed).await;
        assert_eq!(body.error, "Method not allowed");
    }
}
