//! Checkout session endpoint.
//!
//! `POST /api/create-checkout-session` turns the client's cart lines into a
//! hosted payment session and answers with its id and redirect URL.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{
        HeaderMap, HeaderName, StatusCode,
        header::{HOST, ORIGIN},
    },
};
use domain_shop_core::checkout::{CheckoutRequest, CheckoutResponse};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::payments::CheckoutSessionRequest;
use crate::state::AppState;

/// Create a payment session for the posted cart.
#[instrument(skip_all, fields(origin = tracing::field::Empty))]
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutResponse>> {
    let Json(request) = payload?;
    let items = request.validate()?;

    let origin = request_origin(&headers, &state.config().base_url);
    tracing::Span::current().record("origin", origin.as_str());

    let session_request =
        CheckoutSessionRequest::build(items, state.config().stripe.currency, &origin)?;
    let session = state
        .payments()
        .create_checkout_session(&session_request)
        .await?;

    tracing::info!(
        session_id = %session.id,
        line_items = items.len(),
        "Checkout session created"
    );

    Ok(Json(CheckoutResponse {
        session_id: session.id,
        url: session.url,
    }))
}

/// Bare `OPTIONS` requests get an empty 200.
///
/// Real CORS preflights are answered by the CORS layer before reaching here.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any other method on the checkout route.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Scheme and host the buyer should be sent back to.
///
/// Prefers the `Origin` header, then `https://` plus `Host`, then the
/// configured base URL.
fn request_origin(headers: &HeaderMap, fallback: &str) -> String {
    let header = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty() && *value != "null")
    };

    if let Some(origin) = header(ORIGIN) {
        return origin.trim_end_matches('/').to_string();
    }
    if let Some(host) = header(HOST) {
        return format!("https://{host}");
    }
    fallback.to_string()
}
