//! Cross-origin policy for the JSON API.
//!
//! The checkout page may be served from a different origin than the API
//! (static hosting, local file previews), so any origin may call it. Only
//! `POST` and the `OPTIONS` preflight are advertised, with `Content-Type` as
//! the sole request header.

use axum::http::{Method, header::CONTENT_TYPE};
use tower_http::cors::{Any, CorsLayer};

/// CORS layer applied to every `/api` route.
#[must_use]
pub fn api_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}
