//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET     /health                        - Health check
//!
//! # JSON API (CORS enabled)
//! POST    /api/create-checkout-session   - Create a hosted payment session
//! OPTIONS /api/create-checkout-session   - Preflight
//! GET     /api/search?q=                 - Domain availability and prices
//! GET     /api/products                  - Featured products
//!
//! # Static pages (when STOREFRONT_STATIC_DIR is set)
//! GET     /*                             - Page assets
//! ```

pub mod checkout;
pub mod products;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::api_cors_layer;
use crate::state::AppState;

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/create-checkout-session",
            post(checkout::create_session)
                .options(checkout::preflight)
                .fallback(checkout::method_not_allowed),
        )
        .route("/search", get(search::search))
        .route("/products", get(products::index))
        .layer(api_cors_layer())
}

/// Create the main routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
