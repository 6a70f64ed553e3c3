//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (fill the span field, echo `x-request-id`)
//! 4. CORS (`/api` routes only)

pub mod cors;
pub mod request_id;

pub use cors::api_cors_layer;
pub use request_id::request_id_middleware;
