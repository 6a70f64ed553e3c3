//! Featured product handler.

use axum::Json;
use domain_shop_core::catalog::{PRODUCTS, Product};

/// The pre-seeded product list.
pub async fn index() -> Json<&'static [Product]> {
    Json(PRODUCTS)
}
