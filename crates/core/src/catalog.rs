//! Pre-seeded products shown on the storefront home page.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::ProductId;

/// A featured domain that can be added to the cart by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: &'static str,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub description: &'static str,
}

const fn product(id: i64, name: &'static str, cents: u32, description: &'static str) -> Product {
    Product {
        id: ProductId::new(id),
        name,
        price: Decimal::from_parts(cents, 0, 0, false, 2),
        description,
    }
}

/// The fixed product list.
pub static PRODUCTS: &[Product] = &[
    product(
        1,
        "example.com",
        1299,
        "Premium domain with instant DNS setup and privacy protection included.",
    ),
    product(
        2,
        "techstart.io",
        2499,
        "Perfect for tech startups. Includes email forwarding and SSL certificate.",
    ),
    product(
        3,
        "mybrand.app",
        1999,
        "Modern app domain with free WHOIS privacy and DNS management.",
    ),
    product(
        4,
        "creativestudio.design",
        2999,
        "Creative domain for design agencies. Includes custom email and hosting setup.",
    ),
    product(
        5,
        "shop.store",
        3499,
        "E-commerce ready domain with payment gateway integration support.",
    ),
    product(
        6,
        "blog.space",
        1599,
        "Perfect for bloggers and content creators. Fast and reliable hosting.",
    ),
];

/// Look up a product by id.
#[must_use]
pub fn find(id: ProductId) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}
