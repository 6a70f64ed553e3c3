//! Plain-text rendering for the terminal.

use std::fmt::Write as _;
use std::io::Write as _;

use domain_shop_core::Price;
use domain_shop_core::cart::{CartItem, CartSummary};
use domain_shop_core::catalog::Product;
use domain_shop_core::search::{SearchResult, SearchResults};
use rust_decimal::Decimal;

use crate::commands::COMMANDS;

/// Write `text` to stdout, followed by a newline.
///
/// A closed stdout is not an error worth reporting.
pub fn emit(text: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(stdout, "{text}");
    let _ = stdout.flush();
}

fn money(amount: Decimal) -> String {
    Price::usd(amount).to_string()
}

fn result_line(out: &mut String, result: &SearchResult) {
    let status = if result.available { "available" } else { "taken" };
    let _ = writeln!(
        out,
        "  {:<32} {:>9}  {status}",
        result.domain,
        money(result.price)
    );
}

/// Search results, featured suffixes first.
#[must_use]
pub fn results(query: &str, results: Option<&SearchResults>) -> String {
    let Some(results) = results.filter(|r| !r.is_empty()) else {
        return format!("No results for \"{}\"", query.trim());
    };

    let mut out = String::from("Featured\n");
    for result in &results.featured {
        result_line(&mut out, result);
    }
    out.push_str("More extensions\n");
    for result in &results.other {
        result_line(&mut out, result);
    }
    out.trim_end().to_string()
}

/// The featured product list.
#[must_use]
pub fn products(products: &[Product]) -> String {
    let mut out = String::new();
    for product in products {
        let _ = writeln!(
            out,
            "  #{:<3} {:<24} {:>9}  {}",
            product.id,
            product.name,
            money(product.price),
            product.description
        );
    }
    out.trim_end().to_string()
}

/// Cart rows with line totals and the grand total.
#[must_use]
pub fn cart(items: &[CartItem], summary: &CartSummary) -> String {
    if items.is_empty() {
        return "Your cart is empty".to_string();
    }

    let mut out = String::new();
    for item in items {
        let _ = writeln!(
            out,
            "  [{}] {:<28} {:>9} x {:<3} {:>10}",
            item.id,
            item.name,
            money(item.price),
            item.quantity,
            money(item.line_total())
        );
    }
    let _ = write!(
        out,
        "  {} item(s), total {}",
        summary.item_count,
        money(summary.total)
    );
    out
}

/// One-line cart indicator shown after every change.
#[must_use]
pub fn badge(summary: &CartSummary) -> String {
    format!("[cart: {} | {}]", summary.item_count, money(summary.total))
}

/// Command reference for the shell.
#[must_use]
pub fn help() -> String {
    let mut out = String::from("Type to search. Commands:\n");
    for command in COMMANDS {
        let usage = format!(":{} {}", command.name, command.args);
        let _ = writeln!(out, "  {:<26} {}", usage.trim_end(), command.help);
    }
    out.trim_end().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use domain_shop_core::ItemId;
    use domain_shop_core::catalog::PRODUCTS;
    use domain_shop_core::search::SearchEngine;

    use super::*;

    #[test]
    fn test_results() {
        let engine = SearchEngine::default();
        let rendered = results("example", engine.search("example").as_ref());

        let com = rendered.lines().find(|l| l.contains("example.com ")).unwrap();
        assert!(com.contains("$12.99"));
        assert!(com.contains("taken"));
        assert!(rendered.starts_with("Featured"));
        assert!(rendered.contains("More extensions"));
    }

    #[test]
    fn test_no_results() {
        assert_eq!(results("  .com ", None), "No results for \".com\"");
    }

    #[test]
    fn test_cart_and_badge() {
        let items = vec![
            CartItem {
                id: ItemId::new(1),
                name: "a.com".to_string(),
                price: Decimal::new(10, 0),
                quantity: 2,
            },
            CartItem {
                id: ItemId::new(2),
                name: "b.io".to_string(),
                price: Decimal::new(5, 0),
                quantity: 1,
            },
        ];
        let summary = CartSummary {
            item_count: 3,
            total: Decimal::new(25, 0),
        };

        let rendered = cart(&items, &summary);
        assert!(rendered.contains("$20.00"));
        assert!(rendered.ends_with("3 item(s), total $25.00"));
        assert_eq!(badge(&summary), "[cart: 3 | $25.00]");
        assert_eq!(cart(&[], &CartSummary::default()), "Your cart is empty");
    }

    #[test]
    fn test_products_and_help() {
        let rendered = products(PRODUCTS);
        assert_eq!(rendered.lines().count(), PRODUCTS.len());
        assert!(rendered.contains("techstart.io"));

        let rendered = help();
        assert!(rendered.contains(":add <domain>"));
        assert!(rendered.contains(":quit"));
    }
}
