//! Per-suffix registration prices.

use rust_decimal::Decimal;

/// Price used for suffixes missing from the table.
pub const DEFAULT_PRICE: Decimal = Decimal::from_parts(999, 0, 0, false, 2);

/// Prices in cents, keyed by suffix.
const PRICES_CENTS: &[(&str, i64)] = &[
    (".com", 1299),
    (".co", 2499),
    (".io", 4999),
    (".net", 1499),
    (".org", 1299),
    (".dev", 1999),
    (".app", 1999),
    (".xyz", 199),
    (".tech", 2999),
    (".ai", 7999),
    (".me", 1999),
    (".tv", 2999),
    (".online", 999),
    (".store", 4999),
    (".shop", 2999),
    (".space", 1599),
    (".cloud", 2999),
    (".studio", 2499),
    (".sh", 1999),
    (".academy", 3499),
    (".agency", 2999),
    (".bike", 1999),
    (".bio", 1999),
    (".builders", 2499),
    (".careers", 2999),
    (".chat", 1999),
    (".accountants", 4399),
    (".actor", 1999),
    (".airforce", 10668),
    (".apartments", 1999),
    (".archi", 2499),
    (".army", 1999),
    (".associates", 2199),
    (".attorney", 5800),
    (".auction", 499),
    (".band", 2700),
    (".bargains", 2199),
    (".bet", 1499),
    (".bingo", 1499),
    (".black", 2999),
    (".blue", 2199),
    (".boutique", 499),
    (".broker", 1999),
    (".business", 399),
    (".cab", 1999),
    (".cafe", 799),
    (".camera", 2199),
    (".camp", 799),
    (".capital", 999),
    (".cards", 399),
    (".care", 2999),
    (".cash", 1199),
    (".casino", 1799),
    (".catering", 3400),
    (".center", 799),
    (".cheap", 999),
];

/// Source of registration prices.
pub trait PriceSource: Send + Sync {
    /// Yearly price for a suffix such as `.com`.
    fn price_for(&self, suffix: &str) -> Decimal;
}

/// The static price table.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceTable;

impl PriceTable {
    /// Tabulated price, if the suffix is listed.
    #[must_use]
    pub fn lookup(suffix: &str) -> Option<Decimal> {
        PRICES_CENTS
            .iter()
            .find(|(listed, _)| *listed == suffix)
            .map(|(_, cents)| Decimal::new(*cents, 2))
    }
}

impl PriceSource for PriceTable {
    fn price_for(&self, suffix: &str) -> Decimal {
        Self::lookup(suffix).unwrap_or(DEFAULT_PRICE)
    }
}
