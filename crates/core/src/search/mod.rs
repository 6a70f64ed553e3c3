//! Mock domain search.
//!
//! A query is reduced to a bare name (any known trailing suffix is stripped),
//! then every candidate suffix is checked against an [`AvailabilityOracle`]
//! and priced by a [`PriceSource`]. Results are split into the featured
//! suffixes and everything else, both in candidate order.
//!
//! Searching is synchronous and allocation-light; callers that search as the
//! user types are expected to debounce.

mod oracle;
mod pricing;
mod suffix;

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use oracle::{AvailabilityOracle, DENYLIST, Denylist};
pub use pricing::{DEFAULT_PRICE, PriceSource, PriceTable};
pub use suffix::{
    CANDIDATE_SUFFIXES, FEATURED_SUFFIXES, is_featured, split_known_suffix, strip_known_suffix,
};

/// One candidate domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Full domain, `name + suffix`.
    pub domain: String,
    pub suffix: String,
    pub available: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Results partitioned for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub featured: Vec<SearchResult>,
    pub other: Vec<SearchResult>,
}

impl SearchResults {
    /// Total number of results across both partitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.featured.len() + self.other.len()
    }

    /// Whether there are no results at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.featured.is_empty() && self.other.is_empty()
    }

    /// Iterate featured results first, then the rest.
    pub fn iter(&self) -> impl Iterator<Item = &SearchResult> {
        self.featured.iter().chain(self.other.iter())
    }

    /// Find the result for a full domain, ignoring ASCII case.
    #[must_use]
    pub fn find(&self, domain: &str) -> Option<&SearchResult> {
        self.iter().find(|r| r.domain.eq_ignore_ascii_case(domain))
    }
}

/// Search engine over an availability oracle and a price source.
///
/// Cheap to clone; the oracle and price source are shared.
#[derive(Clone)]
pub struct SearchEngine {
    oracle: Arc<dyn AvailabilityOracle>,
    prices: Arc<dyn PriceSource>,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(Denylist::default(), PriceTable)
    }
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine").finish_non_exhaustive()
    }
}

impl SearchEngine {
    /// Create a search engine.
    pub fn new(
        oracle: impl AvailabilityOracle + 'static,
        prices: impl PriceSource + 'static,
    ) -> Self {
        Self {
            oracle: Arc::new(oracle),
            prices: Arc::new(prices),
        }
    }

    /// Search every candidate suffix for a free-text query.
    ///
    /// Returns `None` when the query is blank or nothing but a suffix.
    #[must_use]
    pub fn search(&self, raw_query: &str) -> Option<SearchResults> {
        let trimmed = raw_query.trim();
        if trimmed.is_empty() {
            return None;
        }

        let name = strip_known_suffix(trimmed);
        if name.is_empty() {
            return None;
        }

        let mut results = SearchResults::default();
        for suffix in CANDIDATE_SUFFIXES {
            let result = self.evaluate(name, suffix);
            if is_featured(suffix) {
                results.featured.push(result);
            } else {
                results.other.push(result);
            }
        }
        Some(results)
    }

    /// Price and check a single fully qualified domain.
    ///
    /// Returns `None` when the domain has no known suffix or no name.
    #[must_use]
    pub fn quote(&self, domain: &str) -> Option<SearchResult> {
        let (name, suffix) = split_known_suffix(domain.trim())?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(self.evaluate(name, suffix))
    }

    fn evaluate(&self, name: &str, suffix: &str) -> SearchResult {
        SearchResult {
            domain: format!("{name}{suffix}"),
            suffix: suffix.to_string(),
            available: self.oracle.is_available(name, suffix),
            price: self.prices.price_for(suffix),
        }
    }
}
