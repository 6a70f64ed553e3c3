//! Domain availability lookup.
//!
//! The only implementation is a static denylist standing in for a registry
//! query. Callers depend on [`AvailabilityOracle`] so a real lookup can be
//! dropped in later.

/// Domains treated as already registered.
pub const DENYLIST: &[&str] = &["example.com", "test.com", "demo.com", "god.com", "god.co"];

/// Answers whether `name + suffix` can be registered.
pub trait AvailabilityOracle: Send + Sync {
    /// Returns `true` when the domain is available.
    fn is_available(&self, name: &str, suffix: &str) -> bool;
}

/// Oracle backed by a fixed set of taken domains.
#[derive(Debug, Clone, Copy)]
pub struct Denylist {
    taken: &'static [&'static str],
}

impl Denylist {
    /// Create an oracle over a custom set of lowercase domains.
    #[must_use]
    pub const fn new(taken: &'static [&'static str]) -> Self {
        Self { taken }
    }
}

impl Default for Denylist {
    fn default() -> Self {
        Self::new(DENYLIST)
    }
}

impl AvailabilityOracle for Denylist {
    fn is_available(&self, name: &str, suffix: &str) -> bool {
        let domain = format!("{name}{suffix}").to_lowercase();
        !self.taken.contains(&domain.as_str())
    }
}
