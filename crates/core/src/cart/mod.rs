//! Cart store persisted to key-value storage.
//!
//! The whole item list is stored as one JSON array under [`CART_KEY`]. It is
//! read lazily on first access and written back after every mutation. Rows
//! are identified by domain name (ASCII case-insensitive) regardless of
//! whether they came from the catalog or from a search.
//!
//! Observers subscribe to a [`CartSummary`] watch channel instead of reading
//! storage themselves; the store is the only writer.

mod storage;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use crate::catalog;
use crate::search::SearchResult;
use crate::types::{ItemId, ProductId};

pub use storage::{KeyValueStore, MemoryStore, StorageError};

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Cart storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{0} is not available")]
    Unavailable(String),

    #[error("Price for {0} must not be negative")]
    NegativePrice(String),
}

/// Result type alias for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;

/// One cart row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ItemId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

impl CartItem {
    /// Price times quantity, capped at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Whether a stored row can be held in the cart: at least one unit, a
    /// non-negative price and a line total that fits a `Decimal`.
    fn is_valid(&self) -> bool {
        self.quantity > 0
            && !(self.price.is_sign_negative() && !self.price.is_zero())
            && self.price.checked_mul(Decimal::from(self.quantity)).is_some()
    }
}

/// Snapshot published to observers after every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSummary {
    /// Sum of quantities.
    pub item_count: u64,
    pub total: Decimal,
}

impl CartSummary {
    fn of(items: &[CartItem]) -> Self {
        Self {
            item_count: item_count(items),
            total: total(items),
        }
    }
}

/// The cart, owned by a single client session.
pub struct CartStore<S> {
    storage: S,
    items: Option<Vec<CartItem>>,
    changes: watch::Sender<CartSummary>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create a store over `storage`. Nothing is read until first access.
    pub fn new(storage: S) -> Self {
        let (changes, _) = watch::channel(CartSummary::default());
        Self {
            storage,
            items: None,
            changes,
        }
    }

    /// Subscribe to change notifications.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSummary> {
        self.changes.subscribe()
    }

    /// Current rows, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if storage cannot be read.
    pub fn items(&mut self) -> Result<&[CartItem]> {
        Ok(self.loaded()?.as_slice())
    }

    /// Add one unit of `name`, or bump its quantity if it is already present.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the price is negative or storage fails.
    pub fn add(&mut self, id: ItemId, name: &str, price: Decimal) -> Result<()> {
        if price.is_sign_negative() && !price.is_zero() {
            return Err(CartError::NegativePrice(name.to_string()));
        }

        let mut items = self.loaded()?.clone();
        if let Some(existing) = items
            .iter_mut()
            .find(|item| item.name.eq_ignore_ascii_case(name))
        {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            items.push(CartItem {
                id,
                name: name.to_string(),
                price,
                quantity: 1,
            });
        }

        tracing::debug!(name, "added to cart");
        self.commit(items)
    }

    /// Add a searched domain under a freshly generated id.
    ///
    /// Returns the id of the row holding the domain.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Unavailable` for taken domains, or a storage error.
    pub fn add_domain(&mut self, result: &SearchResult) -> Result<ItemId> {
        if !result.available {
            return Err(CartError::Unavailable(result.domain.clone()));
        }

        let items = self.loaded()?;
        let id = items
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case(&result.domain))
            .map_or_else(|| next_generated_id(items), |item| item.id);

        self.add(id, &result.domain, result.price)?;
        Ok(id)
    }

    /// Add a catalog product by id.
    ///
    /// Unknown ids are ignored and return `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if storage fails.
    pub fn add_product(&mut self, id: ProductId) -> Result<bool> {
        let Some(product) = catalog::find(id) else {
            tracing::debug!(%id, "ignoring unknown product");
            return Ok(false);
        };
        self.add(product.id.into(), product.name, product.price)?;
        Ok(true)
    }

    /// Remove every row named `name`. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if storage fails.
    pub fn remove(&mut self, name: &str) -> Result<bool> {
        self.remove_where(|item| item.name.eq_ignore_ascii_case(name))
    }

    /// Remove every row with `id`. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if storage fails.
    pub fn remove_by_id(&mut self, id: ItemId) -> Result<bool> {
        self.remove_where(|item| item.id == id)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if storage fails.
    pub fn clear(&mut self) -> Result<()> {
        self.loaded()?;
        self.commit(Vec::new())
    }

    /// Sum of price times quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if storage cannot be read.
    pub fn total(&mut self) -> Result<Decimal> {
        Ok(total(self.loaded()?))
    }

    /// Sum of quantities (not the number of rows).
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if storage cannot be read.
    pub fn item_count(&mut self) -> Result<u64> {
        Ok(item_count(self.loaded()?))
    }

    /// Current summary.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if storage cannot be read.
    pub fn summary(&mut self) -> Result<CartSummary> {
        Ok(CartSummary::of(self.loaded()?))
    }

    /// Discard the in-memory copy and read storage again.
    ///
    /// Call this when another writer may have changed the stored cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if storage cannot be read.
    pub fn reload(&mut self) -> Result<()> {
        self.items = None;
        self.loaded()?;
        Ok(())
    }

    /// Give back the storage backend.
    pub fn into_inner(self) -> S {
        self.storage
    }

    fn remove_where(&mut self, matches: impl Fn(&CartItem) -> bool) -> Result<bool> {
        let items = self.loaded()?;
        let kept: Vec<CartItem> = items.iter().filter(|item| !matches(item)).cloned().collect();
        if kept.len() == items.len() {
            return Ok(false);
        }
        self.commit(kept)?;
        Ok(true)
    }

    fn loaded(&mut self) -> Result<&mut Vec<CartItem>> {
        if self.items.is_none() {
            let items = self.read_stored()?;
            self.publish(&items);
            self.items = Some(items);
        }
        Ok(self.items.get_or_insert_with(Vec::new))
    }

    fn read_stored(&self) -> Result<Vec<CartItem>> {
        let Some(raw) = self.storage.get(CART_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Option<Vec<CartItem>>>(&raw) {
            Ok(Some(mut items)) => {
                let stored = items.len();
                items.retain(CartItem::is_valid);
                if items.len() < stored {
                    tracing::warn!(
                        dropped = stored - items.len(),
                        "discarding invalid stored cart rows"
                    );
                }
                Ok(items)
            }
            Ok(None) => Ok(Vec::new()),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable stored cart");
                Ok(Vec::new())
            }
        }
    }

    /// Persist `items`, then make them the cart. On failure the cart keeps
    /// its previous rows.
    fn commit(&mut self, items: Vec<CartItem>) -> Result<()> {
        let encoded = serde_json::to_string(&items)?;
        self.storage.set(CART_KEY, encoded)?;
        self.publish(&items);
        self.items = Some(items);
        Ok(())
    }

    fn publish(&self, items: &[CartItem]) {
        let summary = CartSummary::of(items);
        self.changes.send_if_modified(|current| {
            let changed = *current != summary;
            *current = summary;
            changed
        });
    }
}

fn total(items: &[CartItem]) -> Decimal {
    items
        .iter()
        .map(CartItem::line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

fn item_count(items: &[CartItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

/// Timestamp-based id, strictly above every id already in the cart.
fn next_generated_id(items: &[CartItem]) -> ItemId {
    let now = Utc::now().timestamp_millis();
    let floor = items
        .iter()
        .map(|item| item.id.as_i64().saturating_add(1))
        .max()
        .unwrap_or(i64::MIN);
    ItemId::new(now.max(floor))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::search::SearchEngine;

    fn store() -> CartStore<MemoryStore> {
        CartStore::new(MemoryStore::new())
    }

    #[test]
    fn test_duplicate_add_increments_quantity() {
        let mut cart = store();
        cart.add(ItemId::new(1), "a.com", Decimal::new(10, 0)).unwrap();
        cart.add(ItemId::new(1), "a.com", Decimal::new(10, 0)).unwrap();

        let items = cart.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
    }

    #[test]
    fn test_name_is_the_identity() {
        let mut cart = store();
        cart.add(ItemId::new(1), "example.com", Decimal::new(1299, 2))
            .unwrap();
        cart.add(ItemId::new(555), "Example.COM", Decimal::new(1299, 2))
            .unwrap();

        let items = cart.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, ItemId::new(1));
        assert_eq!(items[0].quantity, 2);
    }

    #[test]
    fn test_total_and_item_count() {
        let mut cart = store();
        cart.add(ItemId::new(1), "a.com", Decimal::new(10, 0)).unwrap();
        cart.add(ItemId::new(1), "a.com", Decimal::new(10, 0)).unwrap();
        cart.add(ItemId::new(2), "b.com", Decimal::new(5, 0)).unwrap();

        assert_eq!(cart.total().unwrap(), Decimal::new(2500, 2));
        assert_eq!(cart.item_count().unwrap(), 3);
        assert_eq!(cart.items().unwrap().len(), 2);
    }

    #[test]
    fn test_remove_last_row_empties_cart() {
        let mut cart = store();
        cart.add(ItemId::new(1), "a.com", Decimal::new(10, 0)).unwrap();

        assert!(cart.remove_by_id(ItemId::new(1)).unwrap());
        assert!(cart.items().unwrap().is_empty());
        assert_eq!(cart.item_count().unwrap(), 0);
        assert_eq!(cart.total().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_remove_by_name() {
        let mut cart = store();
        cart.add(ItemId::new(1), "a.com", Decimal::new(10, 0)).unwrap();
        cart.add(ItemId::new(2), "b.com", Decimal::new(10, 0)).unwrap();

        assert!(cart.remove("A.com").unwrap());
        let names: Vec<&str> = cart.items().unwrap().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["b.com"]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = store();
        cart.add(ItemId::new(1), "a.com", Decimal::new(10, 0)).unwrap();

        assert!(!cart.remove("zzz.com").unwrap());
        assert!(!cart.remove_by_id(ItemId::new(42)).unwrap());
        assert_eq!(cart.items().unwrap().len(), 1);
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut cart = store();
        let err = cart
            .add(ItemId::new(1), "a.com", Decimal::new(-1, 0))
            .unwrap_err();
        assert!(matches!(err, CartError::NegativePrice(_)));
        assert!(cart.items().unwrap().is_empty());
    }

    #[test]
    fn test_persistence_round_trip() {
        let mut storage = MemoryStore::new();
        let expected = {
            let mut cart = CartStore::new(&mut storage);
            cart.add(ItemId::new(3), "mybrand.app", Decimal::new(1999, 2))
                .unwrap();
            cart.add(ItemId::new(1_700_000_000_000), "zeta.xyz", Decimal::new(199, 2))
                .unwrap();
            cart.add(ItemId::new(3), "mybrand.app", Decimal::new(1999, 2))
                .unwrap();
            cart.items().unwrap().to_vec()
        };

        let mut reloaded = CartStore::new(storage);
        assert_eq!(reloaded.items().unwrap(), expected.as_slice());
    }

    #[test]
    fn test_stored_layout_uses_plain_numbers() {
        let mut cart = store();
        cart.add(ItemId::new(1), "example.com", Decimal::new(1299, 2))
            .unwrap();

        let raw = cart.into_inner().get(CART_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{ "id": 1, "name": "example.com", "price": 12.99, "quantity": 1 }])
        );
    }

    #[test]
    fn test_hydrates_from_existing_storage() {
        let mut storage = MemoryStore::new();
        storage
            .set(
                CART_KEY,
                r#"[{"id":2,"name":"techstart.io","price":24.99,"quantity":3}]"#.to_string(),
            )
            .unwrap();

        let mut cart = CartStore::new(storage);
        assert_eq!(cart.item_count().unwrap(), 3);
        assert_eq!(cart.total().unwrap(), Decimal::new(7497, 2));
    }

    #[test]
    fn test_unreadable_storage_is_treated_as_empty() {
        let mut storage = MemoryStore::new();
        storage.set(CART_KEY, "not json".to_string()).unwrap();

        let mut cart = CartStore::new(storage);
        assert!(cart.items().unwrap().is_empty());

        // The next write replaces the bad value
        cart.add(ItemId::new(1), "a.com", Decimal::ONE).unwrap();
        let raw = cart.into_inner().get(CART_KEY).unwrap().unwrap();
        assert!(raw.starts_with('['));
    }

    #[test]
    fn test_null_storage_is_empty() {
        let mut storage = MemoryStore::new();
        storage.set(CART_KEY, "null".to_string()).unwrap();
        let mut cart = CartStore::new(storage);
        assert!(cart.items().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_stored_rows_are_dropped() {
        let mut storage = MemoryStore::new();
        storage
            .set(
                CART_KEY,
                r#"[{"id":1,"name":"a.com","price":-1,"quantity":0},
                    {"id":2,"name":"b.com","price":5,"quantity":0},
                    {"id":3,"name":"c.com","price":-2,"quantity":1},
                    {"id":4,"name":"d.com","price":12.99,"quantity":1}]"#
                    .to_string(),
            )
            .unwrap();

        let mut cart = CartStore::new(storage);
        let names: Vec<&str> = cart.items().unwrap().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["d.com"]);
        assert_eq!(cart.total().unwrap(), Decimal::new(1299, 2));
    }

    #[test]
    fn test_huge_stored_price_does_not_panic() {
        let mut storage = MemoryStore::new();
        storage
            .set(
                CART_KEY,
                r#"[{"id":1,"name":"a.com","price":7.9e28,"quantity":2},
                    {"id":2,"name":"b.com","price":7.9e28,"quantity":1},
                    {"id":3,"name":"c.com","price":7.9e28,"quantity":1}]"#
                    .to_string(),
            )
            .unwrap();

        let mut cart = CartStore::new(storage);
        // The doubled row cannot be totalled and is dropped
        assert_eq!(cart.items().unwrap().len(), 2);
        assert_eq!(cart.total().unwrap(), Decimal::MAX);
        assert_eq!(cart.item_count().unwrap(), 2);
    }

    #[test]
    fn test_failed_write_leaves_cart_unchanged() {
        /// Reads work, every write fails.
        #[derive(Default)]
        struct ReadOnly(MemoryStore);

        impl KeyValueStore for ReadOnly {
            fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
                self.0.get(key)
            }
            fn set(&mut self, _: &str, _: String) -> std::result::Result<(), StorageError> {
                Err(std::io::Error::other("disk full").into())
            }
            fn remove(&mut self, _: &str) -> std::result::Result<(), StorageError> {
                Err(std::io::Error::other("disk full").into())
            }
        }

        let mut inner = MemoryStore::new();
        inner
            .set(
                CART_KEY,
                r#"[{"id":1,"name":"a.com","price":10,"quantity":1}]"#.to_string(),
            )
            .unwrap();
        let mut cart = CartStore::new(ReadOnly(inner));
        let before = cart.items().unwrap().to_vec();
        let mut rx = cart.subscribe();
        rx.borrow_and_update();

        let err = cart.add(ItemId::new(2), "b.com", Decimal::ONE).unwrap_err();
        assert!(matches!(err, CartError::Storage(_)));
        assert!(cart.add(ItemId::new(1), "a.com", Decimal::TEN).is_err());
        assert!(cart.remove("a.com").is_err());
        assert!(cart.remove_by_id(ItemId::new(1)).is_err());
        assert!(cart.clear().is_err());

        assert_eq!(cart.items().unwrap(), before.as_slice());
        assert_eq!(cart.total().unwrap(), Decimal::TEN);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_add_domain_generates_distinct_ids() {
        let engine = SearchEngine::default();
        let mut cart = store();

        let first = cart.add_domain(&engine.quote("alpha.com").unwrap()).unwrap();
        let second = cart.add_domain(&engine.quote("beta.com").unwrap()).unwrap();
        assert!(second > first);

        // Re-adding keeps the original row and id
        let again = cart.add_domain(&engine.quote("alpha.com").unwrap()).unwrap();
        assert_eq!(again, first);
        assert_eq!(cart.items().unwrap().len(), 2);
        assert_eq!(cart.item_count().unwrap(), 3);
    }

    #[test]
    fn test_add_domain_rejects_unavailable() {
        let engine = SearchEngine::default();
        let mut cart = store();

        let err = cart
            .add_domain(&engine.quote("example.com").unwrap())
            .unwrap_err();
        assert!(matches!(err, CartError::Unavailable(d) if d == "example.com"));
        assert!(cart.items().unwrap().is_empty());
    }

    #[test]
    fn test_add_product() {
        let mut cart = store();
        assert!(cart.add_product(ProductId::new(2)).unwrap());
        assert!(cart.add_product(ProductId::new(2)).unwrap());
        assert!(!cart.add_product(ProductId::new(99)).unwrap());

        let items = cart.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, ItemId::new(2));
        assert_eq!(items[0].name, "techstart.io");
        assert_eq!(items[0].quantity, 2);
    }

    #[test]
    fn test_clear() {
        let mut cart = store();
        cart.add_product(ProductId::new(1)).unwrap();
        cart.clear().unwrap();
        assert!(cart.items().unwrap().is_empty());
    }

    #[test]
    fn test_subscribers_see_changes() {
        let mut cart = store();
        let mut rx = cart.subscribe();
        assert!(!rx.has_changed().unwrap());

        cart.add(ItemId::new(1), "a.com", Decimal::new(10, 0)).unwrap();
        assert!(rx.has_changed().unwrap());
        let summary = rx.borrow_and_update().clone();
        assert_eq!(summary.item_count, 1);
        assert_eq!(summary.total, Decimal::new(10, 0));

        // A no-op removal publishes nothing
        cart.remove("missing.com").unwrap();
        assert!(!rx.has_changed().unwrap());

        cart.remove("a.com").unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().item_count, 0);
    }

    #[test]
    fn test_reload_picks_up_external_writes() {
        use std::cell::RefCell;
        use std::rc::Rc;

        /// Two stores over one backing map, like two tabs over one profile.
        #[derive(Clone, Default)]
        struct Shared(Rc<RefCell<MemoryStore>>);

        impl KeyValueStore for Shared {
            fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
                self.0.borrow().get(key)
            }
            fn set(&mut self, key: &str, value: String) -> std::result::Result<(), StorageError> {
                self.0.borrow_mut().set(key, value)
            }
            fn remove(&mut self, key: &str) -> std::result::Result<(), StorageError> {
                self.0.borrow_mut().remove(key)
            }
        }

        let shared = Shared::default();
        let mut first = CartStore::new(shared.clone());
        let mut second = CartStore::new(shared);

        first.add(ItemId::new(1), "a.com", Decimal::ONE).unwrap();
        assert!(second.items().unwrap().first().is_some());

        first.add(ItemId::new(2), "b.com", Decimal::ONE).unwrap();
        // Not synced until asked
        assert_eq!(second.items().unwrap().len(), 1);

        second.reload().unwrap();
        assert_eq!(second.items().unwrap().len(), 2);
    }
}
