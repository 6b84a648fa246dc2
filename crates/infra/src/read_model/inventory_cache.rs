use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::{Decimal, RoundingStrategy};

use parlor_core::{Entity, ProductId};
use parlor_products::Product;

use crate::repository::name_matches;

/// In-memory mirror of the product table, keyed by id.
///
/// Holds at most one entry per id. Ordering by key gives the same id-ascending
/// order as a full store scan. The cache never talks to the store itself; the
/// owning [`crate::Inventory`] decides when to swap or patch entries.
#[derive(Debug, Default)]
pub struct InventoryCache {
    entries: RwLock<BTreeMap<ProductId, Product>>,
}

impl InventoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    // A panicking writer cannot leave the map half-updated (every write is a
    // single insert/remove/swap), so a poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<ProductId, Product>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<ProductId, Product>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the whole mapping in one step. Readers see either the old or
    /// the new contents, never a mix.
    pub fn replace_all(&self, products: Vec<Product>) {
        let fresh: BTreeMap<_, _> = products.into_iter().map(|p| (p.id(), p)).collect();
        *self.write() = fresh;
    }

    pub fn upsert(&self, product: Product) {
        self.write().insert(product.id(), product);
    }

    pub fn remove(&self, id: ProductId) -> Option<Product> {
        self.write().remove(&id)
    }

    pub fn get(&self, id: ProductId) -> Option<Product> {
        self.read().get(&id).cloned()
    }

    /// All entries, ordered by id ascending.
    pub fn list(&self) -> Vec<Product> {
        self.read().values().cloned().collect()
    }

    /// Case-insensitive substring match on the name.
    pub fn search(&self, pattern: &str) -> Vec<Product> {
        self.read()
            .values()
            .filter(|p| name_matches(p.name(), pattern))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Sum of `quantity` across all entries.
    ///
    /// Each quantity is at most `Quantity::MAX`, so reaching the saturation
    /// point would take billions of entries.
    pub fn total_items(&self) -> i64 {
        self.read()
            .values()
            .fold(0i64, |acc, p| acc.saturating_add(p.quantity().get()))
    }

    /// Sum of `quantity * price` across all entries, rounded to cents.
    pub fn inventory_value(&self) -> Decimal {
        let mut total = self
            .read()
            .values()
            .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.stock_value()))
            .unwrap_or(Decimal::MAX)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        total.rescale(2);
        total
    }
}
