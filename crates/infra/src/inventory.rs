//! The inventory context: one repository plus the cache that mirrors it.
//!
//! Every adapter (HTTP, console) goes through [`Inventory`]; nothing else
//! mutates the cache. Writes go to the store first and only touch the cache
//! once the store has accepted them.
//!
//! Writes and reloads made through one `Inventory` are serialized by a write
//! gate, so a write cannot land between a reload's scan and its cache swap.
//! Rows written by other processes show up on the next reload.

use std::sync::Arc;

use tokio::sync::Mutex;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use parlor_core::{Entity, ProductId};
use parlor_products::{Product, ProductDraft, ProductUpdate};

use crate::error::RepositoryResult;
use crate::read_model::InventoryCache;
use crate::repository::ProductRepository;

/// Aggregate figures over the cached inventory.
///
/// `inventory_value` serializes as a decimal string (`"12.50"`) so large
/// totals keep every cent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub product_count: usize,
    pub total_items: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub inventory_value: Decimal,
}

pub struct Inventory {
    repo: Arc<dyn ProductRepository>,
    cache: InventoryCache,
    write_gate: Mutex<()>,
}

impl std::fmt::Debug for Inventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inventory")
            .field("cached_products", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl Inventory {
    /// Wrap `repo` with an empty cache. Nothing is read from the store.
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self {
            repo,
            cache: InventoryCache::new(),
            write_gate: Mutex::new(()),
        }
    }

    /// Ensure the schema exists and load the cache from the store.
    pub async fn open(repo: Arc<dyn ProductRepository>) -> RepositoryResult<Self> {
        let inventory = Self::new(repo);
        inventory.repo.ensure_schema().await?;
        inventory.reload().await?;
        Ok(inventory)
    }

    pub fn repository(&self) -> &Arc<dyn ProductRepository> {
        &self.repo
    }

    /// Replace the cache with a fresh full scan and return the product count.
    ///
    /// On failure the previous cache contents stay in place.
    #[instrument(skip(self), err)]
    pub async fn reload(&self) -> RepositoryResult<usize> {
        let _gate = self.write_gate.lock().await;
        let products = match self.repo.list_all().await {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!(
                    cached = self.cache.len(),
                    "inventory reload failed, keeping previous cache: {e}"
                );
                return Err(e);
            }
        };

        let count = products.len();
        self.cache.replace_all(products);
        tracing::info!(products = count, "inventory cache reloaded");
        Ok(count)
    }

    #[instrument(skip(self, draft), fields(name = %draft.name), err)]
    pub async fn add_product(&self, draft: ProductDraft) -> RepositoryResult<Product> {
        let new = draft.validate()?;
        let _gate = self.write_gate.lock().await;
        let product = self.repo.create(new).await?;
        self.cache.upsert(product.clone());
        tracing::info!(id = %product.id(), "product added");
        Ok(product)
    }

    /// Apply the provided fields. `Ok(None)` when the product does not exist.
    #[instrument(skip(self, update), err)]
    pub async fn update_product(&self, id: ProductId, update: ProductUpdate) -> RepositoryResult<Option<Product>> {
        let patch = update.validate()?;
        let _gate = self.write_gate.lock().await;
        match self.repo.update(id, patch).await? {
            Some(product) => {
                self.cache.upsert(product.clone());
                Ok(Some(product))
            }
            None => {
                self.cache.remove(id);
                Ok(None)
            }
        }
    }

    /// Delete from the store. Returns whether a row was removed. The cache
    /// entry is evicted either way.
    #[instrument(skip(self), err)]
    pub async fn remove_product(&self, id: ProductId) -> RepositoryResult<bool> {
        let _gate = self.write_gate.lock().await;
        let deleted = self.repo.delete(id).await?;
        self.cache.remove(id);
        if !deleted {
            tracing::debug!(%id, "delete matched no product");
        }
        Ok(deleted)
    }

    /// Read one product straight from the store and refresh its cache entry.
    #[instrument(skip(self), err)]
    pub async fn fetch(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let _gate = self.write_gate.lock().await;
        let found = self.repo.get(id).await?;
        match &found {
            Some(product) => self.cache.upsert(product.clone()),
            None => {
                self.cache.remove(id);
            }
        }
        Ok(found)
    }

    /// Substring search executed by the store rather than the cache.
    pub async fn search_store(&self, pattern: &str) -> RepositoryResult<Vec<Product>> {
        self.repo.find_by_name_substring(pattern).await
    }

    pub fn products(&self) -> Vec<Product> {
        self.cache.list()
    }

    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.cache.get(id)
    }

    pub fn search(&self, pattern: &str) -> Vec<Product> {
        self.cache.search(pattern)
    }

    pub fn total_items(&self) -> i64 {
        self.cache.total_items()
    }

    pub fn inventory_value(&self) -> Decimal {
        self.cache.inventory_value()
    }

    pub fn summary(&self) -> InventorySummary {
        InventorySummary {
            product_count: self.cache.len(),
            total_items: self.cache.total_items(),
            inventory_value: self.cache.inventory_value(),
        }
    }
}
