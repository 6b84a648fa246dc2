//! Disposable read models rebuilt from the product store.

pub mod inventory_cache;

pub use inventory_cache::InventoryCache;
