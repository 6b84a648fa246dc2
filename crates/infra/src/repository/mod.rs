//! Durable storage of products.
//!
//! `ProductRepository` is the only way products enter or leave a store. Every
//! adapter receives input that has already been validated (`NewProduct`,
//! `ProductPatch`), so invariant checks live in the domain crate and are never
//! repeated per adapter.

use std::sync::Arc;

use async_trait::async_trait;

use parlor_core::ProductId;
use parlor_products::{NewProduct, Product, ProductPatch};

use crate::error::RepositoryResult;

pub mod in_memory;
pub mod postgres;
pub mod sqlite;

pub use in_memory::InMemoryProductRepository;
pub use postgres::PostgresProductRepository;
pub use sqlite::SqliteProductRepository;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create the backing table if it does not exist. Idempotent.
    async fn ensure_schema(&self) -> RepositoryResult<()>;

    /// Insert a new row and return it with the store-assigned id.
    async fn create(&self, product: NewProduct) -> RepositoryResult<Product>;

    async fn get(&self, id: ProductId) -> RepositoryResult<Option<Product>>;

    /// Apply the provided fields only. `Ok(None)` when `id` does not exist.
    async fn update(&self, id: ProductId, patch: ProductPatch) -> RepositoryResult<Option<Product>>;

    /// Remove the row. `Ok(false)` when `id` does not exist.
    async fn delete(&self, id: ProductId) -> RepositoryResult<bool>;

    /// Full scan ordered by id ascending.
    async fn list_all(&self) -> RepositoryResult<Vec<Product>>;

    /// Case-insensitive substring match on the name. An empty pattern matches
    /// every product.
    async fn find_by_name_substring(&self, pattern: &str) -> RepositoryResult<Vec<Product>>;
}

#[async_trait]
impl<R> ProductRepository for Arc<R>
where
    R: ProductRepository + ?Sized,
{
    async fn ensure_schema(&self) -> RepositoryResult<()> {
        (**self).ensure_schema().await
    }

    async fn create(&self, product: NewProduct) -> RepositoryResult<Product> {
        (**self).create(product).await
    }

    async fn get(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        (**self).get(id).await
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> RepositoryResult<Option<Product>> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: ProductId) -> RepositoryResult<bool> {
        (**self).delete(id).await
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        (**self).list_all().await
    }

    async fn find_by_name_substring(&self, pattern: &str) -> RepositoryResult<Vec<Product>> {
        (**self).find_by_name_substring(pattern).await
    }
}

/// Case-insensitive substring match shared by every adapter and the cache.
///
/// Folding is Unicode-aware (`PIÑA` matches `piña`). SQL `LOWER()` is not on
/// every backend, so the SQL adapters filter scanned rows with this too.
pub(crate) fn name_matches(name: &str, pattern: &str) -> bool {
    name.to_lowercase().contains(&pattern.to_lowercase())
}

/// Keep the products whose name contains `pattern`, preserving order.
pub(crate) fn filter_by_name(products: Vec<Product>, pattern: &str) -> Vec<Product> {
    products
        .into_iter()
        .filter(|p| name_matches(p.name(), pattern))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_match_is_case_insensitive() {
        assert!(name_matches("Chocolate", "cho"));
        assert!(name_matches("Choco Chip", "CHO"));
        assert!(!name_matches("Vanilla", "cho"));
        assert!(name_matches("Vanilla", ""));
    }

    #[test]
    fn name_match_folds_non_ascii_letters() {
        assert!(name_matches("PIÑA COLADA", "piña"));
        assert!(name_matches("Crème Brûlée", "CRÈME"));
        assert!(!name_matches("Pina", "piña"));
    }

    #[test]
    fn wildcard_characters_match_literally() {
        assert!(name_matches("100% Mango", "0%"));
        assert!(!name_matches("100 Mango", "0%"));
        assert!(!name_matches("Mango", "_"));
    }
}
