use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use parlor_core::ProductId;
use parlor_products::{NewProduct, Product, ProductPatch};

use super::{filter_by_name, ProductRepository};
use crate::error::RepositoryResult;

#[derive(Debug)]
struct Table {
    /// Last id handed out. Ids are never reused, even after deletes.
    last_id: i64,
    rows: BTreeMap<ProductId, Product>,
}

/// In-memory product store.
///
/// Intended for tests/dev. Mirrors the auto-increment behaviour of the SQL
/// adapters: ids start at 1 and are never reused.
#[derive(Debug)]
pub struct InMemoryProductRepository {
    table: RwLock<Table>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                last_id: 0,
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn ensure_schema(&self) -> RepositoryResult<()> {
        Ok(())
    }

    async fn create(&self, product: NewProduct) -> RepositoryResult<Product> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let id = ProductId::new(table.last_id);
        let product = product.into_product(id);
        table.rows.insert(id, product.clone());
        Ok(product)
    }

    async fn get(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> RepositoryResult<Option<Product>> {
        let mut table = self.table.write().await;
        Ok(table.rows.get_mut(&id).map(|product| {
            product.apply_patch(&patch);
            product.clone()
        }))
    }

    async fn delete(&self, id: ProductId) -> RepositoryResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_name_substring(&self, pattern: &str) -> RepositoryResult<Vec<Product>> {
        let all = self.table.read().await.rows.values().cloned().collect();
        Ok(filter_by_name(all, pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_core::{CategoryId, Entity};
    use parlor_products::{ProductDraft, ProductUpdate};
    use rust_decimal::Decimal;

    fn draft(name: &str, price_cents: i64, quantity: i64) -> NewProduct {
        ProductDraft::new(name, CategoryId::new(1), Decimal::new(price_cents, 2), quantity)
            .validate()
            .unwrap()
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let repo = InMemoryProductRepository::new();
        let a = repo.create(draft("Vanilla", 300, 10)).await.unwrap();
        let b = repo.create(draft("Chocolate", 250, 3)).await.unwrap();

        assert_eq!(a.id(), ProductId::new(1));
        assert_eq!(b.id(), ProductId::new(2));
        assert_eq!(repo.list_all().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryProductRepository::new();
        let a = repo.create(draft("Vanilla", 300, 10)).await.unwrap();
        assert!(repo.delete(a.id()).await.unwrap());

        let b = repo.create(draft("Mint", 300, 1)).await.unwrap();
        assert_eq!(b.id(), ProductId::new(2));
    }

    #[tokio::test]
    async fn delete_missing_id_returns_false_and_keeps_others() {
        let repo = InMemoryProductRepository::new();
        let a = repo.create(draft("Vanilla", 300, 10)).await.unwrap();

        assert!(!repo.delete(ProductId::new(99)).await.unwrap());
        assert_eq!(repo.list_all().await.unwrap(), vec![a]);
    }

    #[tokio::test]
    async fn update_missing_id_returns_none() {
        let repo = InMemoryProductRepository::new();
        let patch = ProductUpdate::default().quantity(1).validate().unwrap();
        assert!(repo.update(ProductId::new(1), patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_is_case_insensitive() {
        let repo = InMemoryProductRepository::new();
        repo.create(draft("Chocolate", 250, 3)).await.unwrap();
        repo.create(draft("Vanilla", 300, 10)).await.unwrap();
        repo.create(draft("Choco Chip", 275, 4)).await.unwrap();

        let names: Vec<_> = repo
            .find_by_name_substring("cho")
            .await
            .unwrap()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["Chocolate", "Choco Chip"]);
    }
}
