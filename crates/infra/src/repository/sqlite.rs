//! SQLite-backed product store.
//!
//! Prices are stored as TEXT so the two-digit decimal survives exactly; SQLite
//! has no fixed-point column type. `AUTOINCREMENT` guarantees ids are never
//! reused after deletes.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::instrument;

use parlor_core::{CategoryId, ProductId};
use parlor_products::{NewProduct, Product, ProductPatch};

use super::{filter_by_name, ProductRepository};
use crate::error::{map_sqlx_error, RepositoryError, RepositoryResult};

const SELECT_COLUMNS: &str = "SELECT id, name, category_id, price, quantity FROM products";

#[derive(Debug, Clone)]
pub struct SqliteProductRepository {
    pool: SqlitePool,
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `url`, e.g. `sqlite://parlor.db`.
    ///
    /// Each connection to an in-memory URL gets its own empty database, so
    /// those URLs are opened like [`Self::in_memory`] on one pinned connection.
    pub async fn connect(url: &str, max_connections: u32, connect_timeout: Duration) -> RepositoryResult<Self> {
        if is_memory_url(url) {
            tracing::debug!(url, "in-memory sqlite url; using a single connection");
            return Self::in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| map_sqlx_error("connect", e))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(connect_timeout)
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Ok(Self::new(pool))
    }

    /// Private in-memory database. The pool is pinned to a single connection
    /// that never expires, since every SQLite memory connection is its own
    /// database.
    pub async fn in_memory() -> RepositoryResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| map_sqlx_error("connect", e))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    #[instrument(skip(self), err)]
    async fn ensure_schema(&self) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT    NOT NULL,
                category_id INTEGER NOT NULL,
                price       TEXT    NOT NULL,
                quantity    INTEGER NOT NULL CHECK (quantity BETWEEN 0 AND 1000000000)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        Ok(())
    }

    #[instrument(skip(self, product), fields(name = %product.name), err)]
    async fn create(&self, product: NewProduct) -> RepositoryResult<Product> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (name, category_id, price, quantity)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id
            "#,
        )
        .bind(product.name.as_str())
        .bind(product.category_id.get())
        .bind(product.price.to_string())
        .bind(product.quantity.get())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create", e))?;

        let id: i64 = row.try_get("id").map_err(|e| map_sqlx_error("create", e))?;
        Ok(product.into_product(ProductId::new(id)))
    }

    #[instrument(skip(self), err)]
    async fn get(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;

        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self, patch), err)]
    async fn update(&self, id: ProductId, patch: ProductPatch) -> RepositoryResult<Option<Product>> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        let row = sqlx::query(
            r#"
            UPDATE products SET
                name        = COALESCE(?1, name),
                category_id = COALESCE(?2, category_id),
                price       = COALESCE(?3, price),
                quantity    = COALESCE(?4, quantity)
            WHERE id = ?5
            RETURNING id, name, category_id, price, quantity
            "#,
        )
        .bind(patch.name.as_ref().map(|n| n.as_str().to_string()))
        .bind(patch.category_id.map(|c| c.get()))
        .bind(patch.price.map(|p| p.to_string()))
        .bind(patch.quantity.map(|q| q.get()))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: ProductId) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), err)]
    async fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        let rows = sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_all", e))?;

        rows.iter().map(product_from_row).collect()
    }

    /// Full scan filtered in process, so case folding matches the cache for
    /// non-ASCII names. Order stays id ascending.
    #[instrument(skip(self), err)]
    async fn find_by_name_substring(&self, pattern: &str) -> RepositoryResult<Vec<Product>> {
        let all = self.list_all().await?;
        Ok(filter_by_name(all, pattern))
    }
}

fn product_from_row(row: &SqliteRow) -> RepositoryResult<Product> {
    let decode = |e| map_sqlx_error("decode_product", e);

    let id: i64 = row.try_get("id").map_err(decode)?;
    let name: String = row.try_get("name").map_err(decode)?;
    let category_id: i64 = row.try_get("category_id").map_err(decode)?;
    let price: String = row.try_get("price").map_err(decode)?;
    let quantity: i64 = row.try_get("quantity").map_err(decode)?;

    let price = Decimal::from_str(&price)
        .map_err(|e| RepositoryError::persistence(format!("product {id} has unreadable price {price:?}: {e}")))?;

    Product::restore(ProductId::new(id), &name, CategoryId::new(category_id), price, quantity)
        .map_err(|e| RepositoryError::persistence(format!("product {id} violates an invariant: {e}")))
}
