//! Infrastructure layer: product storage adapters, the inventory cache and
//! database configuration.

pub mod db;
pub mod error;
pub mod inventory;
pub mod read_model;
pub mod repository;

pub use db::{DatabaseConfig, DatabaseDriver};
pub use error::{RepositoryError, RepositoryResult};
pub use inventory::{Inventory, InventorySummary};
pub use read_model::InventoryCache;
pub use repository::{
    InMemoryProductRepository, PostgresProductRepository, ProductRepository, SqliteProductRepository,
};
