//! Database selection and connection setup.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

use crate::error::RepositoryResult;
use crate::repository::{
    InMemoryProductRepository, PostgresProductRepository, ProductRepository, SqliteProductRepository,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    #[default]
    Sqlite,
    Postgres,
    Memory,
}

/// `[database]` section of the application config.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub driver: DatabaseDriver,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub sqlite_url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DatabaseDriver::default(),
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "parlor".to_string(),
            sqlite_url: "sqlite://parlor.db".to_string(),
            max_connections: 5,
            connect_timeout_secs: 10,
        }
    }
}

// Hand-written so the password never ends up in logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .field("sqlite_url", &self.sqlite_url)
            .field("max_connections", &self.max_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    fn pg_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

/// Open the configured store. The schema is not touched here; see
/// [`crate::Inventory::open`].
pub async fn connect(config: &DatabaseConfig) -> RepositoryResult<Arc<dyn ProductRepository>> {
    tracing::info!(driver = ?config.driver, "connecting to product store");

    let repo: Arc<dyn ProductRepository> = match config.driver {
        DatabaseDriver::Memory => Arc::new(InMemoryProductRepository::new()),
        DatabaseDriver::Sqlite => Arc::new(
            SqliteProductRepository::connect(
                &config.sqlite_url,
                config.max_connections,
                config.connect_timeout(),
            )
            .await?,
        ),
        DatabaseDriver::Postgres => Arc::new(
            PostgresProductRepository::connect(
                config.pg_options(),
                config.max_connections,
                config.connect_timeout(),
            )
            .await?,
        ),
    };

    Ok(repo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_core::CategoryId;
    use parlor_products::ProductDraft;
    use rust_decimal::Decimal;

    #[test]
    fn defaults_point_at_local_sqlite() {
        let config = DatabaseConfig::default();
        assert_eq!(config.driver, DatabaseDriver::Sqlite);
        assert_eq!(config.sqlite_url, "sqlite://parlor.db");
        assert_eq!(config.port, 5432);
        assert!(config.password.is_empty());
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn debug_output_hides_password() {
        let config = DatabaseConfig {
            password: "hunter2".to_string(),
            ..DatabaseConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn driver_names_are_lowercase() {
        let driver: DatabaseDriver = serde_json::from_str("\"postgres\"").unwrap();
        assert_eq!(driver, DatabaseDriver::Postgres);
        assert!(serde_json::from_str::<DatabaseDriver>("\"Oracle\"").is_err());
    }

    #[tokio::test]
    async fn memory_driver_needs_no_server() {
        let config = DatabaseConfig {
            driver: DatabaseDriver::Memory,
            ..DatabaseConfig::default()
        };
        let repo = connect(&config).await.unwrap();
        repo.ensure_schema().await.unwrap();
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sqlite_memory_url_connects() {
        let config = DatabaseConfig {
            sqlite_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..DatabaseConfig::default()
        };
        let repo = connect(&config).await.unwrap();
        repo.ensure_schema().await.unwrap();
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sqlite_memory_url_is_one_database_across_the_pool() {
        let config = DatabaseConfig {
            sqlite_url: "sqlite::memory:".to_string(),
            max_connections: 5,
            ..DatabaseConfig::default()
        };
        let repo = connect(&config).await.unwrap();
        repo.ensure_schema().await.unwrap();
        let draft = ProductDraft::new("Vanilla", CategoryId::new(1), Decimal::new(300, 2), 4);
        repo.create(draft.validate().unwrap()).await.unwrap();

        let (a, b, c, d, e) = tokio::join!(
            repo.list_all(),
            repo.list_all(),
            repo.list_all(),
            repo.list_all(),
            repo.list_all(),
        );
        for rows in [a, b, c, d, e] {
            assert_eq!(rows.unwrap().len(), 1);
        }
    }
}
