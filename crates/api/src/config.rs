//! Layered application configuration.
//!
//! Sources, later ones winning: `config/default.*`, `config/local.*`, an
//! explicit file passed with `--config`, then `PARLOR__SECTION__KEY`
//! environment variables.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use serde::Deserialize;

use parlor_infra::DatabaseConfig;
use parlor_observability::LoggingConfig;

pub const ENV_PREFIX: &str = "PARLOR";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::from((ip, self.port)))
    }
}

impl AppConfig {
    pub fn load(explicit: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_infra::DatabaseDriver;
    use parlor_observability::LogFormat;

    #[test]
    fn defaults_without_any_source() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.database.driver, DatabaseDriver::Sqlite);
        let expected: SocketAddr = "0.0.0.0:8080".parse().unwrap();
        assert_eq!(config.server.socket_addr().unwrap(), expected);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("parlor-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
            [server]
            port = 9090

            [logging]
            format = "json"

            [database]
            driver = "memory"
            "#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.database.driver, DatabaseDriver::Memory);
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("parlor-config-does-not-exist.toml");
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn bad_host_is_rejected() {
        let server = ServerConfig {
            host: "not an ip".to_string(),
            port: 1,
        };
        assert!(server.socket_addr().is_err());
    }
}
