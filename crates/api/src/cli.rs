use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::server;

/// Ice cream parlor inventory: HTTP API and console menu.
#[derive(Debug, Parser)]
#[command(name = "parlor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Extra configuration file layered over `config/default` and `config/local`.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve,

    /// Run the interactive console menu
    Console,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load(cli.config.as_deref())?;
    parlor_observability::init(&config.logging);
    tracing::debug!(?config, "configuration loaded");

    let inventory = server::open_inventory(&config).await?;

    match cli.command {
        Command::Serve => server::serve(&config.server, inventory).await,
        Command::Console => server::console(inventory).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommand_and_global_config() {
        let cli = Cli::try_parse_from(["parlor", "serve", "--config", "prod.toml"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
        assert_eq!(cli.config, Some(PathBuf::from("prod.toml")));

        let cli = Cli::try_parse_from(["parlor", "console"]).unwrap();
        assert!(matches!(cli.command, Command::Console));
        assert!(cli.config.is_none());
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["parlor"]).is_err());
    }
}
