//! Process entry points behind the `parlor` subcommands.

use std::io;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;

use parlor_console::Console;
use parlor_infra::Inventory;

use crate::app;
use crate::config::{AppConfig, ServerConfig};

/// Connect to the configured store and load the inventory cache.
pub async fn open_inventory(config: &AppConfig) -> anyhow::Result<Arc<Inventory>> {
    let repo = parlor_infra::db::connect(&config.database)
        .await
        .context("failed to connect to the product store")?;
    let inventory = Inventory::open(repo)
        .await
        .context("failed to load the inventory")?;
    Ok(Arc::new(inventory))
}

/// Serve the HTTP API until Ctrl+C or SIGTERM.
pub async fn serve(server: &ServerConfig, inventory: Arc<Inventory>) -> anyhow::Result<()> {
    let addr = server.socket_addr().context("invalid server.host")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app::build_app(inventory))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Run the interactive menu on stdin/stdout.
pub async fn console(inventory: Arc<Inventory>) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(inventory, stdin.lock(), stdout.lock());
    console.run().await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, shutting down");
        }
    }
}
