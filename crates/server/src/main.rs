mod api;
mod bootstrap;
mod health;

use std::future::IntoFuture;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use catalog_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use clap::Parser;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(
    name = "catalog-server",
    about = "In-memory product catalog HTTP service",
    after_help = "Examples:\n  catalog-server\n  catalog-server --port 9000\n  catalog-server --config config/catalog.toml"
)]
struct ServerArgs {
    #[arg(long, help = "Path to a TOML config file (required to exist when given)")]
    config: Option<PathBuf>,
    #[arg(long, help = "Address to bind the HTTP listener to")]
    bind_address: Option<String>,
    #[arg(long, help = "Port to listen on (overrides PORT and CATALOG_SERVER_PORT)")]
    port: Option<u16>,
    #[arg(long, help = "Log level: trace|debug|info|warn|error")]
    log_level: Option<String>,
}

impl ServerArgs {
    fn into_load_options(self) -> LoadOptions {
        LoadOptions {
            require_file: self.config.is_some(),
            config_path: self.config,
            overrides: ConfigOverrides {
                bind_address: self.bind_address,
                port: self.port,
                log_level: self.log_level,
            },
        }
    }
}

fn init_logging(config: &AppConfig) {
    use catalog_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run(ServerArgs::parse()).await
}

async fn run(args: ServerArgs) -> Result<()> {
    // Config comes first so logging honours the configured level and format.
    let config = AppConfig::load(args.into_load_options())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config);
    let listener = app.bind().await?;
    let grace_period = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    let listen_address = listener.local_addr()?;

    info!(
        event_name = "system.server.started",
        listen_address = %listen_address,
        "catalog server listening"
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app.router())
        .with_graceful_shutdown(async move {
            wait_for_shutdown().await;
            let _ = shutdown_tx.send(());
        })
        .into_future();
    tokio::pin!(server);

    let drain_deadline = async move {
        if shutdown_rx.await.is_ok() {
            tokio::time::sleep(grace_period).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        served = &mut server => served?,
        () = drain_deadline => {
            warn!(
                event_name = "system.server.drain_timeout",
                grace_period_secs = grace_period.as_secs(),
                "in-flight requests did not finish before the grace period elapsed"
            );
        }
    }

    let products = app.store.len().await;
    info!(
        event_name = "system.server.stopping",
        products,
        "catalog server stopping"
    );

    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(
            event_name = "system.server.signal_error",
            error = %error,
            "could not listen for shutdown signal"
        );
        std::future::pending::<()>().await;
    }
}
