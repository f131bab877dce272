//! restkit service binary.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request       ┌──────────────────────────────────────────────┐
//!     ─────────────────────┼─▶ axum transport ─▶ routing::Router          │
//!                          │                        │                     │
//!                          │          ┌─────────────┼──────────────┐      │
//!                          │          ▼             ▼              ▼      │
//!                          │      handler      not-found      panic       │
//!                          │          │          handler       handler    │
//!                          │          └─────────────┼──────────────┘      │
//!                          │                        ▼                     │
//!     Client Response      │                  http::codec ─▶ access log   │
//!     ◀────────────────────┼────────────────────────┘                     │
//!                          └──────────────────────────────────────────────┘
//! ```
//!
//! Registers the liveness endpoint and serves until Ctrl+C.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use restkit::config::{self, DataSourceName, ServiceConfig};
use restkit::health::HealthHandler;
use restkit::lifecycle::{signals, Shutdown};
use restkit::observability::{logging, metrics};
use restkit::{BasicRegistry, Service};

#[derive(Debug, Parser)]
#[command(name = "restkit", version, about = "JSON HTTP service")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "RESTKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured listen port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(port) = cli.port {
        config.port = port;
    }

    logging::init(&config)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "restkit starting");
    tracing::info!(
        bind_address = %config.bind_address(),
        log_level = %config.log_level,
        data_source = ?config.data_source_name,
        "Configuration loaded"
    );

    if let Some(raw) = &config.metrics_address {
        let addr: SocketAddr = raw.parse()?;
        metrics::init_metrics(addr)?;
    }

    let registry: Arc<BasicRegistry<DataSourceName>> =
        Arc::new(BasicRegistry::with_tracing(config.data_source_name.clone()));
    let mut service = Service::new(config, registry);

    let health = HealthHandler::new(&service);
    service.router_mut().register(&[&health]);

    let listener = TcpListener::bind(service.bind_address()).await?;

    let shutdown = Shutdown::new();
    let signal = shutdown.signal();
    tokio::spawn(async move {
        signals::ctrl_c().await;
        shutdown.trigger();
    });

    service.serve_with_shutdown(listener, signal).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
