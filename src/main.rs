//! Ethereum development-chain portal.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────┐
//!                      │                    PORTAL                      │
//!                      │                                                │
//!   Client Request     │  ┌─────────┐    ┌──────────┐    ┌──────────┐  │
//!   ───────────────────┼─▶│  http   │───▶│  portal  │───▶│  chain   │──┼──▶ JSON-RPC node
//!                      │  │ server  │    │  facade  │    │  client  │  │
//!   Client Response    │  └─────────┘    └──────────┘    └──────────┘  │
//!   ◀──────────────────┼── envelope ◀── PortalError / payload           │
//!                      │                                                │
//!                      │  config · lifecycle · observability · resilience│
//!                      └───────────────────────────────────────────────┘
//! ```
//!
//! Startup order: configuration, logging, metrics, chain connection (with
//! retry), listener. If the chain endpoint never answers the process exits
//! with an error instead of serving.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use ether_portal::config::load_config;
use ether_portal::http::HttpServer;
use ether_portal::lifecycle::{bootstrap, signals, Shutdown};
use ether_portal::observability::{logging, metrics};

#[derive(Debug, Parser)]
#[command(name = "ether-portal", version, about = "Account and transaction portal for development chains")]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init_logging(&config.observability)?;
    tracing::info!("ether-portal v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.server.bind_address,
        rpc_url = %config.chain.rpc_url,
        request_timeout_secs = config.server.request_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let portal = match bootstrap(&config).await {
        Ok(portal) => Arc::new(portal),
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    HttpServer::new(portal, &config.server)
        .run(listener, shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
