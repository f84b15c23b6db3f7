//! ScPrime app API gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                  GATEWAY                      │
//!                     │                                               │
//!   Client request    │  ┌────────┐   ┌────────────┐                  │
//!   ──────────────────┼─▶│  http  │──▶│ CacheStore │◀──┐              │
//!                     │  │ facade │   └────────────┘   │ publish      │
//!                     │  └───┬────┘                    │              │
//!                     │      │ explorer/pool     ┌─────┴──────┐       │
//!                     │      ▼                   │ schedulers │       │
//!                     │  ┌──────────────┐        │ (3 feeds)  │       │
//!                     │  │ transactions │        └─────┬──────┘       │
//!                     │  │  reconcile   │              │              │
//!                     │  └──────┬───────┘              │              │
//!                     │         ▼                      ▼              │
//!                     │  ┌────────────────────────────────────────┐   │
//!                     │  │ upstream: DaemonClient, Quote/RateClient│──┼──▶ spd, CMC, getgeoapi
//!                     │  └────────────────────────────────────────┘   │
//!                     └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use tokio::net::TcpListener;

use scp_app_api::cli::Cli;
use scp_app_api::config::{self, AppConfig};
use scp_app_api::http::{AppState, HttpServer};
use scp_app_api::lifecycle::{self, signals, startup, Shutdown};
use scp_app_api::observability::{logging, metrics};
use scp_app_api::sync::{spawn_schedulers, CacheStore};
use scp_app_api::upstream::{DaemonClient, QuoteClient, RateClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::loader::read_config(path)?,
        None => AppConfig::default(),
    };
    cli.apply(&mut config);
    config::loader::validate(&config)?;

    logging::init(&config.observability.log_level);
    tracing::info!("scp-app-api v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        daemon = %config.daemon.base_url(),
        "Configuration loaded"
    );

    let daemon = DaemonClient::new(&config.daemon)?;
    if let Err(e) = lifecycle::check_daemon(&daemon).await {
        tracing::error!(error = %e, "Daemon readiness check failed");
        eprintln!("{}", startup::diagnostic(&config.daemon.base_url()));
        std::process::exit(1);
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let quote = QuoteClient::from_config(&config.quotes)?;
    let rates = RateClient::from_config(&config.quotes)?;
    let cache = CacheStore::from_clients(daemon.clone(), quote, rates);

    let shutdown = Shutdown::new();
    let schedulers = spawn_schedulers(
        &cache,
        &config.sync,
        &shutdown,
        Some(Box::new(|previous: u64, current: u64| {
            tracing::info!(previous, current, "Chain height advanced");
        })),
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    signals::install(shutdown.clone());

    let server = HttpServer::new(&config.listener, AppState { cache, daemon });
    let served = server.run(listener, shutdown.subscribe()).await;

    // The server can also stop on an accept error; stop the feeds either way.
    shutdown.trigger();
    for result in futures_util::future::join_all(schedulers).await {
        if let Err(e) = result {
            tracing::warn!(error = %e, "Feed scheduler task failed");
        }
    }

    served?;
    tracing::info!("Shutdown complete");
    Ok(())
}
