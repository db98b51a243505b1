//! Payroll ledger API server.
//!
//! # Environment Variables
//!
//! * `PAYROLL_CONFIG_DIR` - Directory holding the jurisdiction YAML files
//!   (default: `./config/illustrative`)
//! * `PAYROLL_BIND_ADDR` - Address to listen on (default: `127.0.0.1:3000`)
//! * `RUST_LOG` - Log filter directives (default: `info`)

use std::env;
use std::net::SocketAddr;

use payroll_ledger::api::{AppState, create_router};
use payroll_ledger::config::ConfigLoader;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_DIR: &str = "./config/illustrative";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_dir = env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let bind_addr = env::var("PAYROLL_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let config = ConfigLoader::load(&config_dir)?.into_config();
    info!(
        config_dir = %config_dir,
        jurisdiction = %config.jurisdiction().code,
        version = %config.jurisdiction().version,
        "Loaded payroll configuration"
    );

    let app = create_router(AppState::new(config));
    let addr: SocketAddr = bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
