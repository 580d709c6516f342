//! Templated channel server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum router ──▶ remap middleware ──▶ channel handler
//!                     (MatchedPath)   (template            (inspect, publish,
//!                                      interceptor)         subscribe)
//!                                         │
//!                                         ▼
//!                                  ┌──────────────┐
//!                                  │   registry   │
//!                                  │ channels +   │
//!                                  │ registrations│
//!                                  └──────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use template_channels::config::{load_config, ServiceConfig};
use template_channels::observability::{logging, metrics};
use template_channels::{build_interceptor, HttpServer};

#[derive(Parser)]
#[command(name = "template-channels")]
#[command(about = "Broadcast channels for templated subscription routes", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init(&config.observability.log_level);
    tracing::info!("template-channels v0.1.0 starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        strategy = ?config.remap.strategy,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let hook = build_interceptor(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(hook)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
