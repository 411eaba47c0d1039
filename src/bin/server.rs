//! Space Weather HTTP Server Binary
//!
//! Main entry point for the space weather REST API server. It loads the
//! configuration, builds the upstream clients and starts serving.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin swx-server
//!
//! # With a real DONKI key and a config file
//! DONKI_API_KEY=... SWX_CONFIG=swx.toml cargo run --bin swx-server
//! ```
//!
//! # Environment Variables
//!
//! - `SWX_CONFIG`: Path to the TOML config file (default: swx.toml)
//! - `DONKI_API_KEY`: Overrides the configured DONKI API key
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use swx_rust::config::AppConfig;
use swx_rust::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    info!("Starting space weather HTTP server");

    let config = AppConfig::load()?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = AppState::new(config);
    let app = create_router(state);

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
