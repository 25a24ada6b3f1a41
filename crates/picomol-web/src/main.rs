//! Picomol Web Server
//!
//! Run with: cargo run -p picomol-web

use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use picomol_common::config::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration; PICOMOL_CONFIG overrides the default path, and a
    // missing file falls back to built-in defaults.
    let config_path =
        std::env::var("PICOMOL_CONFIG").unwrap_or_else(|_| "picomol.yaml".to_string());
    let config = match ServiceConfig::from_yaml(&config_path) {
        Ok(config) => {
            info!("Loaded configuration from {}", config_path);
            config
        }
        Err(e) => {
            info!("No configuration at {} ({}); using defaults", config_path, e);
            ServiceConfig::default()
        }
    };

    info!("Starting Picomol Web Server...");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // Build router
    let state = picomol_web::state::AppState::new(config);
    let app = picomol_web::router::build_router(state);

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
