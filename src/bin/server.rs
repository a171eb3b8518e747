//! Epicast HTTP Server Binary
//!
//! This is the main entry point for the epicast REST API server. It loads the
//! model artifact set, initializes the repository, sets up the HTTP router,
//! and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! MODEL_DIR=./models cargo run --bin epicast-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `MODEL_DIR`: Directory holding scaler.json, forest.json, lstm.json
//!   (default: models)
//! - `FEED_URL`: Upstream CSV feed override
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use epicast::db;
use epicast::forecast::ForecastModels;
use epicast::http::{create_router, AppState};

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

    info!("Starting epicast HTTP server");

    // Load the pre-trained artifact set. Failure here is fatal: there is no
    // degraded mode that serves predictions without all three artifacts.
    let model_dir = env::var("MODEL_DIR").unwrap_or_else(|_| "models".to_string());
    let models = ForecastModels::load(&model_dir)
        .map_err(|e| anyhow::anyhow!("failed to load model artifacts from {model_dir}: {e}"))?;
    info!("Model artifacts loaded from {}", model_dir);

    // Initialize global repository once and reuse it across the app
    db::init_repository()?;
    let repository = Arc::clone(db::get_repository()?);
    info!("Repository initialized successfully");

    // Create application state
    let mut state = AppState::new(repository, Arc::new(models));
    if let Ok(feed_url) = env::var("FEED_URL") {
        state = state.with_feed_url(feed_url);
    }

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
