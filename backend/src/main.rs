//! Poultry House Records - Backend Server
//!
//! Serves record entry, maintenance and reporting for the flock sheets
//! stored under the configured data directory.

use std::{net::SocketAddr, sync::Arc};

use poultry_backend::{config::Config, create_app, store::CsvSheetStore, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "phr_server=debug,poultry_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Poultry House Records Server");
    tracing::info!("Environment: {}", config.environment);

    tracing::info!("Opening sheets in {}", config.storage.data_dir.display());
    let store = CsvSheetStore::open(&config.storage.data_dir)?;

    // Create application state
    let state = AppState::new(Arc::new(store), config.clone());

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
