//! Food Discounts API Service
//!
//! REST API serving the discount catalog and collecting storefront forms.

use anyhow::{Context, Result};
use discounts_api::{config::Config, create_router, AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "discounts_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Food Discounts API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.check_directories();
    info!("Data directory: {}", config.data_dir.display());
    info!("Public directory: {}", config.public_dir.display());

    let state = AppState::from_config(&config);
    let app = create_router(state);

    let listener = TcpListener::bind(&config.api_address())
        .await
        .with_context(|| format!("Failed to bind to {}", config.api_address()))?;

    info!("Food Discounts API listening on {}", config.api_address());
    info!("Health check: http://{}/health", config.api_address());

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
