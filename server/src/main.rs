//! Leadrelay Server - Main Entry Point
//!
//! Webhook relay between a VICIdial dialer and a GoHighLevel CRM.

use anyhow::Result;
use tracing::{info, warn};

use leadrelay_server::{api, config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leadrelay_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Leadrelay Server"
    );

    // Missing credentials are reported per request, not fatal
    if !config.vicidial.is_configured() {
        warn!("Vicidial API credentials are missing in environment variables");
    }
    if !config.crm.is_configured() {
        warn!("CRM API key is missing in environment variables");
    }
    if config.call_status_crm_sync && !config.crm.is_configured() {
        warn!("CALL_STATUS_CRM_SYNC is enabled but the CRM is not configured");
    }

    let bind_address = config.bind_address.clone();

    // Build application state and router
    let state = api::AppState::new(config)?;
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install CTRL+C signal handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal, shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
