//! Main Entrypoint for the Vetvoice API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Building the vendor client, when a credential is configured.
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use vetvoice_api::{config::Config, router::create_router, state::AppState};
use vetvoice_core::vendor::{ElevenLabsVendor, VoiceVendor};

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Build the Vendor Client ---
    let vendor: Option<Arc<dyn VoiceVendor>> = match &config.elevenlabs_api_key {
        Some(api_key) => {
            let client = ElevenLabsVendor::new(
                api_key.clone(),
                config.elevenlabs_base_url.clone(),
                config.request_timeout,
            )
            .context("Failed to build the ElevenLabs client")?;
            info!("ElevenLabs vendor client configured.");
            Some(Arc::new(client))
        }
        None => {
            warn!(
                "ELEVENLABS_API_KEY is not set. Proxy endpoints will return a configuration \
                 error and chat sessions will use scripted responses only."
            );
            None
        }
    };

    let app_state = Arc::new(AppState {
        vendor,
        config: Arc::new(config.clone()),
    });

    // --- 4. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 5. Start Server ---
    info!(
        bind_address = %config.bind_address,
        voice_id = %config.voice_id,
        agent_id = %config.agent_id,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
