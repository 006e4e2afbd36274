//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the vendor proxy endpoints, the WebSocket session endpoint, and
//! the OpenAPI documentation.

use crate::{
    handlers,
    models::{ChatRequest, ChatResponse, ErrorResponse, TtsRequest, TtsResponse},
    state::AppState,
    ws::ws_handler,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::elevenlabs_chat, handlers::elevenlabs_tts),
    components(
        schemas(ChatRequest, ChatResponse, TtsRequest, TtsResponse, ErrorResponse)
    ),
    tags(
        (name = "Vetvoice API", description = "Voice consultation proxy for the veterinary nutrition practice")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Group all routes that require AppState into their own router.
    let api_router = Router::new()
        .route("/elevenlabs-chat", post(handlers::elevenlabs_chat))
        .route("/elevenlabs-tts", post(handlers::elevenlabs_tts))
        .route("/ws", get(ws_handler))
        // Apply the state ONLY to this group of routes.
        .with_state(app_state);

    // Create the final router that merges the stateful routes
    // with the stateless routes (like Swagger UI).
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
