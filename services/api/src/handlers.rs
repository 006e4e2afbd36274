//! Axum Handlers for the Vendor Proxy Endpoints
//!
//! This module contains the logic for handling the two HTTP proxy endpoints.
//! It uses `utoipa` doc comments to generate OpenAPI documentation.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::error;

use crate::{
    models::{ChatRequest, ChatResponse, ErrorResponse, TtsRequest, TtsResponse},
    proxy,
    state::AppState,
};

#[derive(Debug)]
pub enum ApiError {
    /// A required request field is missing or blank. Rejected before any
    /// vendor call is made.
    BadRequest(String),
    /// The service is missing the vendor credential; operator intervention
    /// is required.
    Configuration(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(error) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
            }
            ApiError::Configuration(error) => {
                error!("Configuration error: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { error }),
                )
                    .into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let error = "An internal server error occurred.".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { error }),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::InternalServerError(err.into())
    }
}

/// Validates a required request field, treating blank strings as missing.
fn required_field(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::BadRequest(message.to_string())),
    }
}

fn vendor_or_config_error(
    state: &AppState,
) -> Result<&Arc<dyn vetvoice_core::vendor::VoiceVendor>, ApiError> {
    state.vendor.as_ref().ok_or_else(|| {
        ApiError::Configuration("ElevenLabs API key not configured".to_string())
    })
}

/// Proxy one conversational turn to the vendor agent and speak the reply.
#[utoipa::path(
    post,
    path = "/elevenlabs-chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "The agent's reply, with inline audio when synthesis succeeded", body = ChatResponse),
        (status = 400, description = "Missing message or agentId", body = ErrorResponse),
        (status = 500, description = "Vendor credential unconfigured, or the chat stage failed (fixed apology body)", body = ChatResponse)
    )
)]
pub async fn elevenlabs_chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    let message = required_field(payload.message, "Message and agentId are required")?;
    let agent_id = required_field(payload.agent_id, "Message and agentId are required")?;
    let vendor = vendor_or_config_error(&state)?;

    match proxy::run_chat_turn(vendor.as_ref(), &agent_id, &message, &state.config.voice_id).await
    {
        Ok(turn) => Ok((
            StatusCode::OK,
            Json(ChatResponse {
                response: turn.response,
                audio_url: turn.audio_url,
                success: true,
                error: None,
            }),
        )
            .into_response()),
        Err(err) => {
            // The caller always receives a complete, in-character reply,
            // never a raw transport error.
            error!(error = ?err, "chat turn failed, serving the fallback response");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatResponse {
                    response: proxy::CHAT_FALLBACK_RESPONSE.to_string(),
                    audio_url: None,
                    success: false,
                    error: Some(err.to_string()),
                }),
            )
                .into_response())
        }
    }
}

/// Convert arbitrary text to speech through the vendor.
#[utoipa::path(
    post,
    path = "/elevenlabs-tts",
    request_body = TtsRequest,
    responses(
        (status = 200, description = "Synthesis outcome; audio is inlined as a data URL on success", body = TtsResponse),
        (status = 400, description = "Missing text", body = ErrorResponse),
        (status = 500, description = "Vendor credential unconfigured or an unexpected failure", body = TtsResponse)
    )
)]
pub async fn elevenlabs_tts(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TtsRequest>,
) -> Result<Response, ApiError> {
    let text = required_field(payload.text, "Text is required")?;
    let vendor = vendor_or_config_error(&state)?;

    match proxy::synthesize_speech(vendor.as_ref(), &text, &state.config.voice_id).await {
        Ok(result) => Ok((
            StatusCode::OK,
            Json(TtsResponse {
                success: result.success,
                audio_url: result.audio_url,
                error: result.error,
            }),
        )
            .into_response()),
        Err(err) => {
            error!(error = ?err, "TTS request failed unexpectedly");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TtsResponse {
                    success: false,
                    audio_url: None,
                    error: Some(err.to_string()),
                }),
            )
                .into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field_accepts_non_blank_values() {
        assert_eq!(
            required_field(Some("hello".into()), "msg").unwrap(),
            "hello"
        );
    }

    #[test]
    fn test_required_field_rejects_missing_and_blank() {
        for value in [None, Some(String::new()), Some("   ".to_string())] {
            match required_field(value, "Text is required") {
                Err(ApiError::BadRequest(msg)) => assert_eq!(msg, "Text is required"),
                _ => panic!("expected BadRequest"),
            }
        }
    }

    #[test]
    fn test_api_error_status_codes() {
        let response = ApiError::BadRequest("bad".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Configuration("missing key".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response =
            ApiError::InternalServerError(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
