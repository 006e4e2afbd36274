//! API Models
//!
//! Request and response payloads for the vendor proxy endpoints. Field names
//! follow the original frontend contract (camelCase on the wire), and the
//! structs double as `utoipa` schemas for the OpenAPI document.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /elevenlabs-chat`.
///
/// Both fields are required; they are optional here so that a missing field
/// maps to a descriptive 400 instead of a deserialization error.
#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[schema(example = "My dog was just diagnosed with kidney disease.")]
    pub message: Option<String>,
    #[schema(example = "agent_01jz667k14eq29kxw3b0mxmjn9")]
    pub agent_id: Option<String>,
}

/// Response body for `POST /elevenlabs-chat`.
///
/// `audioUrl` is always present and explicitly `null` for a text-only turn.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    #[schema(example = "data:audio/mpeg;base64,...")]
    pub audio_url: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request body for `POST /elevenlabs-tts`.
#[derive(Deserialize, ToSchema, Debug)]
pub struct TtsRequest {
    #[schema(example = "Renal diets should be low in phosphorus.")]
    pub text: Option<String>,
}

/// Response body for `POST /elevenlabs-tts`.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TtsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of 400/500 rejections raised before a turn is attempted.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
