//! HTTP client for the third-party conversational-AI and text-to-speech
//! vendor (ElevenLabs).
//!
//! The [`VoiceVendor`] trait is the seam the api crate programs against; the
//! concrete [`ElevenLabsVendor`] makes exactly one outbound request per call,
//! with no retries. A failed synthesis is an ordinary value, not an error, so
//! callers can degrade to a text-only reply.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::{error, warn};

/// Production API base. Overridable through configuration, mainly for tests.
pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io/v1";

/// Voice used when no `ELEVENLABS_VOICE_ID` is configured.
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";

/// Conversational agent used when no `ELEVENLABS_AGENT_ID` is configured.
pub const DEFAULT_AGENT_ID: &str = "agent_01jz667k14eq29kxw3b0mxmjn9";

/// Fixed model identifier for text-to-speech requests.
pub const TTS_MODEL_ID: &str = "eleven_monolingual_v1";

/// Substituted when the agent returns an empty or missing reply field.
pub const EMPTY_REPLY_PLACEHOLDER: &str =
    "I apologize, but I received an empty response.";

/// Outcome of one synthesis attempt.
///
/// Either synthesis fully succeeded and the audio bytes are present, or it
/// did not and only a reason is; a half-populated audio state cannot be
/// expressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Synthesis {
    /// Raw audio bytes (MPEG) returned by the vendor.
    Audio(Vec<u8>),
    /// The vendor refused or failed the request; callers reply text-only.
    Unavailable(String),
}

/// A conversational-AI and speech-synthesis provider.
#[async_trait]
pub trait VoiceVendor: Send + Sync {
    /// Sends one user message to the vendor's conversational agent and
    /// returns the agent's reply text.
    ///
    /// A non-success vendor status or a transport failure is an error: the
    /// chat stage failing fails the whole turn.
    async fn agent_chat(&self, agent_id: &str, message: &str) -> Result<String>;

    /// Converts text to speech with a single request.
    ///
    /// A non-success vendor status yields `Ok(Synthesis::Unavailable)` so the
    /// caller can degrade gracefully; only transport failures are errors.
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Synthesis>;
}

/// Extracts the agent's reply from a chat response body, substituting a
/// fixed placeholder when the field is empty or missing.
pub fn extract_reply(body: &serde_json::Value) -> String {
    match body.get("response").and_then(|v| v.as_str()) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => EMPTY_REPLY_PLACEHOLDER.to_string(),
    }
}

/// `VoiceVendor` implementation backed by the ElevenLabs REST API.
pub struct ElevenLabsVendor {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ElevenLabsVendor {
    /// Creates a vendor client with a bounded per-request timeout.
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build the vendor HTTP client")?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl VoiceVendor for ElevenLabsVendor {
    async fn agent_chat(&self, agent_id: &str, message: &str) -> Result<String> {
        let url = format!("{}/agents/{}/chat", self.base_url, agent_id);
        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .json(&json!({
                "message": message,
                "stream": false,
                "enable_streaming": false,
            }))
            .send()
            .await
            .context("Failed to reach the ElevenLabs agent API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, %body, "ElevenLabs agent API error");
            return Err(anyhow!("Agent API failed: {status}"));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse the agent API response")?;
        Ok(extract_reply(&body))
    }

    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Synthesis> {
        let url = format!("{}/text-to-speech/{}", self.base_url, voice_id);
        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .json(&json!({
                "text": text,
                "model_id": TTS_MODEL_ID,
                "voice_settings": {
                    "stability": 0.5,
                    "similarity_boost": 0.5,
                    "style": 0.0,
                    "use_speaker_boost": true,
                },
            }))
            .send()
            .await
            .context("Failed to reach the ElevenLabs TTS API")?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "ElevenLabs TTS API error");
            return Ok(Synthesis::Unavailable(format!(
                "TTS request failed with status {status}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read the TTS audio body")?;
        Ok(Synthesis::Audio(bytes.to_vec()))
    }
}
