//! Conversation-turn orchestration against the voice vendor.
//!
//! One turn is: send the user's message to the vendor's agent, then
//! synthesize the reply. A chat-stage failure fails the whole turn; a
//! synthesis-stage failure only drops the audio, and the caller still gets
//! the reply text.

use crate::audio;
use anyhow::Result;
use tracing::warn;
use vetvoice_core::vendor::{Synthesis, VoiceVendor};

/// Served to the caller when the chat stage of a turn fails outright.
pub const CHAT_FALLBACK_RESPONSE: &str =
    "I apologize, but I'm experiencing technical difficulties with my voice system. Please try \
     again or contact Dr. Okada directly for urgent matters.";

/// The settled result of one successful conversational turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub response: String,
    /// Inline data URL for the spoken reply; `None` when synthesis degraded.
    pub audio_url: Option<String>,
}

/// Runs one full conversational turn.
///
/// Errors only when the chat stage (or the synthesis transport) fails; a
/// vendor-side synthesis failure degrades to a text-only `ChatTurn`.
pub async fn run_chat_turn(
    vendor: &dyn VoiceVendor,
    agent_id: &str,
    message: &str,
    voice_id: &str,
) -> Result<ChatTurn> {
    let response = vendor.agent_chat(agent_id, message).await?;

    let audio_url = match vendor.synthesize(&response, voice_id).await? {
        Synthesis::Audio(bytes) => Some(audio::encode_data_url(&bytes)),
        Synthesis::Unavailable(reason) => {
            warn!(%reason, "synthesis unavailable, replying text-only");
            None
        }
    };

    Ok(ChatTurn {
        response,
        audio_url,
    })
}

/// The settled result of a standalone synthesis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechResult {
    pub success: bool,
    pub audio_url: Option<String>,
    pub error: Option<String>,
}

/// Synthesizes speech for arbitrary text.
///
/// Vendor-side failures are reported in the result, not as errors; only a
/// transport failure propagates.
pub async fn synthesize_speech(
    vendor: &dyn VoiceVendor,
    text: &str,
    voice_id: &str,
) -> Result<SpeechResult> {
    match vendor.synthesize(text, voice_id).await? {
        Synthesis::Audio(bytes) => Ok(SpeechResult {
            success: true,
            audio_url: Some(audio::encode_data_url(&bytes)),
            error: None,
        }),
        Synthesis::Unavailable(reason) => {
            warn!(%reason, "synthesis unavailable");
            Ok(SpeechResult {
                success: false,
                audio_url: None,
                error: Some("TTS conversion failed".to_string()),
            })
        }
    }
}
