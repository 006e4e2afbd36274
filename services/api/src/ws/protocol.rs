//! Defines the WebSocket message protocol between the browser client and the
//! API server.

use serde::{Deserialize, Serialize};
use vetvoice_core::message::ChatMessage;

/// Messages sent from the client (browser) to the server.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Begins a new conversation.
    Start,
    /// A user turn, typed or transcribed client-side.
    UserMessage { text: String },
    /// Toggles output mute. Never affects the connection status.
    ToggleMute,
    /// The client started playing the assistant's synthesized speech.
    PlaybackStarted,
    /// The client finished playing the assistant's synthesized speech.
    PlaybackFinished,
    /// Ends the conversation.
    End,
}

/// Messages sent from the server to the client (browser).
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The session handshake completed; the conversation is live.
    Connected { generation: u64 },
    /// A message was appended to the session history.
    Message { message: ChatMessage },
    /// Voice capture is armed; the assistant is listening.
    Listening,
    /// The assistant's reply carries audio and playback should begin.
    SpeakingStarted,
    /// Mute state changed; the client should apply the given volume.
    MuteChanged { muted: bool, volume: f32 },
    /// The session ended.
    Disconnected,
    /// Reports an error to the client.
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_tags() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"start"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Start));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"user_message","text":"hi"}"#).unwrap();
        match msg {
            ClientMessage::UserMessage { text } => assert_eq!(text, "hi"),
            _ => panic!("expected user_message"),
        }

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"toggle_mute"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::ToggleMute));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"playback_started"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::PlaybackStarted));

        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"bogus"}"#).is_err());
    }

    #[test]
    fn test_server_message_wire_format() {
        let json = serde_json::to_string(&ServerMessage::Connected { generation: 3 }).unwrap();
        assert!(json.contains(r#""type":"connected""#));
        assert!(json.contains(r#""generation":3"#));

        let json = serde_json::to_string(&ServerMessage::Message {
            message: ChatMessage::assistant("hello", None),
        })
        .unwrap();
        assert!(json.contains(r#""type":"message""#));
        assert!(json.contains(r#""sender":"assistant""#));

        let json = serde_json::to_string(&ServerMessage::MuteChanged {
            muted: true,
            volume: 0.0,
        })
        .unwrap();
        assert!(json.contains(r#""type":"mute_changed""#));
    }
}
