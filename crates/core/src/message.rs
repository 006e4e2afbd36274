use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single entry in a session's conversation history.
///
/// Messages are immutable once appended and are ordered by insertion. They
/// live only as long as the owning session; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    /// Inline `data:` URL for synthesized speech. Present exactly when
    /// synthesis succeeded for this turn; text-only turns carry `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

impl ChatMessage {
    /// Creates a message authored by the user. User turns never carry audio.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            audio_url: None,
        }
    }

    /// Creates an assistant message, optionally carrying synthesized speech.
    pub fn assistant(text: impl Into<String>, audio_url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender: Sender::Assistant,
            timestamp: Utc::now(),
            audio_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_display() {
        assert_eq!(format!("{}", Sender::User), "user");
        assert_eq!(format!("{}", Sender::Assistant), "assistant");
    }

    #[test]
    fn test_sender_serialization() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Sender::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_user_message_has_no_audio() {
        let msg = ChatMessage::user("Is my cat overweight?");
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.text, "Is my cat overweight?");
        assert!(msg.audio_url.is_none());
    }

    #[test]
    fn test_assistant_message_wire_format() {
        let msg = ChatMessage::assistant("Hello", Some("data:audio/mpeg;base64,AAAA".into()));
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"audioUrl\""));
        assert!(json.contains("\"assistant\""));

        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, msg.id);
        assert_eq!(back.audio_url, msg.audio_url);
    }

    #[test]
    fn test_text_only_message_omits_audio_field() {
        let msg = ChatMessage::assistant("Hello", None);
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("audioUrl"));
    }

    #[test]
    fn test_cloned_message_compares_equal() {
        let msg = ChatMessage::assistant("hello", Some("data:audio/mpeg;base64,AA==".into()));
        assert_eq!(msg.clone(), msg);
        assert_ne!(msg, ChatMessage::assistant("hello", None));
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = ChatMessage::user("a");
        let b = ChatMessage::user("a");
        assert_ne!(a.id, b.id);
    }
}
