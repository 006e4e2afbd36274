//! Helpers for inlining synthesized audio as self-contained `data:` URLs.
//!
//! Audio is never written to storage; the vendor's MPEG bytes are
//! base64-encoded directly into the JSON response.

use base64::Engine;

/// Prefix of every inline audio reference this service produces.
pub const AUDIO_DATA_URL_PREFIX: &str = "data:audio/mpeg;base64,";

/// Encodes raw audio bytes as an inline data URL.
pub fn encode_data_url(audio: &[u8]) -> String {
    format!(
        "{AUDIO_DATA_URL_PREFIX}{}",
        base64::engine::general_purpose::STANDARD.encode(audio)
    )
}

/// Decodes an inline data URL back to the original audio bytes.
///
/// Returns `None` for anything that is not a well-formed audio data URL.
pub fn decode_data_url(url: &str) -> Option<Vec<u8>> {
    let encoded = url.strip_prefix(AUDIO_DATA_URL_PREFIX)?;
    base64::engine::general_purpose::STANDARD.decode(encoded).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_reproduces_exact_bytes() {
        let payload: Vec<u8> = (0..=255).collect();
        let url = encode_data_url(&payload);
        assert_eq!(decode_data_url(&url), Some(payload));
    }

    #[test]
    fn test_encoded_url_carries_audio_prefix() {
        let url = encode_data_url(b"fake-mpeg-bytes");
        assert!(url.starts_with(AUDIO_DATA_URL_PREFIX));
    }

    #[test]
    fn test_empty_payload_round_trips() {
        let url = encode_data_url(&[]);
        assert_eq!(url, AUDIO_DATA_URL_PREFIX);
        assert_eq!(decode_data_url(&url), Some(Vec::new()));
    }

    #[test]
    fn test_decode_rejects_foreign_urls() {
        assert_eq!(decode_data_url("https://example.com/audio.mp3"), None);
        assert_eq!(decode_data_url("data:image/png;base64,AAAA"), None);
        assert_eq!(decode_data_url("data:audio/mpeg;base64,not-base64!!!"), None);
    }
}
