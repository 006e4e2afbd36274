use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;
use vetvoice_core::vendor::{DEFAULT_AGENT_ID, DEFAULT_BASE_URL, DEFAULT_VOICE_ID};

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
///
/// The vendor credential is deliberately optional: without it the proxy
/// endpoints answer with a configuration error and the chat session serves
/// scripted fallback responses only.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub voice_id: String,
    pub agent_id: String,
    pub request_timeout: Duration,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let elevenlabs_api_key = std::env::var("ELEVENLABS_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let elevenlabs_base_url =
            std::env::var("ELEVENLABS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let voice_id =
            std::env::var("ELEVENLABS_VOICE_ID").unwrap_or_else(|_| DEFAULT_VOICE_ID.to_string());

        let agent_id =
            std::env::var("ELEVENLABS_AGENT_ID").unwrap_or_else(|_| DEFAULT_AGENT_ID.to_string());

        let timeout_secs = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Err(_) => 30,
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue("REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            elevenlabs_api_key,
            elevenlabs_base_url,
            voice_id,
            agent_id,
            request_timeout: Duration::from_secs(timeout_secs),
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("BIND_ADDRESS");
            env::remove_var("ELEVENLABS_API_KEY");
            env::remove_var("ELEVENLABS_BASE_URL");
            env::remove_var("ELEVENLABS_VOICE_ID");
            env::remove_var("ELEVENLABS_AGENT_ID");
            env::remove_var("REQUEST_TIMEOUT_SECS");
            env::remove_var("RUST_LOG");
        }
    }

    #[test]
    fn test_config_error_display() {
        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        clear_env_vars();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
        assert_eq!(config.elevenlabs_api_key, None);
        assert_eq!(config.elevenlabs_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.voice_id, DEFAULT_VOICE_ID);
        assert_eq!(config.agent_id, DEFAULT_AGENT_ID);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    #[serial]
    fn test_config_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "127.0.0.1:8080");
            env::set_var("ELEVENLABS_API_KEY", "test-api-key");
            env::set_var("ELEVENLABS_BASE_URL", "http://localhost:9999/v1");
            env::set_var("ELEVENLABS_VOICE_ID", "custom-voice");
            env::set_var("ELEVENLABS_AGENT_ID", "custom-agent");
            env::set_var("REQUEST_TIMEOUT_SECS", "5");
            env::set_var("RUST_LOG", "debug");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.elevenlabs_api_key, Some("test-api-key".to_string()));
        assert_eq!(config.elevenlabs_base_url, "http://localhost:9999/v1");
        assert_eq!(config.voice_id, "custom-voice");
        assert_eq!(config.agent_id, "custom-agent");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    #[serial]
    fn test_config_empty_api_key_is_treated_as_absent() {
        clear_env_vars();
        unsafe {
            env::set_var("ELEVENLABS_API_KEY", "");
        }

        let config = Config::from_env().expect("Config should load successfully");
        assert_eq!(config.elevenlabs_api_key, None);
    }

    #[test]
    #[serial]
    fn test_config_invalid_bind_address() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "not-a-valid-address");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "BIND_ADDRESS"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_timeout() {
        clear_env_vars();
        unsafe {
            env::set_var("REQUEST_TIMEOUT_SECS", "soon");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "REQUEST_TIMEOUT_SECS"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
        }
    }
}
