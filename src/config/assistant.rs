//! Assistant gateway configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::{DEFAULT_ASSISTANT_TIMEOUT, DEFAULT_FALLBACK_MESSAGE};

const MAX_TIMEOUT_MS: u64 = 120_000;

/// Assistant gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// URL of the ask endpoint. Without one the offline gateway is used.
    pub endpoint: Option<String>,

    /// Bearer token for the endpoint
    pub api_key: Option<Secret<String>>,

    /// Bound on each gateway call, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Text shown when the gateway fails
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
}

impl AssistantConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check if a remote endpoint is configured
    pub fn has_endpoint(&self) -> bool {
        self.endpoint.as_ref().is_some_and(|e| !e.trim().is_empty())
    }

    /// Validate assistant configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_ms == 0 || self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ValidationError::InvalidTimeout);
        }

        if self.fallback_message.trim().is_empty() {
            return Err(ValidationError::MissingRequired("ASSISTANT__FALLBACK_MESSAGE"));
        }

        if let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ValidationError::InvalidEndpoint);
            }
        }

        Ok(())
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_ms: default_timeout_ms(),
            fallback_message: default_fallback_message(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_ASSISTANT_TIMEOUT.as_millis() as u64
}

fn default_fallback_message() -> String {
    DEFAULT_FALLBACK_MESSAGE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AssistantConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert_eq!(config.fallback_message, "Connection error.");
        assert!(!config.has_endpoint());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn timeout_bounds() {
        let mut config = AssistantConfig::default();
        config.timeout_ms = 0;
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
        config.timeout_ms = 120_001;
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
        config.timeout_ms = 120_000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_fallback_is_rejected() {
        let config = AssistantConfig {
            fallback_message: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn endpoint_must_be_http() {
        let mut config = AssistantConfig {
            endpoint: Some("ftp://coach".to_string()),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidEndpoint));

        config.endpoint = Some("https://coach.example.com/ask".to_string());
        assert!(config.has_endpoint());
        assert!(config.validate().is_ok());
    }
}
