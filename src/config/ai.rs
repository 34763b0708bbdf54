//! Model provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Model provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Provider API key.
    pub api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failures.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl AiConfig {
    /// Request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validates the provider configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("WAYFARER__AI__API_KEY"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::OutOfRange {
                field: "ai.timeout_secs",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AiConfig::default();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.max_retries, 3);
        assert!(!config.has_api_key());
    }

    #[test]
    fn timeout_duration() {
        let config = AiConfig {
            timeout_secs: 60,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn validation_requires_api_key() {
        assert!(AiConfig::default().validate().is_err());

        let config = AiConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let config = AiConfig {
            api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
