//! Generation behavior configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::streaming::MalformedLinePolicy;

use super::error::ValidationError;

/// Tuning for agent generations.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// Response temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// How many prior turns to load into a chat prompt.
    #[serde(default = "default_history_turns")]
    pub history_turns: usize,

    /// A streaming call with no chunk for this long is a stall.
    #[serde(default = "default_stall_timeout")]
    pub stall_timeout_secs: u64,

    /// What to do with a malformed NDJSON line: skip it or abort.
    #[serde(default)]
    pub malformed_line_policy: MalformedLinePolicy,
}

impl GenerationConfig {
    /// Stall window as a Duration.
    pub fn stall_timeout(&self) -> Duration {
        Duration::from_secs(self.stall_timeout_secs)
    }

    /// Validates generation tuning.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::OutOfRange {
                field: "generation.temperature",
                reason: format!("must be within 0.0..=2.0, got {}", self.temperature),
            });
        }
        if self.stall_timeout_secs == 0 {
            return Err(ValidationError::OutOfRange {
                field: "generation.stall_timeout_secs",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            history_turns: default_history_turns(),
            stall_timeout_secs: default_stall_timeout(),
            malformed_line_policy: MalformedLinePolicy::default(),
        }
    }
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_history_turns() -> usize {
    20
}

fn default_stall_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GenerationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.malformed_line_policy, MalformedLinePolicy::Skip);
        assert_eq!(config.stall_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn rejects_zero_stall_timeout() {
        let config = GenerationConfig {
            stall_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let config = GenerationConfig {
            temperature: 3.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn policy_deserializes_from_string() {
        let policy: MalformedLinePolicy = serde_json::from_str("\"abort\"").unwrap();
        assert_eq!(policy, MalformedLinePolicy::Abort);
    }
}
