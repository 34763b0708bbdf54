//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `WAYFARER`
//! prefix and nested fields use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use wayfarer::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod error;
mod generation;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use generation::GenerationConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Model provider configuration.
    #[serde(default)]
    pub ai: AiConfig,

    /// Generation behavior (timeouts, history window, decode policy).
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads `.env` first when present, then reads `WAYFARER__`-prefixed
    /// variables, e.g. `WAYFARER__AI__API_KEY` or
    /// `WAYFARER__GENERATION__STALL_TIMEOUT_SECS`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("WAYFARER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validates all configuration sections.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.generation.validate()?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ai: AiConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; serialize the tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("WAYFARER__AI__API_KEY");
        env::remove_var("WAYFARER__AI__MODEL");
        env::remove_var("WAYFARER__GENERATION__STALL_TIMEOUT_SECS");
        env::remove_var("WAYFARER__GENERATION__MALFORMED_LINE_POLICY");
    }

    #[test]
    fn loads_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("WAYFARER__AI__API_KEY", "sk-test");
        env::set_var("WAYFARER__AI__MODEL", "gpt-4o");
        env::set_var("WAYFARER__GENERATION__STALL_TIMEOUT_SECS", "45");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("load should succeed");
        assert_eq!(config.ai.model, "gpt-4o");
        assert_eq!(config.generation.stall_timeout_secs, 45);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn defaults_validate_except_missing_key() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }
}
