//! Configuration error types.

use thiserror::Error;

/// Failure to load or deserialize configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration load error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Semantic validation failure after loading.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("required configuration value missing: {0}")]
    MissingRequired(&'static str),

    #[error("configuration value '{field}' out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: String,
    },
}
