//! Context provider contract.

use async_trait::async_trait;
use thiserror::Error;

use super::{ContextPayload, MetadataEntry, PayloadKind};

/// Failure while producing context entries.
///
/// "Nothing to contribute" is not an error - providers return an empty
/// sequence for that. Errors here mean a real failure in a downstream
/// lookup, and they fail the whole generation as a dependency error.
#[derive(Debug, Clone, Error)]
pub enum ContextError {
    #[error("context provider '{provider}' lookup failed: {message}")]
    Lookup {
        provider: &'static str,
        message: String,
    },
}

impl ContextError {
    /// Creates a lookup failure for the named provider.
    pub fn lookup(provider: &'static str, message: impl Into<String>) -> Self {
        ContextError::Lookup {
            provider,
            message: message.into(),
        }
    }
}

/// A pluggable unit that turns one payload kind into prompt fragments.
///
/// Implementations bind to exactly one [`PayloadKind`]; the composer only
/// invokes a provider with payloads of that kind. `provide` must not
/// mutate the payload or any shared state; read-only lookups through ports
/// are allowed.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Provider name, for logs and error messages.
    fn name(&self) -> &'static str;

    /// The single payload kind this provider is bound to.
    fn payload_kind(&self) -> PayloadKind;

    /// Injection order: lower values are injected first. Ties across
    /// providers fall back to registration order.
    fn priority(&self) -> i32;

    /// Produces zero or more fragments from the payload.
    async fn provide(&self, payload: &ContextPayload) -> Result<Vec<MetadataEntry>, ContextError>;
}
