//! Generation error taxonomy.

use thiserror::Error;

use crate::domain::context::ContextError;
use crate::domain::streaming::DecodeError;

/// Everything that can end a generation other than success.
///
/// Configuration errors are fatal to the request and never retried.
/// Provider errors may have been retried by the provider adapter before
/// they surface here. Cancellation is an outcome, not a failure.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// Missing or inactive prompt template for the agent.
    #[error("template unavailable: {0}")]
    TemplateUnavailable(String),

    /// Prompt assembly produced nothing to send.
    #[error("refusing to send an empty prompt")]
    EmptyPrompt,

    /// An agent received a request variant it does not handle. The
    /// registry prevents this by construction; surfacing it beats a panic.
    #[error("agent received a request it does not support")]
    UnsupportedRequest,

    /// A context provider's downstream lookup failed.
    #[error("context dependency failed: {0}")]
    ContextDependency(String),

    /// Conversation memory read or write failed.
    #[error("conversation memory failed: {0}")]
    Memory(String),

    /// Model transport failed (after any adapter-level retries).
    #[error("model call failed: {0}")]
    Provider(String),

    /// No chunk arrived within the stall window.
    #[error("model stream stalled after {stalled_secs}s without a chunk")]
    Stalled { stalled_secs: u64 },

    /// The malformed-line policy aborted the stream.
    #[error("stream decode aborted: {0}")]
    DecodeAborted(String),

    /// The client went away mid-generation.
    #[error("generation cancelled by client")]
    Cancelled,
}

impl GenerationError {
    /// Configuration errors: wrong setup, fail fast, never retry.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GenerationError::TemplateUnavailable(_)
                | GenerationError::EmptyPrompt
                | GenerationError::UnsupportedRequest
        )
    }

    /// Cancellation is user-abandon, distinguished from failure downstream.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, GenerationError::Cancelled)
    }
}

impl From<ContextError> for GenerationError {
    fn from(err: ContextError) -> Self {
        GenerationError::ContextDependency(err.to_string())
    }
}

impl From<DecodeError> for GenerationError {
    fn from(err: DecodeError) -> Self {
        GenerationError::DecodeAborted(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(GenerationError::EmptyPrompt.is_configuration());
        assert!(GenerationError::TemplateUnavailable("x".into()).is_configuration());
        assert!(!GenerationError::Provider("down".into()).is_configuration());

        assert!(GenerationError::Cancelled.is_cancellation());
        assert!(!GenerationError::Stalled { stalled_secs: 30 }.is_cancellation());
    }

    #[test]
    fn context_error_converts_to_dependency() {
        let err: GenerationError = ContextError::lookup("trip_plan_query", "db down").into();
        assert!(matches!(err, GenerationError::ContextDependency(_)));
        assert!(err.to_string().contains("trip_plan_query"));
    }
}
