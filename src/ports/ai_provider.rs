//! AI Provider Port - Interface for LLM provider integrations.
//!
//! Abstracts all interactions with model providers so agents can issue
//! completions without coupling to a specific vendor API.
//!
//! # Design
//!
//! - Supports both blocking and streaming completions
//! - Provider-agnostic message format
//! - Error types for the common failure modes, with a retryability
//!   classification the adapters use for their backoff loops

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::domain::foundation::ConversationId;
use crate::domain::generation::AgentType;

/// Port for model provider interactions.
///
/// Implementations connect to external model services and translate
/// between the provider-specific API and these types.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generates a single completion (non-streaming).
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Generates a streaming completion.
    ///
    /// Chunks arrive as the provider emits them; the final chunk carries a
    /// finish reason and, when available, token usage.
    async fn stream_complete(
        &self,
        request: CompletionRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamChunk, AIError>> + Send>>, AIError>;

    /// Rough token count for text, for budget checks before a call.
    fn estimate_tokens(&self, text: &str) -> u32;

    /// Provider name, model, and capabilities.
    fn provider_info(&self) -> ProviderInfo;
}

/// Request for a model completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Ordered messages: context fragments, history, current user turn.
    pub messages: Vec<Message>,
    /// Fixed instruction header, kept out of the message list.
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Response randomness (0.0 = deterministic).
    pub temperature: Option<f32>,
    /// Request metadata for tracing.
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    /// Creates an empty request with the given metadata.
    pub fn new(metadata: RequestMetadata) -> Self {
        Self {
            messages: Vec::new(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
            metadata,
        }
    }

    /// Appends a message.
    pub fn with_message(mut self, role: MessageRole, content: impl Into<String>) -> Self {
        self.messages.push(Message::new(role, content));
        self
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Sets the generation budget.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// True when there is nothing to send: no system prompt and no
    /// non-blank message.
    pub fn is_empty(&self) -> bool {
        self.system_prompt
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .is_empty()
            && self
                .messages
                .iter()
                .all(|m| m.content.trim().is_empty())
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Metadata attached to every model call for tracing.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// Agent issuing the call.
    pub agent: AgentType,
    /// Conversation the call belongs to, when conversation-scoped.
    pub conversation_id: Option<ConversationId>,
    /// Distributed tracing identifier.
    pub trace_id: String,
}

impl RequestMetadata {
    /// Creates metadata for a conversation-scoped call.
    pub fn for_conversation(
        agent: AgentType,
        conversation_id: ConversationId,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            agent,
            conversation_id: Some(conversation_id),
            trace_id: trace_id.into(),
        }
    }

    /// Creates metadata for a background call with no conversation.
    pub fn background(agent: AgentType, trace_id: impl Into<String>) -> Self {
        Self {
            agent,
            conversation_id: None,
            trace_id: trace_id.into(),
        }
    }
}

/// Response from a blocking completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated content.
    pub content: String,
    /// Token usage, when the provider reports it.
    pub usage: TokenUsage,
    /// Model that generated the response.
    pub model: String,
    /// Why the model stopped.
    pub finish_reason: FinishReason,
}

/// Token counts reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Creates usage from prompt and completion counts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop.
    Stop,
    /// Hit the max_tokens limit.
    Length,
    /// Content was filtered for safety.
    ContentFilter,
    /// An error occurred.
    Error,
}

/// One streamed piece of a completion.
#[derive(Debug, Clone)]
pub struct StreamChunk {
    /// New content in this chunk.
    pub delta: String,
    /// Present on the final chunk.
    pub finish_reason: Option<FinishReason>,
    /// Usage, when the provider reports it on the final chunk.
    pub usage: Option<TokenUsage>,
}

impl StreamChunk {
    /// Creates a content chunk.
    pub fn content(delta: impl Into<String>) -> Self {
        Self {
            delta: delta.into(),
            finish_reason: None,
            usage: None,
        }
    }

    /// Creates the final chunk.
    pub fn final_chunk(finish_reason: FinishReason, usage: Option<TokenUsage>) -> Self {
        Self {
            delta: String::new(),
            finish_reason: Some(finish_reason),
            usage,
        }
    }

    /// True if this is the final chunk.
    pub fn is_final(&self) -> bool {
        self.finish_reason.is_some()
    }
}

/// Provider information and capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "openai").
    pub name: String,
    /// Model identifier.
    pub model: String,
    /// Maximum context window in tokens.
    pub max_context_tokens: u32,
    /// Whether streaming is supported.
    pub supports_streaming: bool,
}

impl ProviderInfo {
    /// Creates provider info; streaming defaults to supported.
    pub fn new(name: impl Into<String>, model: impl Into<String>, max_context_tokens: u32) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            max_context_tokens,
            supports_streaming: true,
        }
    }

    /// Sets streaming support.
    pub fn with_streaming(mut self, supports: bool) -> Self {
        self.supports_streaming = supports;
        self
    }
}

/// Model provider errors.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Prompt plus history exceeds the model's context window.
    #[error("context too long: {tokens} tokens exceeds {max} limit")]
    ContextTooLong { tokens: u32, max: u32 },

    /// Content was filtered for safety.
    #[error("content filtered: {reason}")]
    ContentFiltered { reason: String },

    /// Provider is down or returning server errors.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the provider's response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl AIError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates a context too long error.
    pub fn context_too_long(tokens: u32, max: u32) -> Self {
        Self::ContextTooLong { tokens, max }
    }

    /// Creates a content filtered error.
    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// True for transient errors worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_metadata() -> RequestMetadata {
        RequestMetadata::for_conversation(AgentType::Chat, ConversationId::new(), "trace-1")
    }

    #[test]
    fn builder_assembles_request() {
        let request = CompletionRequest::new(test_metadata())
            .with_system_prompt("Be a travel assistant")
            .with_message(MessageRole::User, "Plan my trip")
            .with_max_tokens(2000)
            .with_temperature(0.7);

        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.system_prompt.as_deref(), Some("Be a travel assistant"));
        assert_eq!(request.max_tokens, Some(2000));
        assert!(!request.is_empty());
    }

    #[test]
    fn empty_detection_ignores_whitespace() {
        let empty = CompletionRequest::new(test_metadata())
            .with_system_prompt("   ")
            .with_message(MessageRole::User, "\n\t");
        assert!(empty.is_empty());

        let nonempty = CompletionRequest::new(test_metadata()).with_message(MessageRole::User, "hi");
        assert!(!nonempty.is_empty());
    }

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(Message::system("s").role, MessageRole::System);
        assert_eq!(Message::user("u").role, MessageRole::User);
        assert_eq!(Message::assistant("a").role, MessageRole::Assistant);
    }

    #[test]
    fn token_usage_totals() {
        let usage = TokenUsage::new(100, 50);
        assert_eq!(usage.total_tokens, 150);
    }

    #[test]
    fn stream_chunk_finality() {
        assert!(!StreamChunk::content("x").is_final());
        assert!(StreamChunk::final_chunk(FinishReason::Stop, None).is_final());
    }

    #[test]
    fn retryable_classification() {
        assert!(AIError::rate_limited(30).is_retryable());
        assert!(AIError::unavailable("503").is_retryable());
        assert!(AIError::network("reset").is_retryable());
        assert!(AIError::Timeout { timeout_secs: 30 }.is_retryable());

        assert!(!AIError::AuthenticationFailed.is_retryable());
        assert!(!AIError::context_too_long(200_000, 128_000).is_retryable());
        assert!(!AIError::parse("bad json").is_retryable());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MessageRole::Assistant).unwrap(),
            "\"assistant\""
        );
    }
}
