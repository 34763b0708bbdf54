//! Mock AI Provider for testing.
//!
//! A configurable implementation of the AIProvider port so tests run
//! without real model APIs.
//!
//! # Features
//!
//! - Pre-configured blocking responses
//! - Scripted streams: chunks, delays, and mid-stream errors, so chunk
//!   boundaries and stalls can be exercised deterministically
//! - Error injection
//! - Call capture for verification
//!
//! Clones share state: a clone handed to an agent records calls that the
//! original can assert on.

use async_trait::async_trait;
use futures::stream::{self, Stream};
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    StreamChunk, TokenUsage,
};

/// A configured blocking response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a successful completion.
    Success {
        content: String,
        usage: TokenUsage,
        finish_reason: FinishReason,
    },
    /// Return an error.
    Error(MockError),
}

/// Mock error types for exercising error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    ContextTooLong { tokens: u32, max: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::ContextTooLong { tokens, max } => AIError::context_too_long(tokens, max),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

/// One step of a scripted stream.
#[derive(Debug, Clone)]
enum ScriptEvent {
    Chunk(String),
    Delay(Duration),
    Error(MockError),
}

/// A scripted streaming response, played back event by event.
#[derive(Debug, Clone, Default)]
pub struct StreamScript {
    events: Vec<ScriptEvent>,
}

impl StreamScript {
    /// Script from explicit chunks, emitted as given.
    pub fn from_chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            events: chunks
                .into_iter()
                .map(|c| ScriptEvent::Chunk(c.into()))
                .collect(),
        }
    }

    /// Script that re-chunks `text` into pieces of `chunk_chars` characters,
    /// deliberately splitting records at arbitrary boundaries.
    pub fn from_text_chunked(text: &str, chunk_chars: usize) -> Self {
        assert!(chunk_chars > 0, "chunk size must be positive");
        let chars: Vec<char> = text.chars().collect();
        let events = chars
            .chunks(chunk_chars)
            .map(|piece| ScriptEvent::Chunk(piece.iter().collect()))
            .collect();
        Self { events }
    }

    /// Appends a chunk.
    pub fn then_chunk(mut self, chunk: &str) -> Self {
        self.events.push(ScriptEvent::Chunk(chunk.to_string()));
        self
    }

    /// Appends a pause before the next event.
    pub fn then_delay(mut self, delay: Duration) -> Self {
        self.events.push(ScriptEvent::Delay(delay));
        self
    }

    /// Appends a mid-stream error.
    pub fn then_error(mut self, error: MockError) -> Self {
        self.events.push(ScriptEvent::Error(error));
        self
    }

    fn into_stream(self) -> Pin<Box<dyn Stream<Item = Result<StreamChunk, AIError>> + Send>> {
        let stream = stream::unfold(self.events.into_iter(), |mut events| async move {
            loop {
                match events.next()? {
                    ScriptEvent::Delay(delay) => sleep(delay).await,
                    ScriptEvent::Chunk(chunk) => {
                        return Some((Ok(StreamChunk::content(chunk)), events))
                    }
                    ScriptEvent::Error(error) => return Some((Err(error.into()), events)),
                }
            }
        });
        Box::pin(stream)
    }
}

/// Mock AI provider.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    /// Blocking responses, consumed in order.
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Stream scripts, consumed in order.
    scripts: Arc<Mutex<VecDeque<StreamScript>>>,
    /// Provider info to report.
    info: ProviderInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Captured requests.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    /// Creates a mock provider with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            scripts: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1", 128_000),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful blocking response.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Success {
                content: content.into(),
                usage: TokenUsage::new(10, 20),
                finish_reason: FinishReason::Stop,
            });
        self
    }

    /// Queues an error for the next blocking call.
    pub fn with_error(self, error: MockError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Error(error));
        self
    }

    /// Queues a stream script for the next streaming call.
    pub fn with_stream(self, script: StreamScript) -> Self {
        self.scripts.lock().unwrap().push_back(script);
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of calls (blocking and streaming) made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All captured requests.
    pub fn recorded_calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn next_response(&self) -> MockResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success {
                content: "Mock response".to_string(),
                usage: TokenUsage::new(5, 10),
                finish_reason: FinishReason::Stop,
            })
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Success {
                content,
                usage,
                finish_reason,
            } => Ok(CompletionResponse {
                content,
                usage,
                model: self.info.model.clone(),
                finish_reason,
            }),
            MockResponse::Error(error) => Err(error.into()),
        }
    }

    async fn stream_complete(
        &self,
        request: CompletionRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamChunk, AIError>> + Send>>, AIError> {
        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        if let Some(script) = self.scripts.lock().unwrap().pop_front() {
            return Ok(script.into_stream());
        }

        // No script queued: play the next blocking response as one chunk.
        match self.next_response() {
            MockResponse::Success {
                content,
                usage,
                finish_reason,
            } => {
                let chunks = vec![
                    Ok(StreamChunk::content(content)),
                    Ok(StreamChunk::final_chunk(finish_reason, Some(usage))),
                ];
                Ok(Box::pin(stream::iter(chunks)))
            }
            MockResponse::Error(error) => Err(error.into()),
        }
    }

    fn estimate_tokens(&self, text: &str) -> u32 {
        (text.len() / 4).max(1) as u32
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generation::AgentType;
    use crate::ports::{MessageRole, RequestMetadata};
    use futures::StreamExt;

    fn request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::background(AgentType::Chat, "trace"))
            .with_message(MessageRole::User, "hello")
    }

    #[tokio::test]
    async fn responses_are_consumed_in_order() {
        let provider = MockAIProvider::new()
            .with_response("first")
            .with_response("second");

        assert_eq!(provider.complete(request()).await.unwrap().content, "first");
        assert_eq!(provider.complete(request()).await.unwrap().content, "second");
        // Queue exhausted: default response.
        assert_eq!(
            provider.complete(request()).await.unwrap().content,
            "Mock response"
        );
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn error_injection_surfaces_as_ai_error() {
        let provider = MockAIProvider::new().with_error(MockError::RateLimited {
            retry_after_secs: 7,
        });
        let err = provider.complete(request()).await.unwrap_err();
        assert!(matches!(err, AIError::RateLimited { retry_after_secs: 7 }));
    }

    #[tokio::test]
    async fn scripted_stream_plays_chunks_in_order() {
        let provider = MockAIProvider::new()
            .with_stream(StreamScript::from_chunks(vec!["ab", "cd", "ef"]));

        let mut stream = provider.stream_complete(request()).await.unwrap();
        let mut collected = String::new();
        while let Some(chunk) = stream.next().await {
            collected.push_str(&chunk.unwrap().delta);
        }
        assert_eq!(collected, "abcdef");
    }

    #[tokio::test]
    async fn chunked_script_preserves_text() {
        let text = "한글과 english mixed";
        let script = StreamScript::from_text_chunked(text, 3);
        let provider = MockAIProvider::new().with_stream(script);

        let mut stream = provider.stream_complete(request()).await.unwrap();
        let mut collected = String::new();
        while let Some(chunk) = stream.next().await {
            collected.push_str(&chunk.unwrap().delta);
        }
        assert_eq!(collected, text);
    }

    #[tokio::test]
    async fn mid_stream_error_is_delivered_in_place() {
        let script = StreamScript::from_chunks(vec!["ok"]).then_error(MockError::Network {
            message: "reset".to_string(),
        });
        let provider = MockAIProvider::new().with_stream(script);

        let mut stream = provider.stream_complete(request()).await.unwrap();
        assert!(stream.next().await.unwrap().is_ok());
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn unscripted_stream_falls_back_to_response_queue() {
        let provider = MockAIProvider::new().with_response("full text");
        let mut stream = provider.stream_complete(request()).await.unwrap();

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.delta, "full text");
        let last = stream.next().await.unwrap().unwrap();
        assert!(last.is_final());
    }

    #[tokio::test]
    async fn clones_share_call_history() {
        let provider = MockAIProvider::new().with_response("shared");
        let clone = provider.clone();
        clone.complete(request()).await.unwrap();
        assert_eq!(provider.call_count(), 1);
    }
}
