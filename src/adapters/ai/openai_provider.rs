//! OpenAI-compatible provider - AIProvider over the chat completions API.
//!
//! Works against any endpoint speaking the OpenAI chat completions
//! protocol. Streaming uses Server-Sent Events; `data:` lines are framed
//! through an internal buffer so an SSE event split across network chunks
//! is reassembled before parsing.
//!
//! Transient failures (rate limits, 5xx, network errors, timeouts) are
//! retried with exponential backoff up to the configured attempt count;
//! configuration failures surface immediately.

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ProviderInfo, StreamChunk, TokenUsage,
};

/// Configuration for the OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL of the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl OpenAIConfig {
    /// Creates a configuration with the given API key and defaults.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 3,
        }
    }

    /// Builds provider configuration from the application config.
    pub fn from_app_config(config: &crate::config::AiConfig) -> Result<Self, AIError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(AIError::AuthenticationFailed)?;
        Ok(Self {
            api_key: Secret::new(api_key),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            max_retries: config.max_retries,
        })
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI-compatible API provider.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Creates a provider with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn to_wire_request(&self, request: &CompletionRequest, stream: bool) -> WireRequest {
        let mut messages = Vec::new();

        if let Some(ref prompt) = request.system_prompt {
            messages.push(WireMessage {
                role: "system".to_string(),
                content: prompt.clone(),
            });
        }
        for msg in &request.messages {
            messages.push(WireMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            });
        }

        WireRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: stream.then_some(true),
            stream_options: stream.then_some(StreamOptions {
                include_usage: true,
            }),
        }
    }

    async fn send(&self, request: &CompletionRequest, stream: bool) -> Result<Response, AIError> {
        let wire = self.to_wire_request(request, stream);

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&wire)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("connection failed: {e}"))
                } else {
                    AIError::network(e.to_string())
                }
            })?;

        self.check_status(response).await
    }

    /// Maps HTTP error statuses into the AIError taxonomy.
    async fn check_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 => Err(AIError::AuthenticationFailed),
            429 => Err(AIError::rate_limited(parse_retry_after(&body))),
            400 if body.contains("context_length_exceeded") => {
                Err(AIError::context_too_long(0, 0))
            }
            400 => Err(AIError::InvalidRequest(body)),
            500..=599 => Err(AIError::unavailable(format!("server error {status}: {body}"))),
            _ => Err(AIError::network(format!("unexpected status {status}: {body}"))),
        }
    }

    /// Sends with retries on retryable errors, exponential backoff.
    async fn send_with_retries(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<Response, AIError> {
        let mut attempt = 0;
        loop {
            match self.send(request, stream).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    if !err.is_retryable() || attempt >= self.config.max_retries {
                        return Err(err);
                    }
                    let backoff = Duration::from_secs(1 << attempt);
                    warn!(error = %err, attempt, "retrying model call after backoff");
                    sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self.send_with_retries(&request, false).await?;

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("failed to parse response: {e}")))?;

        let choice = wire
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("no choices in response"))?;

        Ok(CompletionResponse {
            content: choice.message.content,
            usage: wire
                .usage
                .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
                .unwrap_or_default(),
            model: wire.model,
            finish_reason: map_finish_reason(choice.finish_reason.as_deref()),
        })
    }

    async fn stream_complete(
        &self,
        request: CompletionRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamChunk, AIError>> + Send>>, AIError> {
        let response = self.send_with_retries(&request, true).await?;

        // Reassemble SSE lines across network chunk boundaries before
        // parsing; a `data:` event may arrive split.
        let stream = response
            .bytes_stream()
            .map(|result| result.map_err(|e| AIError::network(format!("stream error: {e}"))))
            .scan(String::new(), |buffer, result| {
                let events = match result {
                    Ok(bytes) => {
                        buffer.push_str(&String::from_utf8_lossy(&bytes));
                        let mut events = Vec::new();
                        while let Some(pos) = buffer.find('\n') {
                            let line: String = buffer.drain(..=pos).collect();
                            events.extend(parse_sse_line(line.trim_end()));
                        }
                        events
                    }
                    Err(e) => vec![Err(e)],
                };
                futures::future::ready(Some(events))
            })
            .flat_map(stream::iter);

        Ok(Box::pin(stream))
    }

    fn estimate_tokens(&self, text: &str) -> u32 {
        // ~4 characters per token; good enough for budget checks.
        (text.len() / 4).max(1) as u32
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai", &self.config.model, 128_000)
    }
}

fn map_finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        _ => FinishReason::Stop,
    }
}

/// Parses one SSE line into zero or more stream chunks.
fn parse_sse_line(line: &str) -> Vec<Result<StreamChunk, AIError>> {
    let Some(data) = line.strip_prefix("data: ") else {
        return Vec::new();
    };
    if data == "[DONE]" || data.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<WireStreamChunk>(data) {
        Ok(chunk) => {
            let mut results = Vec::new();
            if let Some(choice) = chunk.choices.first() {
                if let Some(ref content) = choice.delta.content {
                    if !content.is_empty() {
                        results.push(Ok(StreamChunk::content(content)));
                    }
                }
                if let Some(ref reason) = choice.finish_reason {
                    let usage = chunk
                        .usage
                        .as_ref()
                        .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens));
                    results.push(Ok(StreamChunk::final_chunk(
                        map_finish_reason(Some(reason)),
                        usage,
                    )));
                }
            }
            results
        }
        Err(e) => vec![Err(AIError::parse(format!("bad SSE chunk: {e}")))],
    }
}

/// Pulls a retry hint out of a 429 body; defaults to 30 seconds.
fn parse_retry_after(body: &str) -> u32 {
    if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = parsed
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            if let Some(idx) = message.find("try again in ") {
                let rest = &message[idx + 13..];
                let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
                if let Ok(secs) = digits.parse::<u32>() {
                    return secs;
                }
            }
        }
    }
    30
}

// ----- Wire types -----

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream_options: Option<StreamOptions>,
}

#[derive(Debug, Serialize)]
struct StreamOptions {
    include_usage: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    model: String,
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct WireStreamChunk {
    choices: Vec<WireStreamChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireStreamChoice {
    delta: WireDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireDelta {
    content: Option<String>,
}
