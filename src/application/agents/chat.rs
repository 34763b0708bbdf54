//! Chat agent: conversational replies over the trip context.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::dispatch::Agent;
use crate::config::GenerationConfig;
use crate::domain::context::{
    ContextComposer, ContextPayload, ItineraryQueryContext, PromptRole, SessionContext,
};
use crate::domain::foundation::Timestamp;
use crate::domain::generation::{
    AgentRequest, AgentType, CancelSignal, ChatMessageGenerated, ChatRequested, GenerationError,
    GenerationEvent,
};
use crate::ports::{
    AIProvider, CompletionRequest, ConversationMemory, ConversationTurn, EventRouter, Message,
    MessageRole, PromptTemplateStore, RequestMetadata,
};

use super::{
    attach_entries, load_active_template, new_trace_id, publish_cancelled, publish_completed,
    publish_failed, publish_or_log,
};

/// Handles [`AgentType::Chat`] requests with a single blocking completion.
///
/// Emits exactly one `ChatMessage` event carrying the full reply, then a
/// terminal event; both the user turn and the reply are recorded in
/// conversation memory.
pub struct ChatAgent {
    provider: Arc<dyn AIProvider>,
    templates: Arc<dyn PromptTemplateStore>,
    memory: Arc<dyn ConversationMemory>,
    composer: Arc<ContextComposer>,
    events: Arc<dyn EventRouter>,
    config: GenerationConfig,
}

impl ChatAgent {
    /// Creates a chat agent over its collaborators.
    pub fn new(
        provider: Arc<dyn AIProvider>,
        templates: Arc<dyn PromptTemplateStore>,
        memory: Arc<dyn ConversationMemory>,
        composer: Arc<ContextComposer>,
        events: Arc<dyn EventRouter>,
        config: GenerationConfig,
    ) -> Self {
        Self {
            provider,
            templates,
            memory,
            composer,
            events,
            config,
        }
    }

    async fn build_request(&self, req: &ChatRequested) -> Result<CompletionRequest, GenerationError> {
        if req.message.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        let system_template =
            load_active_template(self.templates.as_ref(), PromptRole::System, AgentType::Chat)
                .await?;

        let payloads = [
            ContextPayload::Session(SessionContext {
                conversation_id: req.conversation_id,
                trip_id: req.trip_id,
                user_id: req.user_id.clone(),
            }),
            ContextPayload::ItineraryQuery(ItineraryQueryContext {
                trip_id: req.trip_id,
                user_id: req.user_id.clone(),
            }),
        ];
        let entries = self.composer.compose(&payloads).await?;

        let history = self
            .memory
            .load_recent_turns(req.conversation_id, self.config.history_turns)
            .await
            .map_err(|e| GenerationError::Memory(e.to_string()))?;

        let metadata = RequestMetadata::for_conversation(
            AgentType::Chat,
            req.conversation_id,
            new_trace_id(),
        );
        let mut request = CompletionRequest::new(metadata)
            .with_system_prompt(system_template.body)
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens);

        attach_entries(&mut request, entries);
        for turn in history {
            request.messages.push(Message::new(turn.role, turn.content));
        }
        request.messages.push(Message::user(&req.message));

        if request.is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }
        Ok(request)
    }

    async fn run(&self, req: &ChatRequested, cancel: &mut CancelSignal) -> Result<(), GenerationError> {
        let request = self.build_request(req).await?;

        self.memory
            .append_turn(
                req.conversation_id,
                ConversationTurn::new(MessageRole::User, &req.message),
            )
            .await
            .map_err(|e| GenerationError::Memory(e.to_string()))?;

        debug!(conversation_id = %req.conversation_id, "issuing chat completion");

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(GenerationError::Cancelled),
            result = self.provider.complete(request) => {
                result.map_err(|e| GenerationError::Provider(e.to_string()))?
            }
        };

        self.memory
            .append_turn(
                req.conversation_id,
                ConversationTurn::new(MessageRole::Assistant, &response.content),
            )
            .await
            .map_err(|e| GenerationError::Memory(e.to_string()))?;

        publish_or_log(
            self.events.as_ref(),
            GenerationEvent::ChatMessage(ChatMessageGenerated {
                conversation_id: req.conversation_id,
                trip_id: req.trip_id,
                user_id: req.user_id.clone(),
                text: response.content,
                occurred_at: Timestamp::now(),
            }),
        )
        .await;

        info!(
            conversation_id = %req.conversation_id,
            tokens = response.usage.total_tokens,
            "chat reply generated"
        );
        Ok(())
    }
}

#[async_trait]
impl Agent for ChatAgent {
    fn name(&self) -> &'static str {
        "chat_agent"
    }

    fn supports(&self, agent_type: AgentType) -> bool {
        agent_type == AgentType::Chat
    }

    async fn execute(
        &self,
        request: AgentRequest,
        mut cancel: CancelSignal,
    ) -> Result<(), GenerationError> {
        let AgentRequest::Chat(req) = request else {
            return Err(GenerationError::UnsupportedRequest);
        };

        match self.run(&req, &mut cancel).await {
            Ok(()) => {
                publish_completed(self.events.as_ref(), req.conversation_id).await;
                Ok(())
            }
            Err(err) if err.is_cancellation() => {
                publish_cancelled(self.events.as_ref(), req.conversation_id).await;
                Err(err)
            }
            Err(err) => {
                publish_failed(self.events.as_ref(), req.conversation_id, &err).await;
                Err(err)
            }
        }
    }
}
