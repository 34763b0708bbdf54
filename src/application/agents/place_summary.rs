//! Place summary agent: rewrites messy catalog records into prose.
//!
//! Tour catalog data arrives inconsistent and fragmentary; the summary
//! agent turns it into a few readable, guidebook-style paragraphs suitable
//! for the embedding pipeline. Runs in the background with no conversation
//! attached: its lifecycle ends in the single `PlaceSummary` event or a
//! surfaced error.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::dispatch::Agent;
use crate::config::GenerationConfig;
use crate::domain::context::{ContextComposer, ContextPayload, PlaceQueryContext, PromptRole};
use crate::domain::foundation::Timestamp;
use crate::domain::generation::{
    AgentRequest, AgentType, CancelSignal, GenerationError, GenerationEvent,
    PlaceSummaryGenerated, PlaceSummaryRequested,
};
use crate::ports::{
    AIProvider, CompletionRequest, EventRouter, Message, PromptTemplateStore, RequestMetadata,
};

use super::{attach_entries, load_active_template, new_trace_id, publish_or_log};

/// Handles [`AgentType::PlaceSummary`] requests with a single blocking
/// completion.
pub struct PlaceSummaryAgent {
    provider: Arc<dyn AIProvider>,
    templates: Arc<dyn PromptTemplateStore>,
    composer: Arc<ContextComposer>,
    events: Arc<dyn EventRouter>,
    config: GenerationConfig,
}

impl PlaceSummaryAgent {
    /// Creates a place summary agent over its collaborators.
    pub fn new(
        provider: Arc<dyn AIProvider>,
        templates: Arc<dyn PromptTemplateStore>,
        composer: Arc<ContextComposer>,
        events: Arc<dyn EventRouter>,
        config: GenerationConfig,
    ) -> Self {
        Self {
            provider,
            templates,
            composer,
            events,
            config,
        }
    }

    async fn build_request(
        &self,
        req: &PlaceSummaryRequested,
    ) -> Result<CompletionRequest, GenerationError> {
        let system_template = load_active_template(
            self.templates.as_ref(),
            PromptRole::System,
            AgentType::PlaceSummary,
        )
        .await?;
        let user_template = load_active_template(
            self.templates.as_ref(),
            PromptRole::User,
            AgentType::PlaceSummary,
        )
        .await?;

        let payloads = [ContextPayload::PlaceQuery(PlaceQueryContext {
            name: req.name.clone(),
            address: req.address.clone(),
            description: req.description.clone(),
            operating_hours: req.operating_hours.clone(),
            holiday_info: req.holiday_info.clone(),
            themes: req.themes.clone(),
        })];
        let entries = self.composer.compose(&payloads).await?;

        let metadata = RequestMetadata::background(AgentType::PlaceSummary, new_trace_id());
        let mut request = CompletionRequest::new(metadata)
            .with_system_prompt(system_template.body)
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens);

        attach_entries(&mut request, entries);
        request.messages.push(Message::user(user_template.body));

        if request.is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }
        Ok(request)
    }
}

#[async_trait]
impl Agent for PlaceSummaryAgent {
    fn name(&self) -> &'static str {
        "place_summary_agent"
    }

    fn supports(&self, agent_type: AgentType) -> bool {
        agent_type == AgentType::PlaceSummary
    }

    async fn execute(
        &self,
        request: AgentRequest,
        mut cancel: CancelSignal,
    ) -> Result<(), GenerationError> {
        let AgentRequest::PlaceSummary(req) = request else {
            return Err(GenerationError::UnsupportedRequest);
        };

        debug!(place_id = %req.place_id, name = %req.name, "summarizing place");
        let completion = self.build_request(&req).await?;

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(GenerationError::Cancelled),
            result = self.provider.complete(completion) => {
                result.map_err(|e| GenerationError::Provider(e.to_string()))?
            }
        };

        publish_or_log(
            self.events.as_ref(),
            GenerationEvent::PlaceSummary(PlaceSummaryGenerated {
                place_id: req.place_id,
                name: req.name.clone(),
                summary: response.content,
                occurred_at: Timestamp::now(),
            }),
        )
        .await;

        info!(place_id = %req.place_id, "place summary generated");
        Ok(())
    }
}
