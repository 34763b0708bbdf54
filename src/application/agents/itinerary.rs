//! Itinerary agent: streaming day-by-day plan generation.

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::application::dispatch::Agent;
use crate::config::GenerationConfig;
use crate::domain::context::{
    ContextComposer, ContextPayload, ItineraryCommandContext, ItineraryQueryContext,
    OutputFormatContext, PromptRole, SessionContext,
};
use crate::domain::foundation::Timestamp;
use crate::domain::generation::{
    AgentRequest, AgentType, CancelSignal, DailyPlanGenerated, GenerationError, GenerationEvent,
    ItineraryRequested,
};
use crate::domain::itinerary::DailyPlanDraft;
use crate::domain::streaming::{DecodeEvent, StreamDecoder};
use crate::ports::{
    AIProvider, CompletionRequest, EventRouter, Message, PromptTemplateStore, RequestMetadata,
};

use super::{
    attach_entries, load_active_template, new_trace_id, publish_cancelled, publish_completed,
    publish_failed, publish_or_log,
};

/// Handles [`AgentType::Itinerary`] requests.
///
/// Issues one streaming completion and decodes it incrementally: each
/// NDJSON line becomes a `DailyPlan` event as soon as it arrives, so
/// clients render day 1 while day 3 is still being generated. Ends in
/// exactly one terminal event.
pub struct ItineraryAgent {
    provider: Arc<dyn AIProvider>,
    templates: Arc<dyn PromptTemplateStore>,
    composer: Arc<ContextComposer>,
    events: Arc<dyn EventRouter>,
    config: GenerationConfig,
}

impl ItineraryAgent {
    /// Creates an itinerary agent over its collaborators.
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
        req: &ItineraryRequested,
    ) -> Result<CompletionRequest, GenerationError> {
        let system_template = load_active_template(
            self.templates.as_ref(),
            PromptRole::System,
            AgentType::Itinerary,
        )
        .await?;
        let user_template = load_active_template(
            self.templates.as_ref(),
            PromptRole::User,
            AgentType::Itinerary,
        )
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
            ContextPayload::ItineraryCommand(ItineraryCommandContext {
                region: req.region.clone(),
                start_date: req.start_date,
                duration_days: req.duration_days,
                themes: req.themes.clone(),
                party_size: req.party_size,
                transport: req.transport,
            }),
            // The NDJSON contract is not optional: streaming decode depends
            // on it being part of every prompt.
            ContextPayload::OutputFormat(OutputFormatContext::daily_plan()),
        ];
        let entries = self.composer.compose(&payloads).await?;

        let metadata = RequestMetadata::for_conversation(
            AgentType::Itinerary,
            req.conversation_id,
            new_trace_id(),
        );
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

    async fn publish_units(
        &self,
        req: &ItineraryRequested,
        events: Vec<DecodeEvent<DailyPlanDraft>>,
        published: &mut u64,
    ) {
        for event in events {
            match event {
                DecodeEvent::Unit(unit) => {
                    debug!(
                        conversation_id = %req.conversation_id,
                        sequence = unit.sequence,
                        day = unit.record.day_number,
                        "daily plan decoded"
                    );
                    *published += 1;
                    publish_or_log(
                        self.events.as_ref(),
                        GenerationEvent::DailyPlan(DailyPlanGenerated {
                            conversation_id: req.conversation_id,
                            trip_id: req.trip_id,
                            sequence: unit.sequence,
                            day_number: unit.record.day_number,
                            plan: unit.record,
                            occurred_at: Timestamp::now(),
                        }),
                    )
                    .await;
                }
                DecodeEvent::Malformed(bad) => {
                    // Already logged by the decoder; generation continues.
                    warn!(
                        conversation_id = %req.conversation_id,
                        reason = %bad.reason,
                        "malformed itinerary line skipped"
                    );
                }
                DecodeEvent::Finished(stats) => {
                    info!(
                        conversation_id = %req.conversation_id,
                        units = stats.units,
                        malformed = stats.malformed,
                        "itinerary stream finished"
                    );
                }
            }
        }
    }

    async fn run(
        &self,
        req: &ItineraryRequested,
        cancel: &mut CancelSignal,
    ) -> Result<(), GenerationError> {
        let request = self.build_request(req).await?;

        info!(
            conversation_id = %req.conversation_id,
            trip_id = %req.trip_id,
            region = %req.region,
            days = req.duration_days,
            "starting itinerary generation"
        );

        let mut stream = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(GenerationError::Cancelled),
            result = self.provider.stream_complete(request) => {
                result.map_err(|e| GenerationError::Provider(e.to_string()))?
            }
        };

        let mut decoder =
            StreamDecoder::<DailyPlanDraft>::new(self.config.malformed_line_policy);
        let stall = self.config.stall_timeout();
        let mut published = 0u64;

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(GenerationError::Cancelled),
                next = timeout(stall, stream.next()) => next,
            };

            let chunk = match next {
                Err(_) => {
                    return Err(GenerationError::Stalled {
                        stalled_secs: stall.as_secs(),
                    })
                }
                Ok(None) => break,
                Ok(Some(Err(e))) => return Err(GenerationError::Provider(e.to_string())),
                Ok(Some(Ok(chunk))) => chunk,
            };

            let decoded = decoder.push(&chunk.delta)?;
            self.publish_units(req, decoded, &mut published).await;

            if chunk.is_final() {
                break;
            }
        }

        let remaining = decoder.finish()?;
        self.publish_units(req, remaining, &mut published).await;

        info!(
            conversation_id = %req.conversation_id,
            daily_plans = published,
            "itinerary generation complete"
        );
        Ok(())
    }
}

#[async_trait]
impl Agent for ItineraryAgent {
    fn name(&self) -> &'static str {
        "itinerary_agent"
    }

    fn supports(&self, agent_type: AgentType) -> bool {
        agent_type == AgentType::Itinerary
    }

    async fn execute(
        &self,
        request: AgentRequest,
        mut cancel: CancelSignal,
    ) -> Result<(), GenerationError> {
        let AgentRequest::Itinerary(req) = request else {
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
