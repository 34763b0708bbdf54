//! Agent implementations.
//!
//! All agents assemble their prompt the same way: the active SYSTEM
//! template is the fixed instruction header, composed context entries
//! follow, then any conversation memory, then the current user turn.

mod chat;
mod itinerary;
mod place_summary;

pub use chat::ChatAgent;
pub use itinerary::ItineraryAgent;
pub use place_summary::PlaceSummaryAgent;

use tracing::error;
use uuid::Uuid;

use crate::domain::context::{MetadataEntry, PromptRole};
use crate::domain::foundation::{ConversationId, Timestamp};
use crate::domain::generation::{
    AgentType, GenerationCancelled, GenerationCompleted, GenerationError, GenerationEvent,
    GenerationFailed,
};
use crate::ports::{
    CompletionRequest, EventRouter, Message, PromptTemplate, PromptTemplateStore,
};

/// Fetches the single active template, mapping absence to a configuration
/// error.
pub(crate) async fn load_active_template(
    templates: &dyn PromptTemplateStore,
    role: PromptRole,
    agent: AgentType,
) -> Result<PromptTemplate, GenerationError> {
    templates
        .find_active(role, agent)
        .await
        .map_err(|e| GenerationError::TemplateUnavailable(e.to_string()))
}

/// Appends composed context entries onto the request, before the active
/// human turn: SYSTEM entries become system-role messages, USER entries
/// user-role messages, in composition order.
pub(crate) fn attach_entries(request: &mut CompletionRequest, entries: Vec<MetadataEntry>) {
    for entry in entries {
        let message = match entry.role {
            PromptRole::System => Message::system(entry.content),
            PromptRole::User => Message::user(entry.content),
        };
        request.messages.push(message);
    }
}

/// Fresh trace id for a model call.
pub(crate) fn new_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Publishes an event, logging instead of failing when delivery breaks:
/// terminal notifications must not mask the original outcome.
pub(crate) async fn publish_or_log(events: &dyn EventRouter, event: GenerationEvent) {
    let event_type = event.event_type();
    if let Err(err) = events.publish(event).await {
        error!(%event_type, error = %err, "failed to deliver generation event");
    }
}

/// Publishes the `Completed` terminal for a conversation.
pub(crate) async fn publish_completed(events: &dyn EventRouter, conversation_id: ConversationId) {
    publish_or_log(
        events,
        GenerationEvent::Completed(GenerationCompleted {
            conversation_id,
            occurred_at: Timestamp::now(),
        }),
    )
    .await;
}

/// Publishes the `Failed` terminal for a conversation.
pub(crate) async fn publish_failed(
    events: &dyn EventRouter,
    conversation_id: ConversationId,
    reason: &GenerationError,
) {
    publish_or_log(
        events,
        GenerationEvent::Failed(GenerationFailed {
            conversation_id,
            reason: reason.to_string(),
            occurred_at: Timestamp::now(),
        }),
    )
    .await;
}

/// Publishes the `Cancelled` terminal for a conversation.
pub(crate) async fn publish_cancelled(events: &dyn EventRouter, conversation_id: ConversationId) {
    publish_or_log(
        events,
        GenerationEvent::Cancelled(GenerationCancelled {
            conversation_id,
            occurred_at: Timestamp::now(),
        }),
    )
    .await;
}
