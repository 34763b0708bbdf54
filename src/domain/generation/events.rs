//! Outbound generation events.
//!
//! These are the contracts the core exposes to persistence and
//! live-delivery collaborators. Events are immutable once created;
//! ownership moves to the event router on publish. Exactly one producer
//! exists per conversation generation; consumers may be many.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, PlaceId, Timestamp, TripId, UserId};
use crate::domain::itinerary::DailyPlanDraft;

/// A complete conversational reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageGenerated {
    pub conversation_id: ConversationId,
    pub trip_id: TripId,
    pub user_id: UserId,
    pub text: String,
    pub occurred_at: Timestamp,
}

/// One decoded day of an itinerary, published as soon as its line arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlanGenerated {
    pub conversation_id: ConversationId,
    pub trip_id: TripId,
    /// Stream position, strictly increasing within the generation.
    pub sequence: u64,
    pub day_number: u32,
    pub plan: DailyPlanDraft,
    pub occurred_at: Timestamp,
}

/// Embedding-ready prose for a catalog place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSummaryGenerated {
    pub place_id: PlaceId,
    pub name: String,
    pub summary: String,
    pub occurred_at: Timestamp,
}

/// Terminal: the generation finished successfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationCompleted {
    pub conversation_id: ConversationId,
    pub occurred_at: Timestamp,
}

/// Terminal: the generation failed; `reason` is safe to show downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationFailed {
    pub conversation_id: ConversationId,
    pub reason: String,
    pub occurred_at: Timestamp,
}

/// Terminal: the client abandoned the generation. Not a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationCancelled {
    pub conversation_id: ConversationId,
    pub occurred_at: Timestamp,
}

/// The closed set of events this core publishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationEvent {
    ChatMessage(ChatMessageGenerated),
    DailyPlan(DailyPlanGenerated),
    PlaceSummary(PlaceSummaryGenerated),
    Completed(GenerationCompleted),
    Failed(GenerationFailed),
    Cancelled(GenerationCancelled),
}

impl GenerationEvent {
    /// Stable type name for routing and logs.
    pub fn event_type(&self) -> &'static str {
        match self {
            GenerationEvent::ChatMessage(_) => "chat.message_generated",
            GenerationEvent::DailyPlan(_) => "itinerary.daily_plan_generated",
            GenerationEvent::PlaceSummary(_) => "place.summary_generated",
            GenerationEvent::Completed(_) => "generation.completed",
            GenerationEvent::Failed(_) => "generation.failed",
            GenerationEvent::Cancelled(_) => "generation.cancelled",
        }
    }

    /// Conversation the event belongs to, when conversation-scoped.
    pub fn conversation_id(&self) -> Option<ConversationId> {
        match self {
            GenerationEvent::ChatMessage(e) => Some(e.conversation_id),
            GenerationEvent::DailyPlan(e) => Some(e.conversation_id),
            GenerationEvent::PlaceSummary(_) => None,
            GenerationEvent::Completed(e) => Some(e.conversation_id),
            GenerationEvent::Failed(e) => Some(e.conversation_id),
            GenerationEvent::Cancelled(e) => Some(e.conversation_id),
        }
    }

    /// True for the events that end a generation's lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GenerationEvent::Completed(_)
                | GenerationEvent::Failed(_)
                | GenerationEvent::Cancelled(_)
        )
    }
}
