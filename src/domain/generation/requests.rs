//! Agent identity and the typed inbound requests they handle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ConversationId, PlaceId, TripId, UserId};
use crate::domain::itinerary::TransportMode;

/// Which agent variant handles a request. Closed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    /// Conversational assistant.
    Chat,
    /// Streaming itinerary generator.
    Itinerary,
    /// Place-record summarizer for the content catalog.
    PlaceSummary,
}

impl AgentType {
    /// Every agent type, for registry validation.
    pub const ALL: [AgentType; 3] = [AgentType::Chat, AgentType::Itinerary, AgentType::PlaceSummary];

    /// Stable name used in logs and template administration.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Chat => "chat",
            AgentType::Itinerary => "itinerary",
            AgentType::PlaceSummary => "place_summary",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user message awaiting a conversational reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequested {
    pub conversation_id: ConversationId,
    pub trip_id: TripId,
    pub user_id: UserId,
    pub message: String,
}

/// A request to generate a full itinerary for a trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryRequested {
    pub conversation_id: ConversationId,
    pub trip_id: TripId,
    pub user_id: UserId,
    pub region: String,
    pub start_date: NaiveDate,
    pub duration_days: u32,
    pub themes: Vec<String>,
    pub party_size: u32,
    pub transport: TransportMode,
}

/// A request to rewrite a raw place record into embedding-ready prose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceSummaryRequested {
    pub place_id: PlaceId,
    pub name: String,
    pub address: String,
    pub description: String,
    pub operating_hours: Option<String>,
    pub holiday_info: Option<String>,
    pub themes: Vec<String>,
}

/// A typed request routed through the dispatcher to exactly one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AgentRequest {
    Chat(ChatRequested),
    Itinerary(ItineraryRequested),
    PlaceSummary(PlaceSummaryRequested),
}

impl AgentRequest {
    /// The agent type this request is dispatched to.
    pub fn agent_type(&self) -> AgentType {
        match self {
            AgentRequest::Chat(_) => AgentType::Chat,
            AgentRequest::Itinerary(_) => AgentType::Itinerary,
            AgentRequest::PlaceSummary(_) => AgentType::PlaceSummary,
        }
    }

    /// Conversation this request belongs to, when conversation-scoped.
    pub fn conversation_id(&self) -> Option<ConversationId> {
        match self {
            AgentRequest::Chat(r) => Some(r.conversation_id),
            AgentRequest::Itinerary(r) => Some(r.conversation_id),
            AgentRequest::PlaceSummary(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_type_names_are_stable() {
        assert_eq!(AgentType::Chat.as_str(), "chat");
        assert_eq!(AgentType::Itinerary.to_string(), "itinerary");
        assert_eq!(AgentType::PlaceSummary.as_str(), "place_summary");
    }

    #[test]
    fn request_maps_to_agent_type() {
        let request = AgentRequest::Chat(ChatRequested {
            conversation_id: ConversationId::new(),
            trip_id: TripId::new(),
            user_id: UserId::new("traveler@example.com").unwrap(),
            message: "hello".to_string(),
        });
        assert_eq!(request.agent_type(), AgentType::Chat);
        assert!(request.conversation_id().is_some());
    }

    #[test]
    fn place_summary_request_has_no_conversation() {
        let request = AgentRequest::PlaceSummary(PlaceSummaryRequested {
            place_id: PlaceId::new(7),
            name: "Seongsan Ilchulbong".to_string(),
            address: "Jeju".to_string(),
            description: "tuff cone".to_string(),
            operating_hours: None,
            holiday_info: None,
            themes: vec!["nature".to_string()],
        });
        assert_eq!(request.agent_type(), AgentType::PlaceSummary);
        assert!(request.conversation_id().is_none());
    }
}
