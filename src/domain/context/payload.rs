//! The closed set of typed context payloads.
//!
//! Each request builds the payloads it needs; the composer matches them to
//! providers by kind. Payloads are request-scoped values: created per
//! invocation, dropped once the prompt is assembled.

use chrono::NaiveDate;
use serde_json::Value as JsonValue;

use crate::domain::foundation::{ConversationId, TripId, UserId};
use crate::domain::itinerary::{DailyPlanDraft, TransportMode};

/// Discriminant for binding providers to payload types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Session,
    ItineraryCommand,
    ItineraryQuery,
    OutputFormat,
    PlaceQuery,
}

/// Metadata of the conversation session a generation runs in.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub conversation_id: ConversationId,
    pub trip_id: TripId,
    pub user_id: UserId,
}

/// Requirements for a new itinerary: what the user asked for.
#[derive(Debug, Clone)]
pub struct ItineraryCommandContext {
    pub region: String,
    pub start_date: NaiveDate,
    pub duration_days: u32,
    pub themes: Vec<String>,
    pub party_size: u32,
    pub transport: TransportMode,
}

impl ItineraryCommandContext {
    /// Last day of the trip, inclusive.
    pub fn end_date(&self) -> NaiveDate {
        self.start_date + chrono::Duration::days(self.duration_days.saturating_sub(1) as i64)
    }
}

/// Pointer to an existing trip plan whose current state should inform the
/// generation.
#[derive(Debug, Clone)]
pub struct ItineraryQueryContext {
    pub trip_id: TripId,
    pub user_id: UserId,
}

/// Target output shape for a streaming generation.
#[derive(Debug, Clone)]
pub struct OutputFormatContext {
    /// JSON schema each output line must conform to.
    pub schema: JsonValue,
}

impl OutputFormatContext {
    /// Output contract for daily itinerary lines.
    pub fn daily_plan() -> Self {
        Self {
            schema: DailyPlanDraft::json_schema(),
        }
    }
}

/// Raw catalog record of a place to be summarized.
#[derive(Debug, Clone)]
pub struct PlaceQueryContext {
    pub name: String,
    pub address: String,
    pub description: String,
    pub operating_hours: Option<String>,
    pub holiday_info: Option<String>,
    pub themes: Vec<String>,
}

/// A typed context payload; the closed set providers can bind to.
#[derive(Debug, Clone)]
pub enum ContextPayload {
    Session(SessionContext),
    ItineraryCommand(ItineraryCommandContext),
    ItineraryQuery(ItineraryQueryContext),
    OutputFormat(OutputFormatContext),
    PlaceQuery(PlaceQueryContext),
}

impl ContextPayload {
    /// The kind providers are matched against.
    pub fn kind(&self) -> PayloadKind {
        match self {
            ContextPayload::Session(_) => PayloadKind::Session,
            ContextPayload::ItineraryCommand(_) => PayloadKind::ItineraryCommand,
            ContextPayload::ItineraryQuery(_) => PayloadKind::ItineraryQuery,
            ContextPayload::OutputFormat(_) => PayloadKind::OutputFormat,
            ContextPayload::PlaceQuery(_) => PayloadKind::PlaceQuery,
        }
    }
}
