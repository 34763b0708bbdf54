//! Itinerary domain module.
//!
//! Daily plan records as the model produces them, one per NDJSON line.

mod daily_plan;

pub use daily_plan::{DailyPlanDraft, ScheduledCategory, ScheduledPlaceDraft, TransportMode};
