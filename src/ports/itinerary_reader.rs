//! ItineraryReader port - read-only view of existing trip plans.
//!
//! Used by the itinerary-query context provider to summarize what a trip
//! already contains, so the model avoids duplicating places and titles.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::foundation::{PlaceId, TripId};

/// A scheduled place as stored on an existing plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledPlaceOutline {
    pub visit_order: u32,
    pub place_id: PlaceId,
    pub name: String,
}

/// One existing day of a trip plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyPlanOutline {
    pub day_number: u32,
    pub date: NaiveDate,
    pub title: String,
    pub places: Vec<ScheduledPlaceOutline>,
}

/// Current state of a trip plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripPlanDetails {
    pub trip_id: TripId,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub daily_plans: Vec<DailyPlanOutline>,
}

/// Reader failures.
#[derive(Debug, Clone, Error)]
pub enum ItineraryReadError {
    #[error("itinerary read error: {0}")]
    Storage(String),
}

/// Port for reading existing trip plan state.
#[async_trait]
pub trait ItineraryReader: Send + Sync {
    /// Returns the plan's current state, or `None` when the trip has no
    /// plan yet.
    async fn find_details(
        &self,
        trip_id: TripId,
    ) -> Result<Option<TripPlanDetails>, ItineraryReadError>;
}
