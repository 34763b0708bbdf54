//! Existing trip plan provider.
//!
//! Summarizes what a trip plan already contains so the model does not
//! schedule the same place twice or repeat day titles.

use async_trait::async_trait;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

use crate::domain::context::{
    ContextError, ContextPayload, ContextProvider, MetadataEntry, PayloadKind,
};
use crate::ports::{ItineraryReader, TripPlanDetails};

/// Reads the current plan state through the [`ItineraryReader`] port and
/// renders it as a system fragment. A trip with no plan yet contributes
/// nothing; a reader failure fails the generation as a dependency error.
pub struct ItineraryQueryProvider {
    reader: Arc<dyn ItineraryReader>,
}

impl ItineraryQueryProvider {
    /// Creates a provider over the given reader.
    pub fn new(reader: Arc<dyn ItineraryReader>) -> Self {
        Self { reader }
    }

    fn summarize(details: &TripPlanDetails) -> String {
        let mut summary = String::new();
        summary.push_str("### Basic information\n");
        let _ = writeln!(summary, "- **title**: {}", details.title);
        let _ = writeln!(
            summary,
            "- **period**: {} ~ {}",
            details.start_date, details.end_date
        );

        if details.daily_plans.is_empty() {
            summary.push_str("\nNo daily plans have been generated yet.\n");
            return summary;
        }

        summary.push_str("\n### Daily plans\n\n");
        for day in &details.daily_plans {
            let _ = writeln!(
                summary,
                "#### Day {}: {} ({})",
                day.day_number, day.title, day.date
            );
            if day.places.is_empty() {
                summary.push_str("- *(nothing scheduled)*\n\n");
                continue;
            }
            for place in &day.places {
                let _ = writeln!(summary, "- **[{}]** {}", place.visit_order, place.name);
            }
            summary.push('\n');
        }
        summary
    }
}

#[async_trait]
impl ContextProvider for ItineraryQueryProvider {
    fn name(&self) -> &'static str {
        "itinerary_query"
    }

    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::ItineraryQuery
    }

    fn priority(&self) -> i32 {
        20
    }

    async fn provide(&self, payload: &ContextPayload) -> Result<Vec<MetadataEntry>, ContextError> {
        let ContextPayload::ItineraryQuery(ctx) = payload else {
            return Ok(Vec::new());
        };

        let details = self
            .reader
            .find_details(ctx.trip_id)
            .await
            .map_err(|e| ContextError::lookup(self.name(), e.to_string()))?;

        let Some(details) = details else {
            debug!(trip_id = %ctx.trip_id, "trip has no plan yet; nothing to contribute");
            return Ok(Vec::new());
        };

        let fragment = format!(
            "## Trip plan context\n\n\
             The user's current trip plan. Never schedule a place that already\n\
             appears below, and never reuse an existing day title.\n\n{}",
            Self::summarize(&details)
        );

        Ok(vec![MetadataEntry::system(fragment)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::itinerary::InMemoryItineraryReader;
    use crate::domain::context::ItineraryQueryContext;
    use crate::domain::foundation::{PlaceId, TripId, UserId};
    use crate::ports::{DailyPlanOutline, ScheduledPlaceOutline};
    use chrono::NaiveDate;

    fn details(trip_id: TripId) -> TripPlanDetails {
        TripPlanDetails {
            trip_id,
            title: "Jeju long weekend".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 3).unwrap(),
            daily_plans: vec![DailyPlanOutline {
                day_number: 1,
                date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                title: "Eastern coast".to_string(),
                places: vec![ScheduledPlaceOutline {
                    visit_order: 1,
                    place_id: PlaceId::new(101),
                    name: "Seongsan Ilchulbong".to_string(),
                }],
            }],
        }
    }

    fn payload(trip_id: TripId) -> ContextPayload {
        ContextPayload::ItineraryQuery(ItineraryQueryContext {
            trip_id,
            user_id: UserId::new("traveler@example.com").unwrap(),
        })
    }

    #[tokio::test]
    async fn summarizes_existing_plan() {
        let trip_id = TripId::new();
        let reader = Arc::new(InMemoryItineraryReader::new());
        reader.insert(details(trip_id));

        let provider = ItineraryQueryProvider::new(reader);
        let entries = provider.provide(&payload(trip_id)).await.unwrap();

        assert_eq!(entries.len(), 1);
        let text = &entries[0].content;
        assert!(text.contains("Jeju long weekend"));
        assert!(text.contains("Day 1: Eastern coast"));
        assert!(text.contains("Seongsan Ilchulbong"));
    }

    #[tokio::test]
    async fn unknown_trip_contributes_nothing() {
        let provider = ItineraryQueryProvider::new(Arc::new(InMemoryItineraryReader::new()));
        let entries = provider.provide(&payload(TripId::new())).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn reader_failure_propagates_as_lookup_error() {
        let reader = Arc::new(InMemoryItineraryReader::new());
        reader.fail_with("connection refused");

        let provider = ItineraryQueryProvider::new(reader);
        let err = provider.provide(&payload(TripId::new())).await.unwrap_err();
        assert!(err.to_string().contains("itinerary_query"));
    }
}
