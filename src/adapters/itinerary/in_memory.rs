//! In-memory trip plan reader.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::TripId;
use crate::ports::{ItineraryReadError, ItineraryReader, TripPlanDetails};

/// Fixture-backed reader; can be switched into a failing mode to exercise
/// dependency-error paths.
pub struct InMemoryItineraryReader {
    plans: RwLock<HashMap<TripId, TripPlanDetails>>,
    failure: RwLock<Option<String>>,
}

impl InMemoryItineraryReader {
    /// Creates an empty reader.
    pub fn new() -> Self {
        Self {
            plans: RwLock::new(HashMap::new()),
            failure: RwLock::new(None),
        }
    }

    /// Stores plan details for a trip.
    pub fn insert(&self, details: TripPlanDetails) {
        self.plans
            .write()
            .expect("InMemoryItineraryReader: lock poisoned")
            .insert(details.trip_id, details);
    }

    /// Makes every subsequent read fail with the given message.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self
            .failure
            .write()
            .expect("InMemoryItineraryReader: lock poisoned") = Some(message.into());
    }
}

impl Default for InMemoryItineraryReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItineraryReader for InMemoryItineraryReader {
    async fn find_details(
        &self,
        trip_id: TripId,
    ) -> Result<Option<TripPlanDetails>, ItineraryReadError> {
        if let Some(message) = self
            .failure
            .read()
            .expect("InMemoryItineraryReader: lock poisoned")
            .clone()
        {
            return Err(ItineraryReadError::Storage(message));
        }

        Ok(self
            .plans
            .read()
            .expect("InMemoryItineraryReader: lock poisoned")
            .get(&trip_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn details(trip_id: TripId) -> TripPlanDetails {
        TripPlanDetails {
            trip_id,
            title: "Test trip".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 3).unwrap(),
            daily_plans: Vec::new(),
        }
    }

    #[tokio::test]
    async fn stores_and_finds_plans() {
        let reader = InMemoryItineraryReader::new();
        let trip_id = TripId::new();
        reader.insert(details(trip_id));

        let found = reader.find_details(trip_id).await.unwrap();
        assert_eq!(found.unwrap().title, "Test trip");
        assert!(reader.find_details(TripId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failure_mode_errors_every_read() {
        let reader = InMemoryItineraryReader::new();
        reader.fail_with("connection refused");

        let err = reader.find_details(TripId::new()).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
