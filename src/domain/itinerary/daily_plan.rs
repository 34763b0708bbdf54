//! Daily plan records generated by the model.
//!
//! These types define the schema each streamed NDJSON line must conform to.
//! Field names follow the wire contract the model is instructed with
//! (camelCase), so a line deserializes directly into `DailyPlanDraft`.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::domain::foundation::{PlaceId, ValidationError};
use crate::domain::streaming::StreamRecord;

/// Part of the day a scheduled place belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduledCategory {
    /// Morning block, up to lunch.
    Morning,
    /// Afternoon block, lunch through dinner.
    Afternoon,
    /// Evening block, dinner onwards.
    Evening,
}

/// Mode of travel between scheduled places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportMode {
    Car,
    PublicTransit,
    Walk,
}

/// One place visit inside a daily plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPlaceDraft {
    /// Catalog key of the place; the model copies it from the place context.
    pub place_id: PlaceId,
    /// Visit order within the day, starting at 1.
    pub visit_order: u32,
    /// Part of day.
    pub category: ScheduledCategory,
    /// Visit start, HH:MM.
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    /// Visit end, HH:MM.
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    /// Travel time from the previous place, in minutes.
    #[serde(rename = "travelTime")]
    pub travel_minutes: u32,
    /// How to get there.
    #[serde(rename = "transportation")]
    pub transport: TransportMode,
}

/// One day of a generated itinerary - the unit of streaming output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlanDraft {
    /// Day number, 1 through the trip duration.
    pub day_number: u32,
    /// Calendar date of this day.
    pub date: NaiveDate,
    /// Short headline for the day.
    pub title: String,
    /// Markdown summary of the day.
    pub description: String,
    /// Places to visit, in order.
    pub places: Vec<ScheduledPlaceDraft>,
}

impl DailyPlanDraft {
    /// JSON schema the model's output lines must conform to.
    ///
    /// Embedded in the output-format prompt fragment so the model and the
    /// decoder agree on shape.
    pub fn json_schema() -> JsonValue {
        json!({
            "type": "object",
            "required": ["dayNumber", "date", "title", "description", "places"],
            "properties": {
                "dayNumber": { "type": "integer", "minimum": 1, "description": "Day number, increasing from 1" },
                "date": { "type": "string", "format": "date", "description": "Date in YYYY-MM-DD" },
                "title": { "type": "string", "description": "Short headline for the day" },
                "description": { "type": "string", "description": "Markdown summary; use single quotes, never unescaped double quotes" },
                "places": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["placeId", "visitOrder", "category", "startTime", "endTime", "travelTime", "transportation"],
                        "properties": {
                            "placeId": { "type": "integer", "description": "Catalog id of the place, copied from the place context" },
                            "visitOrder": { "type": "integer", "minimum": 1 },
                            "category": { "enum": ["MORNING", "AFTERNOON", "EVENING"] },
                            "startTime": { "type": "string", "description": "HH:MM" },
                            "endTime": { "type": "string", "description": "HH:MM" },
                            "travelTime": { "type": "integer", "description": "Minutes from the previous place" },
                            "transportation": { "enum": ["CAR", "PUBLIC_TRANSIT", "WALK"] }
                        }
                    }
                }
            }
        })
    }
}

impl StreamRecord for DailyPlanDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.day_number < 1 || self.day_number > 365 {
            return Err(ValidationError::out_of_range(
                "dayNumber",
                1,
                365,
                self.day_number as i64,
            ));
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if self.places.is_empty() {
            return Err(ValidationError::empty_field("places"));
        }
        for place in &self.places {
            if place.visit_order < 1 {
                return Err(ValidationError::out_of_range(
                    "visitOrder",
                    1,
                    i64::MAX,
                    place.visit_order as i64,
                ));
            }
        }
        Ok(())
    }
}

/// Serde helper for `HH:MM` times as the model is instructed to emit them.
///
/// Accepts a trailing `:SS` on input since models occasionally add one.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_line() -> &'static str {
        r#"{
            "dayNumber": 1,
            "date": "2026-09-01",
            "title": "Eastern coast",
            "description": "**Day 1** - sunrise peak, then the coast road.",
            "places": [
                {
                    "placeId": 101,
                    "visitOrder": 1,
                    "category": "MORNING",
                    "startTime": "09:00",
                    "endTime": "11:00",
                    "travelTime": 0,
                    "transportation": "CAR"
                },
                {
                    "placeId": 205,
                    "visitOrder": 2,
                    "category": "AFTERNOON",
                    "startTime": "13:30",
                    "endTime": "15:00",
                    "travelTime": 40,
                    "transportation": "CAR"
                }
            ]
        }"#
    }

    #[test]
    fn deserializes_wire_format() {
        let plan: DailyPlanDraft = serde_json::from_str(sample_line()).unwrap();

        assert_eq!(plan.day_number, 1);
        assert_eq!(plan.title, "Eastern coast");
        assert_eq!(plan.places.len(), 2);
        assert_eq!(plan.places[0].place_id, PlaceId::new(101));
        assert_eq!(plan.places[0].category, ScheduledCategory::Morning);
        assert_eq!(
            plan.places[0].start_time,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(plan.places[1].travel_minutes, 40);
        assert_eq!(plan.places[1].transport, TransportMode::Car);
    }

    #[test]
    fn serializes_back_to_camel_case() {
        let plan: DailyPlanDraft = serde_json::from_str(sample_line()).unwrap();
        let json = serde_json::to_value(&plan).unwrap();

        assert_eq!(json["dayNumber"], 1);
        assert_eq!(json["places"][0]["visitOrder"], 1);
        assert_eq!(json["places"][0]["startTime"], "09:00");
        assert_eq!(json["places"][1]["transportation"], "CAR");
    }

    #[test]
    fn accepts_times_with_seconds() {
        let line = sample_line().replace("\"09:00\"", "\"09:00:00\"");
        let plan: DailyPlanDraft = serde_json::from_str(&line).unwrap();
        assert_eq!(
            plan.places[0].start_time,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
    }

    #[test]
    fn rejects_unknown_category() {
        let line = sample_line().replace("MORNING", "BRUNCH");
        assert!(serde_json::from_str::<DailyPlanDraft>(&line).is_err());
    }

    #[test]
    fn validate_rejects_zero_day_number() {
        let mut plan: DailyPlanDraft = serde_json::from_str(sample_line()).unwrap();
        plan.day_number = 0;
        assert!(plan.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_places() {
        let mut plan: DailyPlanDraft = serde_json::from_str(sample_line()).unwrap();
        plan.places.clear();
        assert!(plan.validate().is_err());
    }

    #[test]
    fn validate_accepts_well_formed_plan() {
        let plan: DailyPlanDraft = serde_json::from_str(sample_line()).unwrap();
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn schema_names_required_fields() {
        let schema = DailyPlanDraft::json_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(required.contains(&"dayNumber"));
        assert!(required.contains(&"places"));
    }
}
