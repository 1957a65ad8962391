use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

use crate::domain::{DomainError, TripRecord};
use crate::infrastructure::config::TripLookupToolConfig;

/// The static trip list behind `fetch_trip_details`, loaded once at startup.
pub struct TripCatalog {
    trips: Vec<TripRecord>,
}

impl TripCatalog {
    pub fn new(trips: Vec<TripRecord>) -> Self {
        Self { trips }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DomainError::internal(format!("failed to read {}: {e}", path.as_ref().display()))
        })?;
        let trips: Vec<TripRecord> = serde_json::from_str(&raw)
            .map_err(|e| DomainError::validation(format!("malformed trip catalog: {e}")))?;
        Ok(Self::new(trips))
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Exact-match search. `trip_id` is a positional index that bypasses all
    /// other filters; otherwise every supplied criterion must match, with
    /// text fields compared case-insensitively.
    pub fn search(&self, args: &TripLookupArgs) -> TripSearchResponse {
        if let Some(trip_id) = args.trip_id {
            return match self.trips.get(trip_id) {
                Some(trip) => TripSearchResponse::results(vec![trip.clone()]),
                None => TripSearchResponse::error(format!("No trip found with ID {trip_id}")),
            };
        }

        if !args.has_criteria() {
            return TripSearchResponse::error(
                "No search criteria provided. Supply at least one of: country, city, \
                 start_date, trip_id, count_of_days, cost, extra_activities, trip_details",
            );
        }

        let results: Vec<TripRecord> = self
            .trips
            .iter()
            .filter(|trip| args.matches(trip))
            .cloned()
            .collect();

        if results.is_empty() {
            TripSearchResponse::error("No trips found matching the criteria")
        } else {
            TripSearchResponse::results(results)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TripLookupArgs {
    pub country: Option<String>,
    pub city: Option<String>,
    pub start_date: Option<String>,
    pub trip_id: Option<usize>,
    pub count_of_days: Option<u32>,
    pub cost: Option<f64>,
    pub extra_activities: Option<String>,
    pub trip_details: Option<String>,
}

impl TripLookupArgs {
    fn has_criteria(&self) -> bool {
        self.country.is_some()
            || self.city.is_some()
            || self.start_date.is_some()
            || self.count_of_days.is_some()
            || self.cost.is_some()
            || self.extra_activities.is_some()
            || self.trip_details.is_some()
    }

    fn matches(&self, trip: &TripRecord) -> bool {
        if let Some(country) = &self.country {
            if !trip.country.eq_ignore_ascii_case(country) {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if !trip.city.eq_ignore_ascii_case(city) {
                return false;
            }
        }
        if let Some(start_date) = &self.start_date {
            if trip.start_date != *start_date {
                return false;
            }
        }
        if let Some(days) = self.count_of_days {
            if trip.count_of_days != days {
                return false;
            }
        }
        if let Some(cost) = self.cost {
            if trip.cost_in_eur != cost {
                return false;
            }
        }
        if let Some(activity) = &self.extra_activities {
            if !trip
                .extra_activities
                .iter()
                .any(|a| a.eq_ignore_ascii_case(activity))
            {
                return false;
            }
        }
        if let Some(details) = &self.trip_details {
            if !trip.trip_details.eq_ignore_ascii_case(details) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TripSearchResponse {
    Results { results: Vec<TripRecord> },
    Error { error: String },
}

impl TripSearchResponse {
    fn results(results: Vec<TripRecord>) -> Self {
        Self::Results { results }
    }

    fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Trip lookup error: {0}")]
pub struct TripLookupError(pub String);

/// `fetch_trip_details` as an LLM-invocable capability. Attached to the
/// completion agent only when enabled in config.
#[derive(Clone)]
pub struct TripLookupTool {
    catalog: Arc<TripCatalog>,
    config: TripLookupToolConfig,
}

impl TripLookupTool {
    pub fn new(catalog: Arc<TripCatalog>) -> Self {
        Self {
            catalog,
            config: TripLookupToolConfig::default(),
        }
    }

    pub fn from_config(catalog: Arc<TripCatalog>, config: TripLookupToolConfig) -> Self {
        Self { catalog, config }
    }
}

impl Tool for TripLookupTool {
    const NAME: &'static str = "fetch_trip_details";

    type Error = TripLookupError;
    type Args = TripLookupArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: self.config.name.clone(),
            description: self.config.description.clone(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "country": {
                        "type": "string",
                        "description": "Country to search for (e.g., \"Italy\")"
                    },
                    "city": {
                        "type": "string",
                        "description": "City to search for (e.g., \"Rome\")"
                    },
                    "start_date": {
                        "type": "string",
                        "description": "Trip start date in YYYY-MM-DD format"
                    },
                    "trip_id": {
                        "type": "integer",
                        "description": "Positional id of the trip; ignores all other filters"
                    },
                    "count_of_days": {
                        "type": "integer",
                        "description": "Exact trip length in days"
                    },
                    "cost": {
                        "type": "number",
                        "description": "Exact trip cost in EUR"
                    },
                    "extra_activities": {
                        "type": "string",
                        "description": "An included extra activity"
                    },
                    "trip_details": {
                        "type": "string",
                        "description": "Exact trip description text"
                    }
                }
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let response = self.catalog.search(&args);
        serde_json::to_string(&response).map_err(|e| TripLookupError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(city: &str, country: &str, days: u32, cost: f64) -> TripRecord {
        TripRecord {
            country: country.into(),
            city: city.into(),
            start_date: "2025-06-01".into(),
            count_of_days: days,
            cost_in_eur: cost,
            extra_activities: vec!["city tour".into(), "boat trip".into()],
            trip_details: format!("{days} days in {city}."),
        }
    }

    fn catalog() -> TripCatalog {
        TripCatalog::new(vec![
            trip("Rome", "Italy", 7, 1200.0),
            trip("Paris", "France", 5, 980.0),
        ])
    }

    #[test]
    fn test_trip_id_returns_record_verbatim() {
        let catalog = catalog();
        let response = catalog.search(&TripLookupArgs {
            trip_id: Some(0),
            ..Default::default()
        });

        match response {
            TripSearchResponse::Results { results } => {
                assert_eq!(results, vec![trip("Rome", "Italy", 7, 1200.0)]);
            }
            TripSearchResponse::Error { error } => panic!("unexpected error: {error}"),
        }
    }

    #[test]
    fn test_out_of_range_trip_id_is_an_error() {
        let response = catalog().search(&TripLookupArgs {
            trip_id: Some(5),
            ..Default::default()
        });

        match response {
            TripSearchResponse::Error { error } => {
                assert_eq!(error, "No trip found with ID 5");
            }
            TripSearchResponse::Results { .. } => panic!("expected an error"),
        }
    }

    #[test]
    fn test_trip_id_bypasses_other_filters() {
        let response = catalog().search(&TripLookupArgs {
            trip_id: Some(1),
            country: Some("Italy".into()),
            ..Default::default()
        });

        match response {
            TripSearchResponse::Results { results } => assert_eq!(results[0].city, "Paris"),
            TripSearchResponse::Error { error } => panic!("unexpected error: {error}"),
        }
    }

    #[test]
    fn test_text_filters_are_case_insensitive() {
        let response = catalog().search(&TripLookupArgs {
            country: Some("italy".into()),
            city: Some("ROME".into()),
            ..Default::default()
        });

        match response {
            TripSearchResponse::Results { results } => {
                assert_eq!(results.len(), 1);
                assert_eq!(results[0].city, "Rome");
            }
            TripSearchResponse::Error { error } => panic!("unexpected error: {error}"),
        }
    }

    #[test]
    fn test_activity_filter_matches_list_membership() {
        let response = catalog().search(&TripLookupArgs {
            extra_activities: Some("Boat Trip".into()),
            ..Default::default()
        });

        match response {
            TripSearchResponse::Results { results } => assert_eq!(results.len(), 2),
            TripSearchResponse::Error { error } => panic!("unexpected error: {error}"),
        }
    }

    #[test]
    fn test_no_criteria_is_an_error() {
        let response = catalog().search(&TripLookupArgs::default());
        assert!(matches!(response, TripSearchResponse::Error { .. }));
    }

    #[test]
    fn test_unmatched_criteria_is_an_error() {
        let response = catalog().search(&TripLookupArgs {
            country: Some("Japan".into()),
            ..Default::default()
        });

        match response {
            TripSearchResponse::Error { error } => {
                assert_eq!(error, "No trips found matching the criteria");
            }
            TripSearchResponse::Results { .. } => panic!("expected an error"),
        }
    }

    #[test]
    fn test_combined_filters_are_conjunctive() {
        let response = catalog().search(&TripLookupArgs {
            country: Some("France".into()),
            count_of_days: Some(7),
            ..Default::default()
        });
        assert!(matches!(response, TripSearchResponse::Error { .. }));
    }
}
