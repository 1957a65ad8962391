use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// One FAQ entry as stored in `data/faq.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqRecord {
    pub question: String,
    pub answer: String,
    pub category: String,
}

impl FaqRecord {
    /// The text that gets embedded: question and answer combined.
    pub fn document_text(&self) -> String {
        format!("Question: {}\nAnswer: {}", self.question, self.answer)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.question.trim().is_empty() {
            return Err(DomainError::validation("FAQ record has an empty question"));
        }
        if self.answer.trim().is_empty() {
            return Err(DomainError::validation("FAQ record has an empty answer"));
        }
        Ok(())
    }
}

/// One trip offer as stored in `data/trips_data.json`. Field names mirror the
/// catalog file's headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Start date")]
    pub start_date: String,
    #[serde(rename = "Count of days")]
    pub count_of_days: u32,
    #[serde(rename = "Cost in EUR")]
    pub cost_in_eur: f64,
    #[serde(rename = "Extra activities")]
    pub extra_activities: Vec<String>,
    #[serde(rename = "Trip details")]
    pub trip_details: String,
}

impl TripRecord {
    /// The text that gets embedded for similarity search over the catalog.
    pub fn document_text(&self) -> String {
        format!(
            "Trip to {city}, {country} starting {start} for {days} days at {cost} EUR. \
             Extra activities: {activities}. {details}",
            city = self.city,
            country = self.country,
            start = self.start_date,
            days = self.count_of_days,
            cost = self.cost_in_eur,
            activities = if self.extra_activities.is_empty() {
                "none".to_string()
            } else {
                self.extra_activities.join(", ")
            },
            details = self.trip_details,
        )
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.country.trim().is_empty() {
            return Err(DomainError::validation("trip record has an empty country"));
        }
        if self.city.trim().is_empty() {
            return Err(DomainError::validation("trip record has an empty city"));
        }
        if self.start_date.trim().is_empty() {
            return Err(DomainError::validation(
                "trip record has an empty start date",
            ));
        }
        if self.count_of_days == 0 {
            return Err(DomainError::validation("trip record has zero days"));
        }
        if self.cost_in_eur < 0.0 {
            return Err(DomainError::validation("trip record has a negative cost"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip() -> TripRecord {
        TripRecord {
            country: "Greece".into(),
            city: "Athens".into(),
            start_date: "2025-07-10".into(),
            count_of_days: 5,
            cost_in_eur: 850.0,
            extra_activities: vec!["acropolis tour".into(), "wine tasting".into()],
            trip_details: "Five days in the cradle of democracy.".into(),
        }
    }

    #[test]
    fn test_faq_document_text() {
        let record = FaqRecord {
            question: "What is your cancellation policy?".into(),
            answer: "Free cancellation up to 14 days before departure.".into(),
            category: "policy".into(),
        };

        assert_eq!(
            record.document_text(),
            "Question: What is your cancellation policy?\n\
             Answer: Free cancellation up to 14 days before departure."
        );
    }

    #[test]
    fn test_trip_document_text_mentions_all_fields() {
        let text = trip().document_text();
        assert!(text.contains("Athens"));
        assert!(text.contains("Greece"));
        assert!(text.contains("2025-07-10"));
        assert!(text.contains("5 days"));
        assert!(text.contains("850 EUR"));
        assert!(text.contains("acropolis tour, wine tasting"));
    }

    #[test]
    fn test_trip_validation_rejects_zero_days() {
        let mut record = trip();
        record.count_of_days = 0;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_faq_validation_rejects_blank_answer() {
        let record = FaqRecord {
            question: "q".into(),
            answer: "   ".into(),
            category: "misc".into(),
        };
        assert!(record.validate().is_err());
    }
}
