use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::domain::{
    ports::ToxicityModel, DomainError, ToxicityLabel, ToxicityVerdict,
};
use crate::infrastructure::config::ToxicityConfig;

/// Text-classification over the Hugging Face inference API.
///
/// `load` fails when the API token is absent; the caller then runs with a
/// disabled gate instead of crashing, which is the fail-open contract for
/// moderation.
pub struct HfToxicityClassifier {
    client: Client,
    endpoint: String,
}

impl HfToxicityClassifier {
    pub fn load(config: &ToxicityConfig) -> Result<Self, DomainError> {
        let token = std::env::var(&config.api_key_env).map_err(|_| {
            DomainError::unavailable(format!(
                "toxicity classifier token missing ({} not set)",
                config.api_key_env
            ))
        })?;

        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth = reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| DomainError::unavailable(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(|e| DomainError::unavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/{}", config.api_base.trim_end_matches('/'), config.model),
        })
    }

    async fn request(&self, inputs: Value) -> Result<Value, DomainError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "inputs": inputs }))
            .send()
            .await
            .map_err(|e| DomainError::external(format!("toxicity request failed: {e}")))?
            .error_for_status()
            .map_err(|e| DomainError::external(format!("toxicity endpoint error: {e}")))?;

        response
            .json()
            .await
            .map_err(|e| DomainError::external(format!("toxicity response unreadable: {e}")))
    }
}

#[async_trait]
impl ToxicityModel for HfToxicityClassifier {
    async fn classify(&self, text: &str) -> Result<ToxicityVerdict, DomainError> {
        let json = self.request(Value::String(text.to_string())).await?;
        let predictions = json
            .as_array()
            .and_then(|outer| outer.first())
            .ok_or_else(|| DomainError::external("toxicity response missing predictions"))?;
        Ok(parse_prediction(predictions))
    }

    async fn classify_batch(&self, texts: &[&str]) -> Result<Vec<ToxicityVerdict>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let json = self.request(serde_json::json!(texts)).await?;
        let outer = json
            .as_array()
            .ok_or_else(|| DomainError::external("toxicity response missing predictions"))?;

        if outer.len() != texts.len() {
            return Err(DomainError::external(format!(
                "toxicity endpoint returned {} predictions for {} inputs",
                outer.len(),
                texts.len()
            )));
        }

        Ok(outer.iter().map(parse_prediction).collect())
    }
}

/// Picks the highest-scoring class out of one prediction list. Labels the
/// model was not trained with map to `Unavailable` rather than a guess.
fn parse_prediction(prediction: &Value) -> ToxicityVerdict {
    let Some(classes) = prediction.as_array() else {
        return ToxicityVerdict::Unavailable;
    };

    let top = classes.iter().max_by(|a, b| {
        let sa = a.get("score").and_then(Value::as_f64).unwrap_or(0.0);
        let sb = b.get("score").and_then(Value::as_f64).unwrap_or(0.0);
        sa.partial_cmp(&sb).unwrap_or(std::cmp::Ordering::Equal)
    });

    let Some(top) = top else {
        return ToxicityVerdict::Unavailable;
    };

    let score = top.get("score").and_then(Value::as_f64).unwrap_or(0.0) as f32;
    match top.get("label").and_then(Value::as_str) {
        Some("toxic") | Some("LABEL_1") => ToxicityVerdict::scored(ToxicityLabel::Toxic, score),
        Some("non-toxic") | Some("non_toxic") | Some("neutral") | Some("LABEL_0") => {
            ToxicityVerdict::scored(ToxicityLabel::NonToxic, score)
        }
        _ => ToxicityVerdict::Unavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_toxic_top_class() {
        let prediction = serde_json::json!([
            { "label": "toxic", "score": 0.97 },
            { "label": "neutral", "score": 0.03 }
        ]);

        assert_eq!(
            parse_prediction(&prediction),
            ToxicityVerdict::scored(ToxicityLabel::Toxic, 0.97)
        );
    }

    #[test]
    fn test_parses_neutral_as_non_toxic() {
        let prediction = serde_json::json!([
            { "label": "neutral", "score": 0.91 },
            { "label": "toxic", "score": 0.09 }
        ]);

        assert_eq!(
            parse_prediction(&prediction),
            ToxicityVerdict::scored(ToxicityLabel::NonToxic, 0.91)
        );
    }

    #[test]
    fn test_unknown_label_is_unavailable() {
        let prediction = serde_json::json!([ { "label": "sarcasm", "score": 0.9 } ]);
        assert_eq!(parse_prediction(&prediction), ToxicityVerdict::Unavailable);
    }

    #[test]
    fn test_malformed_prediction_is_unavailable() {
        let prediction = serde_json::json!({ "label": "toxic" });
        assert_eq!(parse_prediction(&prediction), ToxicityVerdict::Unavailable);
    }
}
