use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::domain::{ports::RerankModel, DomainError};
use crate::infrastructure::config::RerankConfig;

/// Cross-encoder scoring over an HTTP rerank endpoint (Jina/Cohere wire
/// shape): one request per candidate set, scores aligned back to input
/// order via the returned indexes.
pub struct HttpCrossEncoder {
    client: Client,
    api_base: String,
    model: String,
    api_key: Option<String>,
}

impl HttpCrossEncoder {
    pub fn new(config: &RerankConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            api_key: std::env::var(&config.api_key_env).ok(),
        })
    }
}

#[async_trait]
impl RerankModel for HttpCrossEncoder {
    async fn score(&self, query: &str, texts: &[String]) -> Result<Vec<f32>, DomainError> {
        let body = serde_json::json!({
            "model": self.model,
            "query": query,
            "documents": texts,
        });

        let mut request = self.client.post(&self.api_base).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::external(format!("rerank request failed: {e}")))?
            .error_for_status()
            .map_err(|e| DomainError::external(format!("rerank endpoint error: {e}")))?;

        let json: Value = response
            .json()
            .await
            .map_err(|e| DomainError::external(format!("rerank response unreadable: {e}")))?;

        parse_rerank_response(&json, texts.len())
    }
}

fn parse_rerank_response(json: &Value, doc_count: usize) -> Result<Vec<f32>, DomainError> {
    let results = json
        .get("results")
        .or_else(|| json.get("data"))
        .and_then(|v| v.as_array())
        .ok_or_else(|| DomainError::external("rerank response missing results array"))?;

    let mut scores = vec![0.0f32; doc_count];
    for item in results {
        let index = item
            .get("index")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| DomainError::external("rerank result missing index"))?
            as usize;
        let score = item
            .get("relevance_score")
            .or_else(|| item.get("score"))
            .and_then(|v| v.as_f64())
            .ok_or_else(|| DomainError::external("rerank result missing score"))?
            as f32;
        if index < scores.len() {
            scores[index] = score;
        }
    }

    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_align_by_index() {
        let json = serde_json::json!({
            "results": [
                { "index": 1, "relevance_score": 0.2 },
                { "index": 0, "relevance_score": 0.9 }
            ]
        });

        let scores = parse_rerank_response(&json, 2).unwrap();
        assert_eq!(scores, vec![0.9, 0.2]);
    }

    #[test]
    fn test_accepts_data_key_and_score_alias() {
        let json = serde_json::json!({
            "data": [ { "index": 0, "score": 0.7 } ]
        });

        let scores = parse_rerank_response(&json, 1).unwrap();
        assert_eq!(scores, vec![0.7]);
    }

    #[test]
    fn test_missing_results_is_an_error() {
        let json = serde_json::json!({ "unexpected": true });
        assert!(parse_rerank_response(&json, 1).is_err());
    }

    #[test]
    fn test_unscored_documents_default_to_zero() {
        let json = serde_json::json!({
            "results": [ { "index": 0, "relevance_score": 0.8 } ]
        });

        let scores = parse_rerank_response(&json, 3).unwrap();
        assert_eq!(scores, vec![0.8, 0.0, 0.0]);
    }
}
