use std::sync::Arc;

use tracing::instrument;

use crate::domain::{ports::RerankModel, Document, DomainError, RankedDocument};

/// Second-pass relevance scoring over retrieved candidates.
///
/// Policy is truncate-then-filter: sort by descending score, keep the top_k
/// highest, then drop anything under min_score. A weak document inside the
/// top_k can survive as long as it clears min_score; a document outside the
/// top_k never reaches the filter. The order of the two stages is part of
/// the contract.
pub struct Reranker {
    model: Arc<dyn RerankModel>,
    default_top_k: usize,
    default_min_score: f32,
}

impl Reranker {
    pub fn new(model: Arc<dyn RerankModel>, default_top_k: usize, default_min_score: f32) -> Self {
        Self {
            model,
            default_top_k,
            default_min_score,
        }
    }

    pub async fn rerank(
        &self,
        query: &str,
        documents: Vec<Document>,
    ) -> Result<Vec<RankedDocument>, DomainError> {
        self.rerank_with(query, documents, self.default_top_k, self.default_min_score)
            .await
    }

    #[instrument(skip(self, documents), fields(candidates = documents.len()))]
    pub async fn rerank_with(
        &self,
        query: &str,
        documents: Vec<Document>,
        top_k: usize,
        min_score: f32,
    ) -> Result<Vec<RankedDocument>, DomainError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let scores = self.model.score(query, &texts).await?;

        if scores.len() != documents.len() {
            return Err(DomainError::external(format!(
                "reranker returned {} scores for {} documents",
                scores.len(),
                documents.len()
            )));
        }

        let mut ranked: Vec<RankedDocument> = documents
            .into_iter()
            .zip(scores)
            .map(|(document, score)| RankedDocument { document, score })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(top_k);
        ranked.retain(|r| r.score >= min_score);

        Ok(ranked)
    }
}
