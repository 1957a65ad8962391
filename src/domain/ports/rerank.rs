use crate::domain::errors::DomainError;
use async_trait::async_trait;

/// Pairwise cross-encoder scorer: one relevance score per (query, text)
/// pair, aligned with the input order.
#[async_trait]
pub trait RerankModel: Send + Sync {
    async fn score(&self, query: &str, texts: &[String]) -> Result<Vec<f32>, DomainError>;
}
