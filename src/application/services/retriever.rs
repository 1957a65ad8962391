use std::sync::Arc;

use futures::future::try_join;
use tracing::instrument;

use crate::domain::{
    ports::{EmbeddingService, VectorIndex},
    Candidate, DomainError, RetrievedSet,
};

/// Similarity retrieval over the two collections. The query is embedded once
/// and both indexes are searched with it; the indexes are read-only at query
/// time, so the fan-out does not change results.
pub struct Retriever {
    embedding: Arc<dyn EmbeddingService>,
    faq_index: Arc<dyn VectorIndex>,
    trip_index: Arc<dyn VectorIndex>,
    default_n: usize,
}

impl Retriever {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        faq_index: Arc<dyn VectorIndex>,
        trip_index: Arc<dyn VectorIndex>,
        default_n: usize,
    ) -> Self {
        Self {
            embedding,
            faq_index,
            trip_index,
            default_n,
        }
    }

    #[instrument(skip(self))]
    pub async fn query_faq(&self, text: &str, n: usize) -> Result<Vec<Candidate>, DomainError> {
        let embedding = self.embedding.embed(text).await?;
        self.faq_index.query(&embedding, n).await
    }

    #[instrument(skip(self))]
    pub async fn query_trips(&self, text: &str, n: usize) -> Result<Vec<Candidate>, DomainError> {
        let embedding = self.embedding.embed(text).await?;
        self.trip_index.query(&embedding, n).await
    }

    pub async fn query_all(&self, text: &str) -> Result<RetrievedSet, DomainError> {
        self.query_all_n(text, self.default_n).await
    }

    /// Top `n` candidates from each collection for one query.
    #[instrument(skip(self), fields(faq = self.faq_index.collection(), trips = self.trip_index.collection()))]
    pub async fn query_all_n(&self, text: &str, n: usize) -> Result<RetrievedSet, DomainError> {
        let embedding = self.embedding.embed(text).await?;

        let (faq, trips) = try_join(
            self.faq_index.query(&embedding, n),
            self.trip_index.query(&embedding, n),
        )
        .await?;

        Ok(RetrievedSet { faq, trips })
    }
}
