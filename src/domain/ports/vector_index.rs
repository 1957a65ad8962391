use crate::domain::{errors::DomainError, Candidate, Document, Embedding};
use async_trait::async_trait;

/// One named, similarity-addressable document collection. The FAQ and trip
/// collections are separate instances; they are merged at query time only.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    fn collection(&self) -> &str;

    /// Inserts or replaces the document under its id. Idempotent per id.
    async fn upsert(&self, document: &Document, embedding: &Embedding)
        -> Result<(), DomainError>;

    /// Returns at most `n` candidates ordered by ascending distance.
    async fn query(&self, embedding: &Embedding, n: usize) -> Result<Vec<Candidate>, DomainError>;

    async fn count(&self) -> Result<usize, DomainError>;
}
