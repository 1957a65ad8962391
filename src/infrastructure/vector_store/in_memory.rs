use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::{ports::VectorIndex, Candidate, Document, DomainError, Embedding};

/// Non-persistent collection backend. Serves tests and single-run setups;
/// the Qdrant backend covers persistence across restarts.
pub struct InMemoryVectorIndex {
    collection: String,
    entries: RwLock<Vec<(Document, Embedding)>>,
}

impl InMemoryVectorIndex {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            entries: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn upsert(
        &self,
        document: &Document,
        embedding: &Embedding,
    ) -> Result<(), DomainError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        entries.retain(|(d, _)| d.id != document.id);
        entries.push((document.clone(), embedding.clone()));
        Ok(())
    }

    async fn query(&self, embedding: &Embedding, n: usize) -> Result<Vec<Candidate>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let mut candidates: Vec<Candidate> = entries
            .iter()
            .map(|(document, stored)| Candidate {
                document: document.clone(),
                distance: embedding.cosine_distance(stored),
            })
            .collect();

        candidates.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(candidates.into_iter().take(n).collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FaqRecord;

    fn document(id_index: usize, question: &str) -> Document {
        Document::from_faq(
            id_index,
            FaqRecord {
                question: question.into(),
                answer: "a".into(),
                category: "general".into(),
            },
        )
    }

    #[tokio::test]
    async fn test_upsert_and_query() {
        let index = InMemoryVectorIndex::new("faq");

        index
            .upsert(&document(0, "q"), &Embedding::new(vec![1.0, 0.0]))
            .await
            .unwrap();

        let results = index.query(&Embedding::new(vec![1.0, 0.0]), 1).await.unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0].distance.abs() < 0.001);
    }

    #[tokio::test]
    async fn test_upsert_same_id_replaces() {
        let index = InMemoryVectorIndex::new("faq");
        let embedding = Embedding::new(vec![1.0, 0.0]);

        index.upsert(&document(0, "old"), &embedding).await.unwrap();
        index.upsert(&document(0, "new"), &embedding).await.unwrap();

        assert_eq!(index.count().await.unwrap(), 1);
        let results = index.query(&embedding, 10).await.unwrap();
        assert!(results[0].document.text.contains("new"));
    }

    #[tokio::test]
    async fn test_query_orders_by_ascending_distance_and_caps_at_n() {
        let index = InMemoryVectorIndex::new("faq");

        index
            .upsert(&document(0, "far"), &Embedding::new(vec![0.0, 1.0]))
            .await
            .unwrap();
        index
            .upsert(&document(1, "near"), &Embedding::new(vec![1.0, 0.0]))
            .await
            .unwrap();
        index
            .upsert(&document(2, "mid"), &Embedding::new(vec![1.0, 1.0]))
            .await
            .unwrap();

        let results = index.query(&Embedding::new(vec![1.0, 0.0]), 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document.id, "faq_1");
        assert!(results[0].distance <= results[1].distance);
    }
}
