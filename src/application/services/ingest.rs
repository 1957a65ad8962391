use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::domain::{
    ports::{EmbeddingService, VectorIndex},
    Document, DomainError, FaqRecord, TripRecord,
};

/// What one ingestion pass did to a collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestReport {
    pub ingested: usize,
    pub quarantined: usize,
}

/// One-time startup population of the two collections from the static
/// source files. Ids derive from the record's position, so re-running the
/// ingest upserts in place instead of duplicating.
pub struct IngestService {
    embedding: Arc<dyn EmbeddingService>,
    faq_index: Arc<dyn VectorIndex>,
    trip_index: Arc<dyn VectorIndex>,
}

impl IngestService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        faq_index: Arc<dyn VectorIndex>,
        trip_index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            embedding,
            faq_index,
            trip_index,
        }
    }

    pub fn load_faq_file(path: impl AsRef<Path>) -> Result<Vec<FaqRecord>, DomainError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DomainError::internal(format!(
                "failed to read {}: {e}",
                path.as_ref().display()
            ))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| DomainError::validation(format!("malformed FAQ file: {e}")))
    }

    pub fn load_trip_file(path: impl AsRef<Path>) -> Result<Vec<TripRecord>, DomainError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DomainError::internal(format!(
                "failed to read {}: {e}",
                path.as_ref().display()
            ))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| DomainError::validation(format!("malformed trip catalog: {e}")))
    }

    #[instrument(skip_all, fields(records = records.len()))]
    pub async fn ingest_faq(&self, records: &[FaqRecord]) -> Result<IngestReport, DomainError> {
        let documents = validated_documents(records.iter().enumerate().map(|(i, r)| {
            r.validate()
                .map(|()| Document::from_faq(i, r.clone()))
                .map_err(|e| (i, e))
        }));
        self.upsert_all(&self.faq_index, documents).await
    }

    #[instrument(skip_all, fields(records = records.len()))]
    pub async fn ingest_trips(&self, records: &[TripRecord]) -> Result<IngestReport, DomainError> {
        let documents = validated_documents(records.iter().enumerate().map(|(i, r)| {
            r.validate()
                .map(|()| Document::from_trip(i, r.clone()))
                .map_err(|e| (i, e))
        }));
        self.upsert_all(&self.trip_index, documents).await
    }

    async fn upsert_all(
        &self,
        index: &Arc<dyn VectorIndex>,
        (documents, quarantined): (Vec<Document>, usize),
    ) -> Result<IngestReport, DomainError> {
        if documents.is_empty() {
            return Ok(IngestReport {
                ingested: 0,
                quarantined,
            });
        }

        let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
        let embeddings = self.embedding.embed_batch(&texts).await?;

        for (document, embedding) in documents.iter().zip(embeddings.iter()) {
            index.upsert(document, embedding).await?;
        }

        info!(
            collection = index.collection(),
            ingested = documents.len(),
            quarantined,
            "collection populated"
        );

        Ok(IngestReport {
            ingested: documents.len(),
            quarantined,
        })
    }
}

/// Splits validated documents from quarantined ones, logging each reject.
fn validated_documents(
    results: impl Iterator<Item = Result<Document, (usize, DomainError)>>,
) -> (Vec<Document>, usize) {
    let mut documents = Vec::new();
    let mut quarantined = 0;

    for result in results {
        match result {
            Ok(doc) => documents.push(doc),
            Err((index, e)) => {
                warn!(record = index, error = %e, "record quarantined");
                quarantined += 1;
            }
        }
    }

    (documents, quarantined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Embedding;
    use crate::infrastructure::InMemoryVectorIndex;
    use async_trait::async_trait;

    struct UnitEmbedding;

    #[async_trait]
    impl EmbeddingService for UnitEmbedding {
        async fn embed(&self, _text: &str) -> Result<Embedding, DomainError> {
            Ok(Embedding::new(vec![1.0, 0.0]))
        }

        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
            Ok(texts.iter().map(|_| Embedding::new(vec![1.0, 0.0])).collect())
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    fn faq(question: &str, answer: &str) -> FaqRecord {
        FaqRecord {
            question: question.into(),
            answer: answer.into(),
            category: "general".into(),
        }
    }

    fn service() -> (IngestService, Arc<InMemoryVectorIndex>, Arc<InMemoryVectorIndex>) {
        let faq_index = Arc::new(InMemoryVectorIndex::new("faq"));
        let trip_index = Arc::new(InMemoryVectorIndex::new("trips"));
        let service = IngestService::new(
            Arc::new(UnitEmbedding),
            faq_index.clone(),
            trip_index.clone(),
        );
        (service, faq_index, trip_index)
    }

    #[tokio::test]
    async fn test_ingest_is_idempotent_per_id() {
        let (service, faq_index, _) = service();
        let records = vec![faq("q1", "a1"), faq("q2", "a2")];

        let first = service.ingest_faq(&records).await.unwrap();
        let second = service.ingest_faq(&records).await.unwrap();

        assert_eq!(first.ingested, 2);
        assert_eq!(second.ingested, 2);
        assert_eq!(faq_index.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_malformed_records_are_quarantined_not_fatal() {
        let (service, faq_index, _) = service();
        let records = vec![faq("q1", "a1"), faq("", "a2"), faq("q3", "")];

        let report = service.ingest_faq(&records).await.unwrap();

        assert_eq!(report.ingested, 1);
        assert_eq!(report.quarantined, 2);
        assert_eq!(faq_index.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_trip_ingest_populates_trip_collection() {
        let (service, _, trip_index) = service();
        let records = vec![TripRecord {
            country: "Italy".into(),
            city: "Rome".into(),
            start_date: "2025-06-01".into(),
            count_of_days: 7,
            cost_in_eur: 1200.0,
            extra_activities: vec!["museum pass".into()],
            trip_details: "A week in Rome.".into(),
        }];

        let report = service.ingest_trips(&records).await.unwrap();
        assert_eq!(report.ingested, 1);
        assert_eq!(trip_index.count().await.unwrap(), 1);
    }
}
