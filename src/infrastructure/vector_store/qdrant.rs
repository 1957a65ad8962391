use async_trait::async_trait;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};

use crate::domain::{
    ports::VectorIndex, Candidate, Document, DocumentMetadata, DomainError, Embedding,
};

/// Persistent collection backend. The collection is created on first use
/// with cosine distance, matching the in-memory backend's metric.
pub struct QdrantVectorIndex {
    client: Qdrant,
    collection: String,
    dimension: usize,
}

impl QdrantVectorIndex {
    pub async fn new(url: &str, collection: &str, dimension: usize) -> Result<Self, DomainError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| DomainError::external(e.to_string()))?;

        let index = Self {
            client,
            collection: collection.to_string(),
            dimension,
        };

        index.ensure_collection().await?;

        Ok(index)
    }

    async fn ensure_collection(&self) -> Result<(), DomainError> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        let exists = collections
            .collections
            .iter()
            .any(|c| c.name == self.collection);

        if !exists {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection).vectors_config(
                        VectorParamsBuilder::new(self.dimension as u64, Distance::Cosine),
                    ),
                )
                .await
                .map_err(|e| DomainError::external(e.to_string()))?;
        }

        Ok(())
    }

    /// Stable point id for a document id like `faq_3`. FNV-1a keeps the
    /// mapping identical across restarts, which is what makes re-ingestion
    /// an upsert instead of a duplicate.
    fn point_id(document_id: &str) -> u64 {
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in document_id.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x100000001b3);
        }
        hash
    }
}

#[async_trait]
impl VectorIndex for QdrantVectorIndex {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn upsert(
        &self,
        document: &Document,
        embedding: &Embedding,
    ) -> Result<(), DomainError> {
        let metadata = serde_json::to_string(&document.metadata)
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let payload: Payload = serde_json::json!({
            "document_id": document.id,
            "text": document.text,
            "metadata": metadata,
        })
        .try_into()
        .map_err(|_| DomainError::internal("Failed to create payload"))?;

        let point = PointStruct::new(
            Self::point_id(&document.id),
            embedding.as_slice().to_vec(),
            payload,
        );

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]))
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        Ok(())
    }

    async fn query(&self, embedding: &Embedding, n: usize) -> Result<Vec<Candidate>, DomainError> {
        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(
                    &self.collection,
                    embedding.as_slice().to_vec(),
                    n as u64,
                )
                .with_payload(true),
            )
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        let candidates: Vec<Candidate> = results
            .result
            .into_iter()
            .filter_map(|point| {
                let payload = point.payload;

                let id = payload.get("document_id")?.as_str()?.to_string();
                let text = payload.get("text")?.as_str()?.to_string();
                let metadata: DocumentMetadata =
                    serde_json::from_str(payload.get("metadata")?.as_str()?).ok()?;

                Some(Candidate {
                    document: Document { id, text, metadata },
                    // Qdrant reports cosine similarity; the pipeline orders
                    // by distance.
                    distance: 1.0 - point.score,
                })
            })
            .collect();

        Ok(candidates)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let info = self
            .client
            .collection_info(&self.collection)
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        Ok(info
            .result
            .and_then(|r| r.points_count)
            .unwrap_or_default() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_ids_are_stable_and_distinct() {
        assert_eq!(
            QdrantVectorIndex::point_id("faq_0"),
            QdrantVectorIndex::point_id("faq_0")
        );
        assert_ne!(
            QdrantVectorIndex::point_id("faq_0"),
            QdrantVectorIndex::point_id("faq_1")
        );
        assert_ne!(
            QdrantVectorIndex::point_id("faq_0"),
            QdrantVectorIndex::point_id("trip_0")
        );
    }
}
