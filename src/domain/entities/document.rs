use serde::{Deserialize, Serialize};

use crate::domain::entities::records::{FaqRecord, TripRecord};

/// A unit of retrievable text plus the typed record it was built from.
///
/// Ids are stable within a collection (`faq_<i>` / `trip_<i>`); upserting the
/// same id replaces the previous document, it never duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn from_faq(index: usize, record: FaqRecord) -> Self {
        Self {
            id: format!("faq_{index}"),
            text: record.document_text(),
            metadata: DocumentMetadata::Faq(record),
        }
    }

    pub fn from_trip(index: usize, record: TripRecord) -> Self {
        Self {
            id: format!("trip_{index}"),
            text: record.document_text(),
            metadata: DocumentMetadata::Trip(record),
        }
    }
}

/// Per-collection metadata schema. One variant per collection; the two
/// collections never share documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentMetadata {
    Faq(FaqRecord),
    Trip(TripRecord),
}

/// A retrieved document with its similarity distance. Lower distance means
/// more similar; similarity queries return candidates in ascending distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub document: Document,
    pub distance: f32,
}

/// A reranked document with its cross-encoder relevance score. Lives only
/// within one pipeline invocation.
#[derive(Debug, Clone)]
pub struct RankedDocument {
    pub document: Document,
    pub score: f32,
}

/// The output of one dual-collection retrieval: top candidates per source,
/// each ordered by ascending distance.
#[derive(Debug, Clone, Default)]
pub struct RetrievedSet {
    pub faq: Vec<Candidate>,
    pub trips: Vec<Candidate>,
}

impl RetrievedSet {
    /// Concatenation of both sources, FAQ first. No cross-collection dedup:
    /// the collections hold disjoint entity types.
    pub fn merged(&self) -> Vec<Document> {
        self.faq
            .iter()
            .chain(self.trips.iter())
            .map(|c| c.document.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.faq.is_empty() && self.trips.is_empty()
    }
}
