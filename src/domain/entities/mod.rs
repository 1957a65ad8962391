mod document;
mod embedding;
mod records;
mod session;
mod verdict;

pub use document::{Candidate, Document, DocumentMetadata, RankedDocument, RetrievedSet};
pub use embedding::Embedding;
pub use records::{FaqRecord, TripRecord};
pub use session::{ChatSession, Turn, TurnRole};
pub use verdict::{ToxicityDecision, ToxicityLabel, ToxicityVerdict};
