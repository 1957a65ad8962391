mod embedding;
mod llm;
mod rerank;
mod session_store;
mod toxicity;
mod vector_index;

pub use embedding::EmbeddingService;
pub use llm::LlmService;
pub use rerank::RerankModel;
pub use session_store::SessionStore;
pub use toxicity::ToxicityModel;
pub use vector_index::VectorIndex;
