pub mod config;
pub mod embedding;
pub mod llm;
pub mod rerank;
pub mod session_store;
pub mod tools;
pub mod toxicity;
pub mod vector_store;

pub use config::{AppConfig, Config, PromptsConfig};
pub use embedding::OpenAiEmbedding;
pub use llm::{build_llm, AnthropicChat, OpenAiChat};
pub use rerank::HttpCrossEncoder;
pub use session_store::{InMemorySessionStore, RedisSessionStore};
pub use tools::{TripCatalog, TripLookupTool};
pub use toxicity::HfToxicityClassifier;
pub use vector_store::{InMemoryVectorIndex, QdrantVectorIndex};
