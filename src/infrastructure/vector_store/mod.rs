pub mod in_memory;
pub mod qdrant;

pub use in_memory::InMemoryVectorIndex;
pub use qdrant::QdrantVectorIndex;
