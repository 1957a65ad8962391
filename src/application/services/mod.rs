mod context;
mod engine;
mod generator;
mod ingest;
mod moderation;
mod reranker;
mod retriever;

pub use context::{assemble_context, NO_CONTEXT_SENTINEL};
pub use engine::{BotEngine, TurnReply};
pub use generator::AnswerGenerator;
pub use ingest::{IngestReport, IngestService};
pub use moderation::ToxicityGate;
pub use reranker::Reranker;
pub use retriever::Retriever;
