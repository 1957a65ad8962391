use tracing::{info, instrument, warn};

use crate::application::services::context::assemble_context;
use crate::application::services::generator::AnswerGenerator;
use crate::application::services::moderation::ToxicityGate;
use crate::application::services::reranker::Reranker;
use crate::application::services::retriever::Retriever;
use crate::domain::{DomainError, ToxicityDecision};

/// The result of one processed turn. `context` is the assembled block that
/// grounded the answer, kept for introspection.
#[derive(Debug, Clone)]
pub struct TurnReply {
    pub answer: String,
    pub context: String,
    pub rejected: bool,
}

/// Per-turn orchestrator: gate, retrieve, rerank, assemble, generate.
///
/// Holds no cross-turn state; every call is independent. Conversational
/// continuity is the session store's business, not the engine's.
pub struct BotEngine {
    gate: ToxicityGate,
    retriever: Retriever,
    reranker: Reranker,
    generator: AnswerGenerator,
    safety_message: String,
}

impl BotEngine {
    pub fn new(
        gate: ToxicityGate,
        retriever: Retriever,
        reranker: Reranker,
        generator: AnswerGenerator,
        safety_message: impl Into<String>,
    ) -> Self {
        Self {
            gate,
            retriever,
            reranker,
            generator,
            safety_message: safety_message.into(),
        }
    }

    #[instrument(skip_all)]
    pub async fn process_user_input(&self, input: &str) -> Result<TurnReply, DomainError> {
        let question = input.trim();
        if question.is_empty() {
            return Err(DomainError::validation("user input must not be empty"));
        }

        match self.gate.check(question).await {
            ToxicityDecision::Toxic => {
                info!("input rejected by toxicity gate");
                return Ok(TurnReply {
                    answer: self.safety_message.clone(),
                    context: String::new(),
                    rejected: true,
                });
            }
            ToxicityDecision::Unknown => {
                warn!("toxicity verdict unknown, proceeding");
            }
            ToxicityDecision::NonToxic => {}
        }

        let retrieved = self.retriever.query_all(question).await?;
        let ranked = self.reranker.rerank(question, retrieved.merged()).await?;
        let context = assemble_context(&ranked);

        let answer = self
            .generator
            .generate(question, &context, &retrieved.faq, &retrieved.trips)
            .await?;

        Ok(TurnReply {
            answer,
            context,
            rejected: false,
        })
    }
}
