use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;

use crate::domain::{ports::LlmService, Candidate, DomainError};

const PREVIEW_DOCS: usize = 2;
const PREVIEW_CHARS: usize = 200;

/// Final answer synthesis: renders the system prompt around the assembled
/// context plus short per-source previews, then issues exactly one
/// completion. No retries; the configured timeout bounds the call.
pub struct AnswerGenerator {
    llm: Arc<dyn LlmService>,
    system_template: String,
    timeout: Duration,
}

impl AnswerGenerator {
    pub fn new(llm: Arc<dyn LlmService>, system_template: impl Into<String>) -> Self {
        Self {
            llm,
            system_template: system_template.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[instrument(skip_all, fields(context_len = context.len()))]
    pub async fn generate(
        &self,
        question: &str,
        context: &str,
        faq_preview: &[Candidate],
        trip_preview: &[Candidate],
    ) -> Result<String, DomainError> {
        let system = self.render_system_prompt(context, faq_preview, trip_preview);

        tokio::time::timeout(self.timeout, self.llm.complete_with_system(&system, question))
            .await
            .map_err(|_| DomainError::timeout("answer generation timed out"))?
    }

    fn render_system_prompt(
        &self,
        context: &str,
        faq_preview: &[Candidate],
        trip_preview: &[Candidate],
    ) -> String {
        self.system_template
            .replace("{context}", context)
            .replace("{faq_preview}", &format_preview(faq_preview))
            .replace("{trip_preview}", &format_preview(trip_preview))
    }
}

/// Short plain-text rendering of the raw top candidates from one source.
fn format_preview(candidates: &[Candidate]) -> String {
    if candidates.is_empty() {
        return "(none)".to_string();
    }

    candidates
        .iter()
        .take(PREVIEW_DOCS)
        .map(|c| {
            let mut text: String = c.document.text.chars().take(PREVIEW_CHARS).collect();
            if c.document.text.chars().count() > PREVIEW_CHARS {
                text.push_str("...");
            }
            format!("- {text}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Document, DocumentMetadata, FaqRecord};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CapturingLlm {
        seen_system: Mutex<Option<String>>,
    }

    #[async_trait]
    impl LlmService for CapturingLlm {
        async fn complete_with_system(
            &self,
            system: &str,
            _prompt: &str,
        ) -> Result<String, DomainError> {
            *self.seen_system.lock().unwrap() = Some(system.to_string());
            Ok("answer".to_string())
        }
    }

    fn candidate(text: &str) -> Candidate {
        Candidate {
            document: Document {
                id: "faq_0".into(),
                text: text.into(),
                metadata: DocumentMetadata::Faq(FaqRecord {
                    question: "q".into(),
                    answer: "a".into(),
                    category: "general".into(),
                }),
            },
            distance: 0.1,
        }
    }

    #[tokio::test]
    async fn test_system_prompt_embeds_context_and_previews() {
        let llm = Arc::new(CapturingLlm {
            seen_system: Mutex::new(None),
        });
        let generator = AnswerGenerator::new(
            llm.clone(),
            "Context:\n{context}\nFAQ:\n{faq_preview}\nTrips:\n{trip_preview}",
        );

        let answer = generator
            .generate(
                "What about refunds?",
                "<Relevant Document #1>\nrefund policy\n</Relevant Document #1>\n",
                &[candidate("refund policy")],
                &[],
            )
            .await
            .unwrap();

        assert_eq!(answer, "answer");
        let system = llm.seen_system.lock().unwrap().clone().unwrap();
        assert!(system.contains("refund policy"));
        assert!(system.contains("- refund policy"));
        assert!(system.contains("Trips:\n(none)"));
    }

    #[tokio::test]
    async fn test_slow_llm_times_out() {
        struct SlowLlm;

        #[async_trait]
        impl LlmService for SlowLlm {
            async fn complete_with_system(
                &self,
                _system: &str,
                _prompt: &str,
            ) -> Result<String, DomainError> {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok("late".to_string())
            }
        }

        let generator = AnswerGenerator::new(Arc::new(SlowLlm), "{context}")
            .with_timeout(Duration::from_millis(20));

        let result = generator.generate("q", "ctx", &[], &[]).await;
        assert!(matches!(result, Err(DomainError::Timeout(_))));
    }

    #[test]
    fn test_preview_truncates_long_documents() {
        let long_text = "x".repeat(500);
        let preview = format_preview(&[candidate(&long_text)]);
        assert!(preview.ends_with("..."));
        assert!(preview.chars().count() < 230);
    }
}
