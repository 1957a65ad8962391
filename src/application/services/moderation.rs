use std::sync::Arc;

use tracing::{instrument, warn};

use crate::domain::{ports::ToxicityModel, ToxicityDecision, ToxicityVerdict};

/// Moderation gate in front of the pipeline.
///
/// Fail-open by contract: a gate built without a model (the classifier did
/// not load) or whose model errors at call time reports `Unavailable`
/// instead of failing the turn. The engine decides what `Unknown` means.
pub struct ToxicityGate {
    model: Option<Arc<dyn ToxicityModel>>,
    threshold: f32,
}

impl ToxicityGate {
    pub fn new(model: Arc<dyn ToxicityModel>, threshold: f32) -> Self {
        Self {
            model: Some(model),
            threshold,
        }
    }

    /// A permanently disabled gate; every classification is `Unavailable`.
    pub fn disabled(threshold: f32) -> Self {
        Self {
            model: None,
            threshold,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    #[instrument(skip(self, text), fields(enabled = self.is_enabled()))]
    pub async fn classify(&self, text: &str) -> ToxicityVerdict {
        let Some(model) = &self.model else {
            return ToxicityVerdict::Unavailable;
        };

        match model.classify(text).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(error = %e, "toxicity model failed, treating verdict as unavailable");
                ToxicityVerdict::Unavailable
            }
        }
    }

    /// Batch variant. One model error fails the whole batch: every verdict
    /// becomes `Unavailable`, order and length preserved.
    pub async fn classify_batch(&self, texts: &[&str]) -> Vec<ToxicityVerdict> {
        let Some(model) = &self.model else {
            return vec![ToxicityVerdict::Unavailable; texts.len()];
        };

        match model.classify_batch(texts).await {
            Ok(verdicts) => verdicts,
            Err(e) => {
                warn!(error = %e, "toxicity batch failed, treating all verdicts as unavailable");
                vec![ToxicityVerdict::Unavailable; texts.len()]
            }
        }
    }

    pub async fn check(&self, text: &str) -> ToxicityDecision {
        self.classify(text).await.decide(self.threshold)
    }
}
