use serde::{Deserialize, Serialize};

/// Label emitted by the toxicity classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToxicityLabel {
    Toxic,
    NonToxic,
}

/// Outcome of one classification. `Unavailable` replaces the old
/// caught-exception path: a gate whose model never loaded, or whose model
/// errored mid-call, reports it explicitly and callers pattern-match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ToxicityVerdict {
    Scored { label: ToxicityLabel, score: f32 },
    Unavailable,
}

/// What the pipeline does with a verdict at a given confidence threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToxicityDecision {
    Toxic,
    NonToxic,
    Unknown,
}

impl ToxicityVerdict {
    pub fn scored(label: ToxicityLabel, score: f32) -> Self {
        Self::Scored { label, score }
    }

    /// Maps the raw verdict onto an actionable decision.
    ///
    /// A toxic label only counts with score >= threshold. A non-toxic label
    /// counts when the model is confident either way (score >= threshold, or
    /// score < 1 - threshold); the band in between is `Unknown` and the
    /// caller picks the default.
    pub fn decide(&self, threshold: f32) -> ToxicityDecision {
        match *self {
            Self::Scored {
                label: ToxicityLabel::Toxic,
                score,
            } if score >= threshold => ToxicityDecision::Toxic,
            Self::Scored {
                label: ToxicityLabel::Toxic,
                ..
            } => ToxicityDecision::Unknown,
            Self::Scored {
                label: ToxicityLabel::NonToxic,
                score,
            } if score >= threshold || score < 1.0 - threshold => ToxicityDecision::NonToxic,
            Self::Scored {
                label: ToxicityLabel::NonToxic,
                ..
            } => ToxicityDecision::Unknown,
            Self::Unavailable => ToxicityDecision::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confident_toxic_is_toxic() {
        let verdict = ToxicityVerdict::scored(ToxicityLabel::Toxic, 0.95);
        assert_eq!(verdict.decide(0.8), ToxicityDecision::Toxic);
    }

    #[test]
    fn test_confident_non_toxic_is_non_toxic() {
        let verdict = ToxicityVerdict::scored(ToxicityLabel::NonToxic, 0.95);
        assert_eq!(verdict.decide(0.8), ToxicityDecision::NonToxic);
    }

    #[test]
    fn test_low_confidence_toxic_is_unknown() {
        let verdict = ToxicityVerdict::scored(ToxicityLabel::Toxic, 0.5);
        assert_eq!(verdict.decide(0.8), ToxicityDecision::Unknown);
    }

    #[test]
    fn test_non_toxic_band_is_unknown() {
        let verdict = ToxicityVerdict::scored(ToxicityLabel::NonToxic, 0.5);
        assert_eq!(verdict.decide(0.8), ToxicityDecision::Unknown);
    }

    #[test]
    fn test_weak_non_toxic_score_is_non_toxic() {
        let verdict = ToxicityVerdict::scored(ToxicityLabel::NonToxic, 0.1);
        assert_eq!(verdict.decide(0.8), ToxicityDecision::NonToxic);
    }

    #[test]
    fn test_unavailable_is_unknown() {
        assert_eq!(
            ToxicityVerdict::Unavailable.decide(0.8),
            ToxicityDecision::Unknown
        );
    }
}
