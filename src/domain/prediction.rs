// ============================================================
// Layer 3 — PredictionResult Domain Type
// ============================================================
// The (label, probability) pair a classifier produces for one
// record. The label is derived from the probability exactly once,
// inside the classifier, using DECISION_THRESHOLD. Nothing
// downstream re-thresholds: formatters read `label` as-is.

use serde::Serialize;

/// Positive-class probability at or above which the label is Diabetic.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Discrete classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiabetesLabel {
    NonDiabetic,
    Diabetic,
}

impl DiabetesLabel {
    /// 0/1 encoding used by the trained model
    pub fn as_u8(&self) -> u8 {
        match self {
            DiabetesLabel::NonDiabetic => 0,
            DiabetesLabel::Diabetic    => 1,
        }
    }
}

/// Outcome of a single classifier call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label:       DiabetesLabel,
    /// Positive-class probability in [0, 1]
    pub probability: f64,
}

impl PredictionResult {
    /// Build a result from a positive-class probability, applying the
    /// fixed decision threshold. Classifiers call this so label and
    /// probability always come from the same score.
    pub fn from_probability(probability: f64) -> Self {
        let label = if probability >= DECISION_THRESHOLD {
            DiabetesLabel::Diabetic
        } else {
            DiabetesLabel::NonDiabetic
        };
        Self { label, probability }
    }

    /// Probability as a percentage in [0, 100]
    pub fn percent(&self) -> f64 {
        self.probability * 100.0
    }
}
