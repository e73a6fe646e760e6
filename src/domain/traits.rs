// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The trained bundle is consumed as two capabilities:
//
//   Preprocessor — FeatureRecord → numeric feature vector
//   Classifier   — feature vector → label + probability
//
// Production implementations:
//   - ColumnTransformer (Layer 4) implements Preprocessor
//   - BurnClassifier    (Layer 5) implements Classifier
//
// Tests inject deterministic fakes through the same traits, so
// nothing above this layer needs a real artifact on disk.
//
// Both traits require Send + Sync: one artifact is shared by
// every concurrent request and is only ever read.

use crate::domain::error::InferenceError;
use crate::domain::feature_record::FeatureRecord;
use crate::domain::prediction::PredictionResult;

// ─── Preprocessor ─────────────────────────────────────────────────────────────
/// A fitted, stateless transform from a canonical record to the
/// numeric vector the classifier was trained on.
pub trait Preprocessor: Send + Sync {
    /// Column names in fit order. A record must present exactly
    /// these names, in this order, or `transform` fails.
    fn columns(&self) -> Vec<&str>;

    /// Length of the vector `transform` produces
    fn output_width(&self) -> usize;

    /// Turn a record into a feature vector of length `output_width()`.
    fn transform(&self, record: &FeatureRecord) -> Result<Vec<f32>, InferenceError>;
}

// ─── Classifier ───────────────────────────────────────────────────────────────
/// A fitted, stateless binary classifier.
pub trait Classifier: Send + Sync {
    /// Number of input features the classifier was fit with
    fn n_features(&self) -> usize;

    /// Score one feature vector. Label and probability come from this
    /// single call; see `PredictionResult::from_probability`.
    fn predict(&self, features: &[f32]) -> Result<PredictionResult, InferenceError>;
}
