// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All burn-specific code lives here. Other layers see only the
// Classifier trait and the InferenceEngine.
//
//   model.rs      — logistic regression as a burn Module
//                   (Linear(n, 1) + sigmoid); the shape the
//                   artifact weights are recorded in
//
//   classifier.rs — BurnClassifier: the lock-free, shareable
//                   Classifier built from a loaded module
//
//   inferencer.rs — InferenceEngine: transform → predict for
//                   one record against one artifact
//
// Inference runs on the NdArray (CPU) backend: requests are one
// row each and the process must serve without a GPU.

/// Logistic regression module and config
pub mod model;

/// Burn-backed Classifier implementation
pub mod classifier;

/// Stateless inference engine
pub mod inferencer;
