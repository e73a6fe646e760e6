// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between raw front-end input and the numeric vector
// the classifier consumes:
//
//   raw JSON / form strings
//       │
//       ▼
//   RequestSchema      → validates, coerces, orders fields
//       │
//       ▼
//   FeatureRecord      (Layer 3)
//       │
//       ▼
//   ColumnTransformer  → one-hot / standardise / passthrough
//       │
//       ▼
//   Vec<f32>           → handed to the classifier (Layer 5)
//
// Each step is independently testable without a model on disk.

/// Declared request fields, coercion and bounds policy
pub mod schema;

/// Fitted column transformer (the artifact's preprocessor half)
pub mod preprocessor;
