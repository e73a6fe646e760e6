// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Three failure families, one per stage of the pipeline:
//
//   ArtifactLoadError — the model bundle could not be loaded.
//                       Fatal to serving that variant, never to
//                       the process.
//   ValidationError   — the caller's input is malformed.
//   InferenceError    — the input passed validation but the
//                       preprocessor/classifier rejected it.
//
// ServeError wraps all three for front-ends that run the whole
// pipeline. Nothing here is retried: the input is the cause.

use thiserror::Error;

use crate::domain::feature_record::SchemaKind;

/// Failure to load a model artifact. Cloneable so a memoized failure
/// can be handed to every caller that asks for the artifact.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArtifactLoadError {
    #[error("model artifact not found at '{path}': {reason}")]
    Missing { path: String, reason: String },

    #[error("model artifact at '{path}' is corrupt: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("model artifact at '{path}' is incompatible: {reason}")]
    Incompatible { path: String, reason: String },
}

/// Rejected request input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("field '{field}' must be {expected}")]
    InvalidType { field: String, expected: String },

    #[error("field '{field}' must be a finite number")]
    NotFinite { field: String },

    #[error("field '{field}' has unknown value '{value}' (expected one of: {allowed})")]
    UnknownCategory { field: String, value: String, allowed: String },

    #[error("field '{field}' = {value} is outside [{min}, {max}]")]
    OutOfRange { field: String, value: f64, min: f64, max: f64 },
}

/// Preprocessor or classifier failure for a validated record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("record schema '{record}' does not match artifact schema '{artifact}'")]
    SchemaMismatch { record: SchemaKind, artifact: SchemaKind },

    #[error("column mismatch: preprocessor expects [{expected}], record has [{found}]")]
    ColumnMismatch { expected: String, found: String },

    #[error("column '{column}' expects a {expected} value")]
    TypeMismatch { column: String, expected: &'static str },

    #[error("column '{column}' has category '{value}' unseen at fit time")]
    UnknownCategory { column: String, value: String },

    #[error("column '{column}' = {value} is too large for the classifier")]
    FeatureOverflow { column: String, value: f64 },

    #[error("classifier expects {expected} features, got {found}")]
    WidthMismatch { expected: usize, found: usize },

    #[error("classifier backend failed: {0}")]
    Backend(String),

    #[error("classifier returned an invalid probability: {0}")]
    InvalidProbability(f64),
}

/// Any failure along normalize → predict.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServeError {
    #[error("model unavailable: {0}")]
    Unavailable(#[from] ArtifactLoadError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl ServeError {
    /// Short machine-readable kind used in error response bodies
    pub fn kind(&self) -> &'static str {
        match self {
            ServeError::Unavailable(_) => "unavailable",
            ServeError::Validation(_)  => "validation",
            ServeError::Inference(_)   => "inference",
        }
    }
}
