// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// The vocabulary of the serving core: what a request IS once it
// has been validated, what a prediction IS, and what an artifact
// must be able to do.
//
// Rules for this layer:
//   - NO burn types here (those live in Layer 5)
//   - NO file I/O or HTTP
//   - Only plain structs, enums, traits and the error taxonomy
//
// Everything above this layer (schema, engine, formatter, front-
// ends) talks in these types, so the ML backend can be swapped or
// faked without touching them.

/// Canonical, schema-validated request record
pub mod feature_record;

/// Label + probability produced by a classifier
pub mod prediction;

/// The loaded preprocessor + classifier bundle
pub mod artifact;

/// Capability traits implemented by Layer 4 and Layer 5
pub mod traits;

/// Error taxonomy shared by every layer
pub mod error;
