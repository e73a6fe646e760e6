// ============================================================
// Layer 3 — ModelArtifact
// ============================================================
// A loaded preprocessor + classifier pair plus the metadata that
// says which schema it was fit for. Immutable after construction:
// it is built whole (both halves usable) or not at all.

use std::fmt;
use std::sync::Arc;

use crate::domain::feature_record::SchemaKind;
use crate::domain::traits::{Classifier, Preprocessor};

pub struct ModelArtifact {
    schema:        SchemaKind,
    model_version: String,
    preprocessor:  Arc<dyn Preprocessor>,
    classifier:    Arc<dyn Classifier>,
}

impl ModelArtifact {
    pub fn new(
        schema:        SchemaKind,
        model_version: impl Into<String>,
        preprocessor:  Arc<dyn Preprocessor>,
        classifier:    Arc<dyn Classifier>,
    ) -> Self {
        Self {
            schema,
            model_version: model_version.into(),
            preprocessor,
            classifier,
        }
    }

    pub fn schema(&self) -> SchemaKind {
        self.schema
    }

    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    pub fn preprocessor(&self) -> &dyn Preprocessor {
        self.preprocessor.as_ref()
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }
}

impl fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("schema", &self.schema)
            .field("model_version", &self.model_version)
            .field("columns", &self.preprocessor.columns())
            .field("n_features", &self.classifier.n_features())
            .finish()
    }
}
