// ============================================================
// Layer 2 — Serving Pipeline
// ============================================================
// One pipeline per front-end:
//
//   raw JSON ─► RequestSchema.normalize ─► InferenceEngine.predict
//            ─► ResultFormatter.format ─► Presentation
//
// The request schema is taken from the slot's kind, so a form
// pipeline can only ever run clinical records against the
// clinical artifact (and likewise for pima).
//
// The artifact is resolved before the input is looked at: while
// the model is unavailable every request gets the same answer.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::application::formatter::{FormatTarget, Presentation, ResultFormatter};
use crate::data::schema::{BoundsAdvisory, BoundsPolicy, RequestSchema};
use crate::domain::error::ServeError;
use crate::domain::prediction::PredictionResult;
use crate::infra::artifact_slot::ArtifactSlot;
use crate::ml::inferencer::InferenceEngine;

/// Everything a front-end needs from one request.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub presentation: Presentation,
    pub advisories:   Vec<BoundsAdvisory>,
    pub result:       PredictionResult,
}

/// Form output as the HTTP route and `assess --json` print it:
/// the report's fields plus any bounds advisories.
#[derive(Debug, Serialize)]
pub struct AssessResponse {
    #[serde(flatten)]
    pub report:     Presentation,
    pub advisories: Vec<BoundsAdvisory>,
}

impl From<PipelineOutput> for AssessResponse {
    fn from(out: PipelineOutput) -> Self {
        Self { report: out.presentation, advisories: out.advisories }
    }
}

pub struct ServingPipeline {
    schema:    &'static RequestSchema,
    slot:      Arc<ArtifactSlot>,
    policy:    BoundsPolicy,
    target:    FormatTarget,
    engine:    InferenceEngine,
    formatter: ResultFormatter,
}

impl ServingPipeline {
    pub fn new(slot: Arc<ArtifactSlot>, policy: BoundsPolicy, target: FormatTarget) -> Self {
        Self {
            schema: RequestSchema::for_kind(slot.kind()),
            slot,
            policy,
            target,
            engine: InferenceEngine::new(),
            formatter: ResultFormatter,
        }
    }

    pub fn slot(&self) -> &ArtifactSlot {
        &self.slot
    }

    /// Run one request end to end.
    pub fn run(&self, raw: &Value) -> Result<PipelineOutput, ServeError> {
        let artifact = self.slot.get()?;

        let normalized = self.schema.normalize_value(raw, self.policy)?;
        for advisory in &normalized.advisories {
            tracing::warn!(
                "{} = {} is outside its declared bounds; predicting anyway",
                advisory.field,
                advisory.value,
            );
        }

        let result = self.engine.predict(&normalized.record, &artifact)?;

        Ok(PipelineOutput {
            presentation: self.formatter.format(&result, self.target),
            advisories:   normalized.advisories,
            result,
        })
    }
}
