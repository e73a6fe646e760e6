// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Reads and writes model artifacts on disk.
//
// Artifact layout:
//   artifacts/clinical/
//     manifest.json         ← schema, version, preprocessor, classifier shape
//     classifier.mpk.gz     ← logistic regression weights (burn recorder)
//
// Loading is all-or-nothing: the manifest, the preprocessor, the
// weights and every cross-check must succeed before a
// ModelArtifact is returned. Any failure becomes one
// ArtifactLoadError (Missing / Corrupt / Incompatible).
//
// Packing converts an exported coefficient file (a "pack-spec")
// into that layout. No fitting happens here.
//
// The recorder runs at full precision so packed coefficients load
// back bit-for-bit.

use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};
use serde::{Deserialize, Serialize};

use crate::data::preprocessor::{ColumnTransformer, ColumnTransformerSpec};
use crate::data::schema::RequestSchema;
use crate::domain::artifact::ModelArtifact;
use crate::domain::error::ArtifactLoadError;
use crate::domain::feature_record::SchemaKind;
use crate::domain::traits::{Classifier, Preprocessor};
use crate::ml::classifier::{BurnClassifier, InferBackend, InferDevice};
use crate::ml::model::{LogisticRegression, LogisticRegressionConfig};

pub const FORMAT_VERSION: u32 = 1;

const MANIFEST_FILE: &str = "manifest.json";
/// Recorder appends `.mpk.gz`
const WEIGHTS_STEM: &str = "classifier";

type ArtifactRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

// ─── Manifest ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierManifest {
    LogisticRegression { n_features: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub format_version: u32,
    pub model_version:  String,
    pub schema:         SchemaKind,
    pub preprocessor:   ColumnTransformerSpec,
    pub classifier:     ClassifierManifest,
}

/// Input to `pack`: manifest fields plus exported coefficients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackSpec {
    pub model_version: String,
    pub schema:        SchemaKind,
    pub preprocessor:  ColumnTransformerSpec,
    pub coefficients:  Vec<f32>,
    pub intercept:     f32,
}

// ─── ArtifactStore ────────────────────────────────────────────────────────────

/// One artifact directory.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write an artifact from a pack-spec. Validates the spec the same
    /// way `load` would, so a packed artifact always loads.
    pub fn pack(&self, spec: &PackSpec) -> Result<Manifest> {
        let transformer = ColumnTransformer::from_spec(spec.preprocessor.clone())
            .map_err(anyhow::Error::msg)
            .context("Invalid preprocessor in pack-spec")?;
        transformer
            .check_schema(RequestSchema::for_kind(spec.schema))
            .map_err(anyhow::Error::msg)?;

        let width = transformer.output_width();
        if spec.coefficients.len() != width {
            bail!(
                "pack-spec has {} coefficients but the preprocessor produces {} features",
                spec.coefficients.len(),
                width
            );
        }
        if spec.coefficients.iter().chain([&spec.intercept]).any(|c| !c.is_finite()) {
            bail!("pack-spec coefficients must be finite");
        }

        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create artifact directory '{}'", self.dir.display()))?;

        // Weights first: a manifest only ever appears next to its weights
        let device = InferDevice::default();
        let model: LogisticRegression<InferBackend> = LogisticRegressionConfig::new(width)
            .init(&device)
            .with_coefficients(&spec.coefficients, spec.intercept, &device);
        let weights_path = self.dir.join(WEIGHTS_STEM);
        ArtifactRecorder::new()
            .record(model.into_record(), weights_path.clone())
            .with_context(|| format!("Failed to write weights to '{}'", weights_path.display()))?;

        let manifest = Manifest {
            format_version: FORMAT_VERSION,
            model_version:  spec.model_version.clone(),
            schema:         spec.schema,
            preprocessor:   transformer.spec(),
            classifier:     ClassifierManifest::LogisticRegression { n_features: width },
        };
        let manifest_path = self.dir.join(MANIFEST_FILE);
        fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)
            .with_context(|| format!("Cannot write manifest to '{}'", manifest_path.display()))?;

        tracing::info!(
            "Packed {} artifact '{}' ({} features) into '{}'",
            manifest.schema,
            manifest.model_version,
            width,
            self.dir.display()
        );
        Ok(manifest)
    }

    /// Read and check the manifest only.
    pub fn read_manifest(&self) -> Result<Manifest, ArtifactLoadError> {
        let path = self.dir.join(MANIFEST_FILE);
        let json = fs::read_to_string(&path).map_err(|e| ArtifactLoadError::Missing {
            path:   self.display(),
            reason: format!("cannot read {MANIFEST_FILE}: {e}"),
        })?;

        let manifest: Manifest = serde_json::from_str(&json).map_err(|e| ArtifactLoadError::Corrupt {
            path:   self.display(),
            reason: format!("{MANIFEST_FILE}: {e}"),
        })?;

        if manifest.format_version != FORMAT_VERSION {
            return Err(self.incompatible(format!(
                "format version {} is not supported (expected {FORMAT_VERSION})",
                manifest.format_version
            )));
        }
        Ok(manifest)
    }

    /// Load the full artifact, which must have been fit for `expected`.
    pub fn load(&self, expected: SchemaKind) -> Result<ModelArtifact, ArtifactLoadError> {
        let manifest = self.read_manifest()?;

        if manifest.schema != expected {
            return Err(self.incompatible(format!(
                "artifact was fit for the {} schema, expected {expected}",
                manifest.schema
            )));
        }

        // ── Preprocessor ──────────────────────────────────────────────────────
        let transformer = ColumnTransformer::from_spec(manifest.preprocessor.clone())
            .map_err(|reason| ArtifactLoadError::Corrupt { path: self.display(), reason })?;
        transformer
            .check_schema(RequestSchema::for_kind(expected))
            .map_err(|reason| self.incompatible(reason))?;

        // ── Classifier ────────────────────────────────────────────────────────
        let ClassifierManifest::LogisticRegression { n_features } = manifest.classifier;
        if n_features != transformer.output_width() {
            return Err(self.incompatible(format!(
                "classifier expects {n_features} features, preprocessor produces {}",
                transformer.output_width()
            )));
        }

        let weights_path = self.dir.join(WEIGHTS_STEM);
        let weights_file = weights_path.with_extension("mpk.gz");
        if !weights_file.exists() {
            return Err(ArtifactLoadError::Missing {
                path:   self.display(),
                reason: format!("weights file '{}' not found", weights_file.display()),
            });
        }

        let device = InferDevice::default();
        let model: LogisticRegression<InferBackend> =
            LogisticRegressionConfig::new(n_features).init(&device);
        let record = ArtifactRecorder::new()
            .load(weights_path, &device)
            .map_err(|e| ArtifactLoadError::Corrupt {
                path:   self.display(),
                reason: format!("cannot read weights: {e}"),
            })?;
        let model = model.load_record(record);

        let classifier = BurnClassifier::from_module(model, device)
            .map_err(|reason| self.incompatible(reason))?;
        if classifier.n_features() != n_features {
            return Err(self.incompatible(format!(
                "weights hold {} coefficients, manifest declares {n_features}",
                classifier.n_features()
            )));
        }

        tracing::info!(
            "Loaded {} artifact '{}' from '{}' ({} features)",
            manifest.schema,
            manifest.model_version,
            self.dir.display(),
            n_features
        );

        Ok(ModelArtifact::new(
            manifest.schema,
            manifest.model_version,
            Arc::new(transformer),
            Arc::new(classifier),
        ))
    }

    fn display(&self) -> String {
        self.dir.display().to_string()
    }

    fn incompatible(&self, reason: String) -> ArtifactLoadError {
        ArtifactLoadError::Incompatible { path: self.display(), reason }
    }
}

/// Read a pack-spec JSON file.
pub fn read_pack_spec(path: &Path) -> Result<PackSpec> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read pack-spec '{}'", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Invalid pack-spec '{}'", path.display()))
}
