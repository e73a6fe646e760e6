// ============================================================
// Layer 6 — Artifact Slot
// ============================================================
// Process-wide holder for ONE model artifact.
//
// Lifecycle:
//   - created empty at startup with a path and expected schema
//   - the first `get()` loads from disk; concurrent first callers
//     block on the same initialisation, so the load runs once
//   - the outcome (artifact OR error) is memoised; every later
//     `get()` is a lock-free read of the same value
//   - never reset, never mutated; dropped at process exit
//
// Memoising the failure too means a broken artifact is reported
// once in the log and then surfaces as the same "unavailable"
// error on every request, instead of re-reading the disk per call.
//
// The slot is passed explicitly (router state, pipeline field).
// There is no global.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::domain::artifact::ModelArtifact;
use crate::domain::error::ArtifactLoadError;
use crate::domain::feature_record::SchemaKind;
use crate::infra::artifact_store::ArtifactStore;

type LoadOutcome = Result<Arc<ModelArtifact>, ArtifactLoadError>;

pub struct ArtifactSlot {
    kind: SchemaKind,
    path: PathBuf,
    cell: OnceCell<LoadOutcome>,
}

impl ArtifactSlot {
    /// An empty slot that will load from `path` on first use.
    pub fn new(kind: SchemaKind, path: impl Into<PathBuf>) -> Self {
        Self { kind, path: path.into(), cell: OnceCell::new() }
    }

    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The artifact, loading it on first call. Every call returns the
    /// same `Arc` (or the same error).
    pub fn get(&self) -> LoadOutcome {
        self.cell
            .get_or_init(|| {
                let outcome = ArtifactStore::new(&self.path).load(self.kind).map(Arc::new);
                if let Err(e) = &outcome {
                    tracing::error!("{} model unavailable: {e}", self.kind);
                }
                outcome
            })
            .clone()
    }
}
