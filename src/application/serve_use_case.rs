// ============================================================
// Layer 2 — Serve Use Case
// ============================================================
// Startup sequence:
//   1. Create one ArtifactSlot per model variant
//   2. Load both eagerly. A failure is logged once and that
//      variant answers 503; the server still starts
//   3. Wrap each slot in its ServingPipeline
//   4. Build a tokio runtime and serve until Ctrl+C / SIGTERM

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::application::formatter::FormatTarget;
use crate::application::pipeline::ServingPipeline;
use crate::data::schema::BoundsPolicy;
use crate::domain::feature_record::SchemaKind;
use crate::http::{self, AppState};
use crate::infra::artifact_slot::ArtifactSlot;
use crate::infra::config::ServeConfig;

pub struct ServeUseCase {
    config: ServeConfig,
}

impl ServeUseCase {
    pub fn new(config: ServeConfig) -> Self {
        Self { config }
    }

    /// Build the shared state. Loads both artifacts before returning.
    pub fn state(&self) -> AppState {
        let clinical = Arc::new(ArtifactSlot::new(SchemaKind::Clinical, &self.config.clinical_artifact));
        let pima     = Arc::new(ArtifactSlot::new(SchemaKind::Pima, &self.config.pima_artifact));

        // The load outcome is memoised in the slot; failures were logged there
        for slot in [&clinical, &pima] {
            if slot.get().is_err() {
                warn!(
                    "{} routes will answer 503 until restart (artifact '{}')",
                    slot.kind(),
                    slot.path().display(),
                );
            }
        }

        AppState {
            form: Arc::new(ServingPipeline::new(clinical, self.config.form_bounds, FormatTarget::Form)),
            // The pima schema declares no bounds, so its policy never fires
            api:  Arc::new(ServingPipeline::new(pima, BoundsPolicy::Advisory, FormatTarget::Api)),
        }
    }

    pub fn execute(&self) -> Result<()> {
        let state = self.state();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to start the async runtime")?;

        runtime.block_on(self.serve(state))
    }

    async fn serve(&self, state: AppState) -> Result<()> {
        let addr = self.config.socket_addr()?;
        let app  = http::router(state, self.config.static_dir.as_deref());

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind to {addr}"))?;

        info!("Listening on http://{addr} (form bounds: {})", self.config.form_bounds);
        if let Some(dir) = &self.config.static_dir {
            info!("Serving static files from '{}'", dir.display());
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        info!("Server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c    => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{clinical_pack_spec, packed, pima_pack_spec};

    #[test]
    fn test_state_loads_eagerly_and_tolerates_missing_model() {
        let tmp = tempfile::tempdir().unwrap();
        packed(&tmp.path().join("clinical"), &clinical_pack_spec());

        let config = ServeConfig {
            clinical_artifact: tmp.path().join("clinical"),
            pima_artifact:     tmp.path().join("pima"),
            ..ServeConfig::default()
        };
        let state = ServeUseCase::new(config).state();

        // Packing pima now is too late: its failed load was memoised at startup
        packed(&tmp.path().join("pima"), &pima_pack_spec());

        assert_eq!(state.form.slot().get().unwrap().model_version(), "clinical-fixture");
        assert!(state.api.slot().get().is_err());
    }
}
