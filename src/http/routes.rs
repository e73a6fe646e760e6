// ============================================================
// Layer 1 — HTTP Handlers
// ============================================================
// Handlers are thin: extract JSON, run the pipeline, map the
// outcome to a status code. The pipeline is synchronous and
// CPU-bound for a few microseconds, so it runs inline.
//
// Error bodies are always {"error": "...", "kind": "..."}:
//
//   malformed_body → 400   (not JSON, wrong content type)
//   validation     → 400
//   inference      → 422
//   unavailable    → 503

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::application::formatter::Presentation;
use crate::application::pipeline::{AssessResponse, ServingPipeline};
use crate::domain::error::ServeError;
use crate::http::AppState;

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ApiError {
    MalformedBody(String),
    Serve(ServeError),
}

impl From<ServeError> for ApiError {
    fn from(e: ServeError) -> Self {
        ApiError::Serve(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::MalformedBody(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::MalformedBody(msg) => (StatusCode::BAD_REQUEST, "malformed_body", msg),
            ApiError::Serve(e) => {
                let status = match &e {
                    ServeError::Validation(_)  => StatusCode::BAD_REQUEST,
                    ServeError::Inference(_)   => StatusCode::UNPROCESSABLE_ENTITY,
                    ServeError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                };
                (status, e.kind(), e.to_string())
            }
        };

        if status.is_server_error() {
            tracing::warn!("{kind}: {message}");
        } else {
            tracing::debug!("Rejected request ({kind}): {message}");
        }

        (status, Json(json!({ "error": message, "kind": kind }))).into_response()
    }
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/predict
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Presentation>, ApiError> {
    let Json(raw) = body?;
    let out = state.api.run(&raw)?;
    Ok(Json(out.presentation))
}

/// POST /api/assess
pub async fn assess(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AssessResponse>, ApiError> {
    let Json(raw) = body?;
    Ok(Json(AssessResponse::from(state.form.run(&raw)?)))
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ModelStatus {
    Ready { model_version: String },
    Unavailable { error: String },
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub version: &'static str,
    pub models:  BTreeMap<&'static str, ModelStatus>,
}

fn model_status(pipeline: &ServingPipeline) -> ModelStatus {
    match pipeline.slot().get() {
        Ok(artifact) => ModelStatus::Ready { model_version: artifact.model_version().to_string() },
        Err(e)       => ModelStatus::Unavailable { error: e.to_string() },
    }
}

/// GET /health. Always 200; per-model status is in the body.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut models = BTreeMap::new();
    for pipeline in [&state.form, &state.api] {
        models.insert(pipeline.slot().kind().as_str(), model_status(pipeline));
    }
    Json(HealthResponse { version: env!("CARGO_PKG_VERSION"), models })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request, Router};
    use tower::ServiceExt;

    use crate::application::formatter::FormatTarget;
    use crate::data::schema::BoundsPolicy;
    use crate::domain::feature_record::SchemaKind;
    use crate::http::{router, AppState};
    use crate::infra::artifact_slot::ArtifactSlot;
    use crate::testing::{clinical_pack_spec, packed, pima_pack_spec};

    use super::*;

    /// Router over freshly packed fixtures. The pima artifact is left
    /// out when `with_pima` is false.
    fn app(tmp: &std::path::Path, with_pima: bool) -> Router {
        packed(&tmp.join("clinical"), &clinical_pack_spec());
        if with_pima {
            packed(&tmp.join("pima"), &pima_pack_spec());
        }
        let clinical = Arc::new(ArtifactSlot::new(SchemaKind::Clinical, tmp.join("clinical")));
        let pima     = Arc::new(ArtifactSlot::new(SchemaKind::Pima, tmp.join("pima")));
        let state = AppState {
            form: Arc::new(ServingPipeline::new(clinical, BoundsPolicy::Strict, FormatTarget::Form)),
            api:  Arc::new(ServingPipeline::new(pima, BoundsPolicy::Advisory, FormatTarget::Api)),
        };
        router(state, None)
    }

    async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    const PIMA_BODY: &str = r#"{
        "Pregnancy": 6, "Plasma": 148, "BloodPressure": 72, "Skin": 35,
        "Test": 0, "BMI": 33.6, "DBF": 0.627, "Age": 50
    }"#;

    #[tokio::test]
    async fn test_predict_returns_risk_term_only() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, body) = post_json(app(tmp.path(), true), "/api/predict", PIMA_BODY).await;
        assert_eq!(status, StatusCode::OK);
        let obj = body.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        let term = obj["risk_score"].as_str().unwrap();
        assert!(term == "Diabetic" || term == "Non Diabetic");
    }

    #[tokio::test]
    async fn test_predict_accepts_string_values() {
        let tmp = tempfile::tempdir().unwrap();
        let body = r#"{
            "Pregnancy": "6", "Plasma": "148", "BloodPressure": "72", "Skin": "35",
            "Test": "0", "BMI": "33.6", "DBF": "0.627", "Age": "50"
        }"#;
        let (status, _) = post_json(app(tmp.path(), true), "/api/predict", body).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_predict_missing_field_is_400() {
        let tmp = tempfile::tempdir().unwrap();
        let body = r#"{ "Pregnancy": 1, "Plasma": 85, "BloodPressure": 66,
                        "Skin": 29, "Test": 0, "DBF": 0.351, "Age": 31 }"#;
        let (status, body) = post_json(app(tmp.path(), true), "/api/predict", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
        assert!(body["error"].as_str().unwrap().contains("BMI"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, body) = post_json(app(tmp.path(), true), "/api/predict", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "malformed_body");
    }

    #[tokio::test]
    async fn test_non_object_body_is_validation_error() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, body) = post_json(app(tmp.path(), true), "/api/predict", "[1, 2, 3]").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn test_missing_artifact_is_503() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, body) = post_json(app(tmp.path(), false), "/api/predict", PIMA_BODY).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["kind"], "unavailable");
    }

    #[tokio::test]
    async fn test_assess_form_report() {
        let tmp = tempfile::tempdir().unwrap();
        let body = r#"{
            "gender": "male", "age": 25, "hypertension": "Yes", "heart_disease": "No",
            "smoking_history": "not current", "bmi": 25.0,
            "HbA1c_level": 5.7, "blood_glucose_level": 100.0,
            "notes": "ignored"
        }"#;
        let (status, body) = post_json(app(tmp.path(), true), "/api/assess", body).await;
        assert_eq!(status, StatusCode::OK);
        let label = body["label"].as_str().unwrap();
        assert!(label == "likely diabetic" || label == "likely non-diabetic");
        assert!(body["percent"].as_str().unwrap().ends_with('%'));
        assert_eq!(body["advisories"], json!([]));
    }

    #[tokio::test]
    async fn test_assess_strict_bounds() {
        let tmp = tempfile::tempdir().unwrap();
        let body = r#"{
            "gender": "male", "age": -1, "hypertension": "No", "heart_disease": "No",
            "smoking_history": "never", "bmi": 25.0,
            "HbA1c_level": 5.7, "blood_glucose_level": 100.0
        }"#;
        let (status, body) = post_json(app(tmp.path(), true), "/api/assess", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn test_health_reports_each_model() {
        let tmp = tempfile::tempdir().unwrap();
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app(tmp.path(), false).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["models"]["clinical"]["status"], "ready");
        assert_eq!(body["models"]["clinical"]["model_version"], "clinical-fixture");
        assert_eq!(body["models"]["pima"]["status"], "unavailable");
    }
}
