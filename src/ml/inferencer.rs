// ============================================================
// Layer 5 — Inference Engine
// ============================================================
// record → preprocessor.transform → classifier.predict → result
//
// The engine holds no state. It only reads the artifact it is
// handed, so one engine (or many) can serve any number of
// concurrent requests against the same shared artifact.
//
// Failures are terminal for the request: there is nothing to
// roll back and retrying the same input gives the same error.

use std::time::Instant;

use crate::domain::artifact::ModelArtifact;
use crate::domain::error::InferenceError;
use crate::domain::feature_record::FeatureRecord;
use crate::domain::prediction::PredictionResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct InferenceEngine;

impl InferenceEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn predict(
        &self,
        record:   &FeatureRecord,
        artifact: &ModelArtifact,
    ) -> Result<PredictionResult, InferenceError> {
        let started = Instant::now();

        if record.schema() != artifact.schema() {
            return Err(InferenceError::SchemaMismatch {
                record:   record.schema(),
                artifact: artifact.schema(),
            });
        }

        // Step 1: column-aligned transform
        let features = artifact.preprocessor().transform(record)?;

        let classifier = artifact.classifier();
        if features.len() != classifier.n_features() {
            return Err(InferenceError::WidthMismatch {
                expected: classifier.n_features(),
                found:    features.len(),
            });
        }

        // Step 2: one classifier call yields both label and probability
        let result = classifier.predict(&features)?;

        if !result.probability.is_finite() || !(0.0..=1.0).contains(&result.probability) {
            return Err(InferenceError::InvalidProbability(result.probability));
        }

        tracing::debug!(
            "Predicted label {} p={:.4} ({} schema, model {}) in {:?}",
            result.label.as_u8(),
            result.probability,
            artifact.schema(),
            artifact.model_version(),
            started.elapsed(),
        );

        Ok(result)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use rand::Rng;
    use serde_json::json;

    use crate::data::preprocessor::{ColumnEncoding, ColumnSpec, ColumnTransformer, ColumnTransformerSpec};
    use crate::data::schema::{BoundsPolicy, CLINICAL, PIMA, SMOKING_HISTORY};
    use crate::domain::feature_record::SchemaKind;
    use crate::domain::prediction::DiabetesLabel;
    use crate::domain::traits::{Classifier, Preprocessor};
    use crate::ml::classifier::BurnClassifier;

    /// Returns a fixed probability and counts calls.
    struct FixedClassifier {
        n:           usize,
        probability: f64,
        calls:       AtomicUsize,
    }

    impl Classifier for FixedClassifier {
        fn n_features(&self) -> usize {
            self.n
        }

        fn predict(&self, _features: &[f32]) -> Result<PredictionResult, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(PredictionResult::from_probability(self.probability))
        }
    }

    fn pima_transformer() -> ColumnTransformer {
        ColumnTransformer::from_spec(ColumnTransformerSpec {
            columns: PIMA
                .field_names()
                .into_iter()
                .map(|n| ColumnSpec { name: n.to_string(), encoding: ColumnEncoding::Passthrough })
                .collect(),
        })
        .unwrap()
    }

    fn pima_record() -> FeatureRecord {
        PIMA.normalize_value(
            &json!({
                "Pregnancy": 2, "Plasma": 120, "BloodPressure": 70, "Skin": 20,
                "Test": 80, "BMI": 28.5, "DBF": 0.5, "Age": 33
            }),
            BoundsPolicy::Advisory,
        )
        .unwrap()
        .record
    }

    fn fixed_artifact(probability: f64) -> (ModelArtifact, Arc<FixedClassifier>) {
        let classifier = Arc::new(FixedClassifier { n: 8, probability, calls: AtomicUsize::new(0) });
        let artifact = ModelArtifact::new(
            SchemaKind::Pima,
            "test",
            Arc::new(pima_transformer()),
            classifier.clone(),
        );
        (artifact, classifier)
    }

    #[test]
    fn test_classifier_called_once() {
        let (artifact, classifier) = fixed_artifact(0.8);
        let r = InferenceEngine::new().predict(&pima_record(), &artifact).unwrap();
        assert_eq!(r.label, DiabetesLabel::Diabetic);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let (artifact, classifier) = fixed_artifact(0.8);
        let record = CLINICAL
            .normalize_value(
                &json!({
                    "gender": "male", "age": 25, "bmi": 25.0, "hypertension": "No",
                    "heart_disease": "No", "smoking_history": "never",
                    "HbA1c_level": 5.7, "blood_glucose_level": 100.0
                }),
                BoundsPolicy::Strict,
            )
            .unwrap()
            .record;
        let err = InferenceEngine::new().predict(&record, &artifact).unwrap_err();
        assert!(matches!(err, InferenceError::SchemaMismatch { .. }));
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let (artifact, _) = fixed_artifact(1.5);
        let err = InferenceEngine::new().predict(&pima_record(), &artifact).unwrap_err();
        assert_eq!(err, InferenceError::InvalidProbability(1.5));
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let classifier = Arc::new(FixedClassifier { n: 5, probability: 0.1, calls: AtomicUsize::new(0) });
        let artifact = ModelArtifact::new(SchemaKind::Pima, "test", Arc::new(pima_transformer()), classifier);
        let err = InferenceEngine::new().predict(&pima_record(), &artifact).unwrap_err();
        assert_eq!(err, InferenceError::WidthMismatch { expected: 5, found: 8 });
    }

    fn one_hot(xs: &[&str]) -> ColumnEncoding {
        ColumnEncoding::OneHot { categories: xs.iter().map(|s| s.to_string()).collect() }
    }

    /// Random valid clinical inputs through the real transformer and
    /// burn classifier: threshold invariant and determinism hold.
    #[test]
    fn test_threshold_invariant_on_random_records() {
        let transformer = ColumnTransformer::from_spec(ColumnTransformerSpec {
            columns: vec![
                ColumnSpec { name: "gender".into(), encoding: one_hot(&["male", "female", "other"]) },
                ColumnSpec { name: "age".into(), encoding: ColumnEncoding::Standardize { mean: 41.9, scale: 22.5 } },
                ColumnSpec { name: "hypertension".into(), encoding: ColumnEncoding::Passthrough },
                ColumnSpec { name: "heart_disease".into(), encoding: ColumnEncoding::Passthrough },
                ColumnSpec { name: "smoking_history".into(), encoding: one_hot(SMOKING_HISTORY) },
                ColumnSpec { name: "bmi".into(), encoding: ColumnEncoding::Standardize { mean: 27.3, scale: 6.6 } },
                ColumnSpec { name: "HbA1c_level".into(), encoding: ColumnEncoding::Standardize { mean: 5.5, scale: 1.1 } },
                ColumnSpec { name: "blood_glucose_level".into(), encoding: ColumnEncoding::Standardize { mean: 138.0, scale: 40.7 } },
            ],
        })
        .unwrap();

        let width = transformer.output_width();
        let mut coefficients = vec![0.1_f32; width];
        coefficients[width - 2] = 2.3; // HbA1c
        coefficients[width - 1] = 1.4; // glucose
        let classifier = BurnClassifier::from_coefficients(&coefficients, -1.0).unwrap();

        let artifact = ModelArtifact::new(
            SchemaKind::Clinical,
            "random",
            Arc::new(transformer),
            Arc::new(classifier),
        );
        let engine = InferenceEngine::new();

        let mut rng = rand::thread_rng();
        let genders = ["male", "female", "other"];
        for _ in 0..200 {
            let gender  = genders[rng.gen_range(0..genders.len())];
            let smoking = SMOKING_HISTORY[rng.gen_range(0..SMOKING_HISTORY.len())];
            let input = json!({
                "gender": gender,
                "age": rng.gen_range(0.0..=80.0),
                "hypertension": if rng.gen_bool(0.5) { "Yes" } else { "No" },
                "heart_disease": if rng.gen_bool(0.5) { "Yes" } else { "No" },
                "smoking_history": smoking,
                "bmi": rng.gen_range(10.16..=71.55),
                "HbA1c_level": rng.gen_range(0.0..10.0),
                "blood_glucose_level": rng.gen_range(50.0..300.0),
            });
            let record = CLINICAL.normalize_value(&input, BoundsPolicy::Strict).unwrap().record;

            let first  = engine.predict(&record, &artifact).unwrap();
            let second = engine.predict(&record, &artifact).unwrap();
            assert_eq!(first, second);

            assert!((0.0..=1.0).contains(&first.probability));
            assert_eq!(first.label.as_u8() == 1, first.probability >= 0.5);
        }
    }

    #[test]
    fn test_concurrent_predicts_agree() {
        let classifier = BurnClassifier::from_coefficients(
            &[0.12, 0.035, -0.013, 0.0006, -0.0012, 0.09, 0.95, 0.015],
            -8.4,
        )
        .unwrap();
        let artifact = Arc::new(ModelArtifact::new(
            SchemaKind::Pima,
            "shared",
            Arc::new(pima_transformer()),
            Arc::new(classifier),
        ));
        let record = Arc::new(pima_record());
        let expected = InferenceEngine::new().predict(&record, &artifact).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let artifact = Arc::clone(&artifact);
                let record   = Arc::clone(&record);
                std::thread::spawn(move || {
                    let engine = InferenceEngine::new();
                    (0..50)
                        .map(|_| engine.predict(&record, &artifact).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            for result in handle.join().unwrap() {
                assert_eq!(result, expected);
            }
        }
    }
}
