// Shared test fixtures: pack-specs that mirror realistic exported
// models, and helpers to write them into temporary artifact dirs.

use std::path::Path;

use crate::data::preprocessor::{ColumnEncoding, ColumnSpec, ColumnTransformerSpec};
use crate::data::schema::{PIMA, SMOKING_HISTORY};
use crate::domain::feature_record::SchemaKind;
use crate::infra::artifact_store::{ArtifactStore, PackSpec};

fn one_hot(xs: &[&str]) -> ColumnEncoding {
    ColumnEncoding::OneHot { categories: xs.iter().map(|s| s.to_string()).collect() }
}

fn scaler(mean: f64, scale: f64) -> ColumnEncoding {
    ColumnEncoding::Standardize { mean, scale }
}

/// Raw-feature logistic regression over the eight pima columns.
pub fn pima_pack_spec() -> PackSpec {
    PackSpec {
        model_version: "pima-fixture".into(),
        schema:        SchemaKind::Pima,
        preprocessor:  ColumnTransformerSpec {
            columns: PIMA
                .field_names()
                .into_iter()
                .map(|n| ColumnSpec { name: n.into(), encoding: ColumnEncoding::Passthrough })
                .collect(),
        },
        coefficients: vec![0.12, 0.035, -0.013, 0.0006, -0.0012, 0.09, 0.95, 0.015],
        intercept:    -8.4,
    }
}

/// One-hot + standardised clinical model (15 features).
pub fn clinical_pack_spec() -> PackSpec {
    let col = |name: &str, encoding: ColumnEncoding| ColumnSpec { name: name.into(), encoding };
    PackSpec {
        model_version: "clinical-fixture".into(),
        schema:        SchemaKind::Clinical,
        preprocessor:  ColumnTransformerSpec {
            columns: vec![
                col("gender", one_hot(&["female", "male", "other"])),
                col("age", scaler(41.9, 22.5)),
                col("hypertension", ColumnEncoding::Passthrough),
                col("heart_disease", ColumnEncoding::Passthrough),
                col("smoking_history", one_hot(SMOKING_HISTORY)),
                col("bmi", scaler(27.3, 6.6)),
                col("HbA1c_level", scaler(5.5, 1.1)),
                col("blood_glucose_level", scaler(138.0, 40.7)),
            ],
        },
        coefficients: vec![
            -0.1, 0.15, 0.0,                      // gender
            1.0,                                  // age
            0.7,                                  // hypertension
            0.6,                                  // heart_disease
            0.0, 0.1, 0.05, 0.05, -0.1, 0.05,     // smoking_history
            0.6,                                  // bmi
            2.4,                                  // HbA1c_level
            1.4,                                  // blood_glucose_level
        ],
        intercept: -4.8,
    }
}

/// Pack `spec` into `dir` and return the store.
pub fn packed(dir: &Path, spec: &PackSpec) -> ArtifactStore {
    let store = ArtifactStore::new(dir);
    store.pack(spec).expect("fixture pack-spec packs");
    store
}
