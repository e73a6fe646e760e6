// ============================================================
// Layer 4 — Column Transformer
// ============================================================
// The fitted preprocessor half of a model artifact. It turns a
// FeatureRecord into the numeric vector the classifier expects.
//
// Each input column has one encoding, fitted at training time:
//   passthrough  — value copied as-is               (1 output)
//   standardize  — (value - mean) / scale           (1 output)
//   one_hot      — 1.0 at the category's position   (k outputs)
//
// Output layout is the concatenation of per-column outputs in
// column order, i.e. the training-time column order.
//
// Column alignment is checked on every call: a record whose field
// names differ from the fitted columns, or arrive in a different
// order, is rejected. A transposed column would otherwise yield a
// plausible but wrong probability.

use serde::{Deserialize, Serialize};

use crate::data::schema::{FieldKind, RequestSchema};
use crate::domain::error::InferenceError;
use crate::domain::feature_record::{FeatureRecord, FeatureValue};
use crate::domain::traits::Preprocessor;

/// Fitted encoding for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnEncoding {
    Passthrough,
    Standardize { mean: f64, scale: f64 },
    OneHot { categories: Vec<String> },
}

impl ColumnEncoding {
    fn width(&self) -> usize {
        match self {
            ColumnEncoding::OneHot { categories } => categories.len(),
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name:     String,
    pub encoding: ColumnEncoding,
}

/// Serialised form stored in the artifact manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransformerSpec {
    pub columns: Vec<ColumnSpec>,
}

/// A validated, ready-to-use column transformer.
#[derive(Debug, Clone)]
pub struct ColumnTransformer {
    columns: Vec<ColumnSpec>,
    width:   usize,
}

impl ColumnTransformer {
    /// Build from a manifest spec, rejecting fitted parameters that
    /// could never produce a sane vector.
    pub fn from_spec(spec: ColumnTransformerSpec) -> Result<Self, String> {
        if spec.columns.is_empty() {
            return Err("preprocessor has no columns".to_string());
        }

        for col in &spec.columns {
            match &col.encoding {
                ColumnEncoding::Passthrough => {}
                ColumnEncoding::Standardize { mean, scale } => {
                    if !mean.is_finite() || !scale.is_finite() || *scale <= 0.0 {
                        return Err(format!(
                            "column '{}' has invalid scaler (mean={mean}, scale={scale})",
                            col.name
                        ));
                    }
                }
                ColumnEncoding::OneHot { categories } => {
                    if categories.is_empty() {
                        return Err(format!("column '{}' has no categories", col.name));
                    }
                    let mut seen: Vec<&str> = categories.iter().map(String::as_str).collect();
                    seen.sort_unstable();
                    seen.dedup();
                    if seen.len() != categories.len() {
                        return Err(format!("column '{}' has duplicate categories", col.name));
                    }
                }
            }
        }

        let width = spec.columns.iter().map(|c| c.encoding.width()).sum();
        Ok(Self { columns: spec.columns, width })
    }

    /// Check that this transformer was fit on `schema`: same names,
    /// same order, and encodings that suit each field kind.
    pub fn check_schema(&self, schema: &RequestSchema) -> Result<(), String> {
        let mine: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        let theirs = schema.field_names();
        if mine != theirs {
            return Err(format!(
                "preprocessor columns [{}] do not match {} schema [{}]",
                mine.join(", "),
                schema.kind(),
                theirs.join(", "),
            ));
        }

        for (col, field) in self.columns.iter().zip(schema.fields()) {
            let fits = match (&col.encoding, field.kind) {
                (ColumnEncoding::OneHot { .. }, FieldKind::Category(_)) => true,
                (ColumnEncoding::OneHot { .. }, _) => false,
                (_, FieldKind::Category(_)) => false,
                _ => true,
            };
            if !fits {
                return Err(format!(
                    "column '{}' encoding does not suit its field type",
                    col.name
                ));
            }
        }
        Ok(())
    }

    pub fn spec(&self) -> ColumnTransformerSpec {
        ColumnTransformerSpec { columns: self.columns.clone() }
    }
}

/// f64 → f32 for the classifier. Finite inputs beyond f32 range
/// would become ±inf here, so they are rejected by column.
fn narrow(column: &str, value: f64) -> Result<f32, InferenceError> {
    let v = value as f32;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(InferenceError::FeatureOverflow { column: column.to_string(), value })
    }
}

impl Preprocessor for ColumnTransformer {
    fn columns(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    fn output_width(&self) -> usize {
        self.width
    }

    fn transform(&self, record: &FeatureRecord) -> Result<Vec<f32>, InferenceError> {
        let found = record.names();
        if found != self.columns() {
            return Err(InferenceError::ColumnMismatch {
                expected: self.columns().join(", "),
                found:    found.join(", "),
            });
        }

        let mut out = Vec::with_capacity(self.width);

        for (col, feature) in self.columns.iter().zip(record.features()) {
            match (&col.encoding, &feature.value) {
                (ColumnEncoding::Passthrough, FeatureValue::Number(v)) => {
                    out.push(narrow(&col.name, *v)?);
                }
                (ColumnEncoding::Standardize { mean, scale }, FeatureValue::Number(v)) => {
                    out.push(narrow(&col.name, (v - mean) / scale)?);
                }
                (ColumnEncoding::OneHot { categories }, FeatureValue::Category(value)) => {
                    let hot = categories
                        .iter()
                        .position(|c| c == value)
                        .ok_or_else(|| InferenceError::UnknownCategory {
                            column: col.name.clone(),
                            value:  value.clone(),
                        })?;
                    out.extend((0..categories.len()).map(|i| if i == hot { 1.0 } else { 0.0 }));
                }
                (ColumnEncoding::OneHot { .. }, _) => {
                    return Err(InferenceError::TypeMismatch {
                        column:   col.name.clone(),
                        expected: "categorical",
                    });
                }
                (_, _) => {
                    return Err(InferenceError::TypeMismatch {
                        column:   col.name.clone(),
                        expected: "numeric",
                    });
                }
            }
        }

        Ok(out)
    }
}
