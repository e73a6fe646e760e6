// ============================================================
// Layer 4 — Request Schema
// ============================================================
// Validates raw front-end input and normalises it into a
// FeatureRecord the preprocessor can consume.
//
// Steps per declared field (in declaration order):
//   1. Presence    — missing or null → MissingField
//   2. Coercion    — numbers accept JSON numbers or numeric
//                    strings (browser forms post strings);
//                    flags map "Yes"/"No" → 1/0; categories
//                    must match a fixed token list exactly
//   3. Bounds      — checked under the caller's BoundsPolicy:
//                    Strict rejects, Advisory flags and keeps
//
// Keys the schema does not declare are dropped.
//
// Field order here IS the column order the artifacts were fit
// with. The artifact store refuses manifests that disagree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::ValidationError;
use crate::domain::feature_record::{Feature, FeatureRecord, FeatureValue, SchemaKind};

// ─── Field Declarations ───────────────────────────────────────────────────────

/// How a raw value is coerced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Finite float
    Number,
    /// Binary flag: "Yes"/"No", 1/0 or true/false → 1.0/0.0
    Flag,
    /// One token from a fixed list, matched exactly
    Category(&'static [&'static str]),
}

/// One declared request field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub min:  Option<f64>,
    pub max:  Option<f64>,
}

impl FieldSpec {
    const fn number(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Number, min: None, max: None }
    }

    const fn bounded(name: &'static str, min: Option<f64>, max: Option<f64>) -> Self {
        Self { name, kind: FieldKind::Number, min, max }
    }

    const fn flag(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Flag, min: None, max: None }
    }

    const fn category(name: &'static str, tokens: &'static [&'static str]) -> Self {
        Self { name, kind: FieldKind::Category(tokens), min: None, max: None }
    }

    /// Coerce a raw JSON value according to this field's kind.
    fn coerce(&self, raw: &Value) -> Result<FeatureValue, ValidationError> {
        match self.kind {
            FieldKind::Number => {
                let v = match raw {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                }
                .ok_or_else(|| self.invalid_type("a number"))?;

                if !v.is_finite() {
                    return Err(ValidationError::NotFinite { field: self.name.to_string() });
                }
                Ok(FeatureValue::Number(v))
            }

            FieldKind::Flag => {
                let flag = match raw {
                    Value::String(s) if s == "Yes" => Some(1.0),
                    Value::String(s) if s == "No"  => Some(0.0),
                    Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                };
                match flag {
                    Some(v) if v == 0.0 || v == 1.0 => Ok(FeatureValue::Number(v)),
                    _ => Err(self.invalid_type("\"Yes\"/\"No\" or 0/1")),
                }
            }

            FieldKind::Category(tokens) => {
                let s = raw.as_str().ok_or_else(|| self.invalid_type("a string"))?;
                if tokens.contains(&s) {
                    Ok(FeatureValue::Category(s.to_string()))
                } else {
                    Err(ValidationError::UnknownCategory {
                        field:   self.name.to_string(),
                        value:   s.to_string(),
                        allowed: tokens.join(", "),
                    })
                }
            }
        }
    }

    /// Returns an advisory when `value` falls outside the declared bounds.
    fn check_bounds(&self, value: f64) -> Option<BoundsAdvisory> {
        let below = self.min.is_some_and(|min| value < min);
        let above = self.max.is_some_and(|max| value > max);
        (below || above).then(|| BoundsAdvisory {
            field: self.name.to_string(),
            value,
            min:   self.min,
            max:   self.max,
        })
    }

    fn invalid_type(&self, expected: &str) -> ValidationError {
        ValidationError::InvalidType {
            field:    self.name.to_string(),
            expected: expected.to_string(),
        }
    }
}

// ─── Bounds Policy ────────────────────────────────────────────────────────────

/// What to do with a value outside its declared bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundsPolicy {
    /// Reject the request with `ValidationError::OutOfRange`
    #[default]
    Strict,
    /// Keep the value and report a `BoundsAdvisory`
    Advisory,
}

impl FromStr for BoundsPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict"   => Ok(BoundsPolicy::Strict),
            "advisory" => Ok(BoundsPolicy::Advisory),
            other      => Err(format!("unknown bounds policy '{other}' (strict|advisory)")),
        }
    }
}

impl fmt::Display for BoundsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundsPolicy::Strict   => f.write_str("strict"),
            BoundsPolicy::Advisory => f.write_str("advisory"),
        }
    }
}

/// An out-of-bounds value that was accepted under `BoundsPolicy::Advisory`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundsAdvisory {
    pub field: String,
    pub value: f64,
    pub min:   Option<f64>,
    pub max:   Option<f64>,
}

impl BoundsAdvisory {
    fn into_error(self) -> ValidationError {
        ValidationError::OutOfRange {
            field: self.field,
            value: self.value,
            min:   self.min.unwrap_or(f64::NEG_INFINITY),
            max:   self.max.unwrap_or(f64::INFINITY),
        }
    }
}

/// Output of `RequestSchema::normalize`.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub record:     FeatureRecord,
    pub advisories: Vec<BoundsAdvisory>,
}

// ─── Schemas ──────────────────────────────────────────────────────────────────

pub const GENDERS: &[&str] = &["male", "female", "other"];

pub const SMOKING_HISTORY: &[&str] =
    &["not current", "former", "No Info", "current", "never", "ever"];

/// Form front-end schema.
pub static CLINICAL: RequestSchema = RequestSchema {
    kind:   SchemaKind::Clinical,
    fields: &[
        FieldSpec::category("gender", GENDERS),
        FieldSpec::bounded("age", Some(0.0), Some(80.0)),
        FieldSpec::flag("hypertension"),
        FieldSpec::flag("heart_disease"),
        FieldSpec::category("smoking_history", SMOKING_HISTORY),
        FieldSpec::bounded("bmi", Some(10.16), Some(71.55)),
        FieldSpec::bounded("HbA1c_level", Some(0.0), None),
        FieldSpec::bounded("blood_glucose_level", Some(0.0), None),
    ],
};

/// API front-end schema. No declared bounds.
pub static PIMA: RequestSchema = RequestSchema {
    kind:   SchemaKind::Pima,
    fields: &[
        FieldSpec::number("Pregnancy"),
        FieldSpec::number("Plasma"),
        FieldSpec::number("BloodPressure"),
        FieldSpec::number("Skin"),
        FieldSpec::number("Test"),
        FieldSpec::number("BMI"),
        FieldSpec::number("DBF"),
        FieldSpec::number("Age"),
    ],
};

/// The ordered field list for one feature schema.
#[derive(Debug)]
pub struct RequestSchema {
    kind:   SchemaKind,
    fields: &'static [FieldSpec],
}

impl RequestSchema {
    pub fn for_kind(kind: SchemaKind) -> &'static RequestSchema {
        match kind {
            SchemaKind::Clinical => &CLINICAL,
            SchemaKind::Pima     => &PIMA,
        }
    }

    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Validate an arbitrary JSON value; it must be an object.
    pub fn normalize_value(
        &self,
        raw:    &Value,
        policy: BoundsPolicy,
    ) -> Result<Normalized, ValidationError> {
        let map = raw.as_object().ok_or(ValidationError::NotAnObject)?;
        self.normalize(map, policy)
    }

    /// Validate and normalise one request.
    pub fn normalize(
        &self,
        raw:    &Map<String, Value>,
        policy: BoundsPolicy,
    ) -> Result<Normalized, ValidationError> {
        let mut features   = Vec::with_capacity(self.fields.len());
        let mut advisories = Vec::new();

        for spec in self.fields {
            let raw_value = raw
                .get(spec.name)
                .filter(|v| !v.is_null())
                .ok_or_else(|| ValidationError::MissingField { field: spec.name.to_string() })?;

            let value = spec.coerce(raw_value)?;

            if let FeatureValue::Number(v) = value {
                if let Some(advisory) = spec.check_bounds(v) {
                    match policy {
                        BoundsPolicy::Strict   => return Err(advisory.into_error()),
                        BoundsPolicy::Advisory => advisories.push(advisory),
                    }
                }
            }

            features.push(Feature { name: spec.name.to_string(), value });
        }

        let dropped: Vec<&str> = raw
            .keys()
            .filter(|k| self.field(k).is_none())
            .map(String::as_str)
            .collect();
        if !dropped.is_empty() {
            tracing::debug!("Dropping unknown {} fields: {:?}", self.kind, dropped);
        }

        Ok(Normalized {
            record: FeatureRecord::new(self.kind, features),
            advisories,
        })
    }
}
