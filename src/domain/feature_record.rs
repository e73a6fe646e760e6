// ============================================================
// Layer 3 — FeatureRecord Domain Type
// ============================================================
// One prediction request after RequestSchema has validated and
// normalised it. Fields are stored in the exact order the schema
// declares, which is also the order the preprocessor was fit on.
//
// Two schema variants exist and they are NOT interchangeable:
//   clinical — gender, age, flags, smoking, bmi, HbA1c, glucose
//   pima     — pregnancy, plasma, blood pressure, skin fold, ...
//
// A FeatureRecord remembers which variant produced it so the
// inference engine can refuse to feed it to the wrong artifact.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which feature schema a record (or an artifact) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// Form front-end schema (HbA1c / glucose / smoking history)
    Clinical,
    /// API front-end schema (pregnancy / plasma / skin fold)
    Pima,
}

impl SchemaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::Clinical => "clinical",
            SchemaKind::Pima     => "pima",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single normalised value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Continuous measurements and 0/1 flags
    Number(f64),
    /// Token from a fixed enumeration (e.g. "former")
    Category(String),
}

/// A named value inside a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    pub name:  String,
    pub value: FeatureValue,
}

/// Canonical representation of one prediction request.
///
/// Only RequestSchema builds these in production code, so a record
/// always holds every field of its schema, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    schema:   SchemaKind,
    features: Vec<Feature>,
}

impl FeatureRecord {
    pub fn new(schema: SchemaKind, features: Vec<Feature>) -> Self {
        Self { schema, features }
    }

    pub fn schema(&self) -> SchemaKind {
        self.schema
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Field names in record order
    pub fn names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }

    /// Look up a value by field name
    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.features
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FeatureRecord {
        FeatureRecord::new(
            SchemaKind::Clinical,
            vec![
                Feature { name: "gender".into(), value: FeatureValue::Category("female".into()) },
                Feature { name: "age".into(),    value: FeatureValue::Number(45.0) },
            ],
        )
    }

    #[test]
    fn test_names_keep_order() {
        assert_eq!(sample().names(), vec!["gender", "age"]);
    }

    #[test]
    fn test_get_by_name() {
        let r = sample();
        assert_eq!(r.get("age"), Some(&FeatureValue::Number(45.0)));
        assert_eq!(r.get("gender"), Some(&FeatureValue::Category("female".into())));
        assert!(r.get("bmi").is_none());
    }

    #[test]
    fn test_schema_kind_serde_names() {
        let json = serde_json::to_string(&SchemaKind::Pima).unwrap();
        assert_eq!(json, "\"pima\"");
        let kind: SchemaKind = serde_json::from_str("\"clinical\"").unwrap();
        assert_eq!(kind, SchemaKind::Clinical);
    }
}
