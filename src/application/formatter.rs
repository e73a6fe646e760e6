// ============================================================
// Layer 2 — Result Formatter
// ============================================================
// Maps a PredictionResult to what each front-end shows:
//
//   Form → label text, headline, "73.45%", gauge band,
//          summary sentence, recommendation list
//   Api  → {"risk_score": "Diabetic" | "Non Diabetic"}
//
// Pure functions of (label, probability). The label is read as
// the classifier set it; nothing here compares the probability
// against the decision threshold again.

use serde::Serialize;

use crate::domain::prediction::{DiabetesLabel, PredictionResult};

/// Which front-end the output is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTarget {
    Form,
    Api,
}

// ─── Fixed Texts ──────────────────────────────────────────────────────────────

const DIABETIC_RECOMMENDATIONS: &[&str] = &[
    "Consult with a healthcare professional for a thorough evaluation.",
    "Monitor your blood glucose levels regularly.",
    "Maintain a healthy diet and exercise routine.",
    "Consider lifestyle changes to manage your risk factors.",
];

const NON_DIABETIC_RECOMMENDATIONS: &[&str] = &[
    "Continue maintaining a healthy lifestyle.",
    "Regular check-ups are still important for early detection.",
    "Stay informed about diabetes risk factors and symptoms.",
];

/// What each form input contributes, shown by `assess --explain`.
pub const FACTOR_NOTES: &[(&str, &str)] = &[
    ("Gender",              "Biological sex can influence diabetes risk."),
    ("Age",                 "Risk of type 2 diabetes increases with age."),
    ("BMI (Body Mass Index)", "A higher BMI is associated with increased diabetes risk."),
    ("Hypertension",        "High blood pressure is often associated with diabetes."),
    ("Heart Disease",       "Cardiovascular issues can be linked to diabetes."),
    ("Smoking History",     "Smoking can affect insulin sensitivity and increase diabetes risk."),
    ("HbA1c Level",         "This test reflects average blood sugar levels over the past 2-3 months."),
    ("Blood Glucose Level", "High blood sugar is a key indicator of diabetes."),
];

pub const DISCLAIMER: &str =
    "This tool provides an estimate based on the information given and should not be \
     considered a medical diagnosis. Always consult with healthcare professionals for \
     proper medical advice and diagnosis.";

// ─── Presentations ────────────────────────────────────────────────────────────

/// Colour step of the probability gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GaugeBand {
    /// [0, 33)
    Low,
    /// [33, 66)
    Moderate,
    /// [66, 100]
    High,
}

impl GaugeBand {
    pub fn for_percent(percent: f64) -> Self {
        if percent < 33.0 {
            GaugeBand::Low
        } else if percent < 66.0 {
            GaugeBand::Moderate
        } else {
            GaugeBand::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormReport {
    pub label:           &'static str,
    pub headline:        &'static str,
    pub probability:     f64,
    /// Two decimals with a percent sign, e.g. "73.45%"
    pub percent:         String,
    pub band:            GaugeBand,
    pub summary:         String,
    pub recommendations: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiReport {
    pub risk_score: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Presentation {
    Form(FormReport),
    Api(ApiReport),
}

// ─── Formatter ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultFormatter;

impl ResultFormatter {
    pub fn format(&self, result: &PredictionResult, target: FormatTarget) -> Presentation {
        match target {
            FormatTarget::Form => Presentation::Form(self.form(result)),
            FormatTarget::Api  => Presentation::Api(self.api(result)),
        }
    }

    pub fn form(&self, result: &PredictionResult) -> FormReport {
        let (label, headline, recommendations) = match result.label {
            DiabetesLabel::Diabetic => (
                "likely diabetic",
                "The person is likely to be diabetic.",
                DIABETIC_RECOMMENDATIONS,
            ),
            DiabetesLabel::NonDiabetic => (
                "likely non-diabetic",
                "The person is likely to be non-diabetic.",
                NON_DIABETIC_RECOMMENDATIONS,
            ),
        };

        let percent = format!("{:.2}%", result.percent());
        FormReport {
            label,
            headline,
            probability: result.probability,
            summary: format!("The model predicts a {percent} chance of diabetes."),
            percent,
            band: GaugeBand::for_percent(result.percent()),
            recommendations,
        }
    }

    /// The probability is dropped: API callers only get the label term.
    pub fn api(&self, result: &PredictionResult) -> ApiReport {
        let risk_score = match result.label {
            DiabetesLabel::Diabetic    => "Diabetic",
            DiabetesLabel::NonDiabetic => "Non Diabetic",
        };
        ApiReport { risk_score }
    }
}
