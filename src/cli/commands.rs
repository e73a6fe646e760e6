// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Five subcommands:
//
//   serve    — HTTP front-end (both models)
//   assess   — the form front-end: one flag per clinical field
//   predict  — API-style pima JSON from a file or stdin
//   pack     — write an artifact directory from a pack-spec
//   inspect  — print an artifact's manifest summary
//
// clap's derive macros generate help text, error messages for
// bad values and the string → number/path conversions.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::{json, Value};

use crate::data::schema::BoundsPolicy;
use crate::infra::config::ServeConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve /api/predict, /api/assess and /health over HTTP
    Serve(ServeArgs),

    /// Assess diabetes risk from clinical measurements
    Assess(AssessArgs),

    /// Predict from a pima JSON payload (file or stdin)
    Predict(PredictArgs),

    /// Pack exported coefficients into an artifact directory
    Pack(PackArgs),

    /// Show what an artifact directory contains
    Inspect(InspectArgs),
}

// ─── serve ────────────────────────────────────────────────────────────────────

/// Flags left unset keep the config-file (or default) value.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Artifact directory for the clinical (form) model
    #[arg(long)]
    pub clinical_artifact: Option<PathBuf>,

    /// Artifact directory for the pima (API) model
    #[arg(long)]
    pub pima_artifact: Option<PathBuf>,

    /// Serve a browser front-end from this directory
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// strict | advisory
    #[arg(long)]
    pub form_bounds: Option<BoundsPolicy>,
}

impl ServeArgs {
    pub fn into_config(self) -> Result<ServeConfig> {
        let mut cfg = ServeConfig::load(self.config.as_deref())?;

        if let Some(host)   = self.host              { cfg.host = host; }
        if let Some(port)   = self.port              { cfg.port = port; }
        if let Some(path)   = self.clinical_artifact { cfg.clinical_artifact = path; }
        if let Some(path)   = self.pima_artifact     { cfg.pima_artifact = path; }
        if let Some(dir)    = self.static_dir        { cfg.static_dir = Some(dir); }
        if let Some(policy) = self.form_bounds       { cfg.form_bounds = policy; }

        Ok(cfg)
    }
}

// ─── assess ───────────────────────────────────────────────────────────────────

/// Defaults are the form's initial values.
#[derive(Args, Debug)]
pub struct AssessArgs {
    /// Clinical artifact directory
    #[arg(long, default_value = "artifacts/clinical")]
    pub artifact: PathBuf,

    /// male | female | other
    #[arg(long, default_value = "male")]
    pub gender: String,

    /// Years, 0 to 80
    #[arg(long, default_value_t = 25.0)]
    pub age: f64,

    /// Body mass index, 10.16 to 71.55
    #[arg(long, default_value_t = 25.0)]
    pub bmi: f64,

    /// Yes | No
    #[arg(long, default_value = "No")]
    pub hypertension: String,

    /// Yes | No
    #[arg(long, default_value = "No")]
    pub heart_disease: String,

    /// not current | former | No Info | current | never | ever
    #[arg(long, default_value = "not current")]
    pub smoking_history: String,

    /// Average blood sugar over the past 2-3 months (%)
    #[arg(long = "hba1c", default_value_t = 5.7)]
    pub hba1c_level: f64,

    /// mg/dL
    #[arg(long, default_value_t = 100.0)]
    pub blood_glucose_level: f64,

    /// strict rejects out-of-range values; advisory warns and predicts
    #[arg(long, default_value_t = BoundsPolicy::Strict)]
    pub bounds: BoundsPolicy,

    /// Also print what each input factor means
    #[arg(long)]
    pub explain: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl AssessArgs {
    /// The request body the form would submit.
    pub fn payload(&self) -> Value {
        json!({
            "gender":              self.gender,
            "age":                 self.age,
            "hypertension":        self.hypertension,
            "heart_disease":       self.heart_disease,
            "smoking_history":     self.smoking_history,
            "bmi":                 self.bmi,
            "HbA1c_level":         self.hba1c_level,
            "blood_glucose_level": self.blood_glucose_level,
        })
    }
}

// ─── predict / pack / inspect ─────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// JSON payload file; reads stdin when omitted or "-"
    pub input: Option<PathBuf>,

    /// Pima artifact directory
    #[arg(long, default_value = "artifacts/pima")]
    pub artifact: PathBuf,
}

#[derive(Args, Debug)]
pub struct PackArgs {
    /// Pack-spec JSON (manifest fields + coefficients + intercept)
    pub spec: PathBuf,

    /// Artifact directory to write
    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Artifact directory
    pub dir: PathBuf,
}
