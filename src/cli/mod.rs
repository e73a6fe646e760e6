// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap, hands the work to Layer 2 and prints what comes back.
// Nothing here computes a prediction.

pub mod commands;

use std::fs;
use std::io::{self, Read};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{AssessArgs, Commands, InspectArgs, PackArgs, PredictArgs, ServeArgs};
use serde_json::Value;

use crate::application::formatter::{FormReport, FormatTarget, Presentation, DISCLAIMER, FACTOR_NOTES};
use crate::application::pipeline::{AssessResponse, PipelineOutput, ServingPipeline};
use crate::data::preprocessor::ColumnEncoding;
use crate::data::schema::BoundsPolicy;
use crate::domain::feature_record::SchemaKind;
use crate::infra::artifact_slot::ArtifactSlot;
use crate::infra::artifact_store::{read_pack_spec, ArtifactStore, ClassifierManifest};

#[derive(Parser, Debug)]
#[command(
    name = "diabetes-risk-serve",
    version,
    about = "Serve a diabetes-risk classifier to a form front-end and a JSON API."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching handler. Thin: routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve(args)   => run_serve(args),
            Commands::Assess(args)  => run_assess(args),
            Commands::Predict(args) => run_predict(args),
            Commands::Pack(args)    => run_pack(args),
            Commands::Inspect(args) => run_inspect(args),
        }
    }
}

fn run_serve(args: ServeArgs) -> Result<()> {
    use crate::application::serve_use_case::ServeUseCase;

    let config = args.into_config()?;
    ServeUseCase::new(config).execute()
}

fn run_assess(args: AssessArgs) -> Result<()> {
    let slot     = Arc::new(ArtifactSlot::new(SchemaKind::Clinical, &args.artifact));
    let pipeline = ServingPipeline::new(slot, args.bounds, FormatTarget::Form);

    let out = pipeline.run(&args.payload()).context("Assessment failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&AssessResponse::from(out))?);
    } else if let Presentation::Form(report) = &out.presentation {
        print_advisories(&out);
        print_form_report(report);
    }

    if args.explain {
        print_factor_notes();
    }
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let raw = match args.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("Cannot read stdin")?;
            buf
        }
    };
    let payload: Value = serde_json::from_str(&raw).context("Input is not valid JSON")?;

    let slot     = Arc::new(ArtifactSlot::new(SchemaKind::Pima, &args.artifact));
    let pipeline = ServingPipeline::new(slot, BoundsPolicy::Advisory, FormatTarget::Api);

    let out = pipeline.run(&payload).context("Prediction failed")?;
    println!("{}", serde_json::to_string(&out.presentation)?);
    Ok(())
}

fn run_pack(args: PackArgs) -> Result<()> {
    let spec     = read_pack_spec(&args.spec)?;
    let manifest = ArtifactStore::new(&args.out).pack(&spec)?;

    println!(
        "Packed {} model '{}' into {}",
        manifest.schema,
        manifest.model_version,
        args.out.display()
    );
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let store    = ArtifactStore::new(&args.dir);
    let manifest = store.read_manifest()?;
    let ClassifierManifest::LogisticRegression { n_features } = &manifest.classifier;

    println!("Artifact:       {}", args.dir.display());
    println!("Model version:  {}", manifest.model_version);
    println!("Schema:         {}", manifest.schema);
    println!("Format version: {}", manifest.format_version);
    println!("Classifier:     logistic regression, {n_features} features");
    println!("Columns:");
    for col in &manifest.preprocessor.columns {
        let encoding = match &col.encoding {
            ColumnEncoding::Passthrough => "passthrough".to_string(),
            ColumnEncoding::Standardize { mean, scale } => {
                format!("standardize (mean {mean}, scale {scale})")
            }
            ColumnEncoding::OneHot { categories } => {
                format!("one-hot [{}]", categories.join(", "))
            }
        };
        println!("  {:<22} {encoding}", col.name);
    }

    // The manifest alone can look fine while the weights are not
    match store.load(manifest.schema) {
        Ok(_)  => println!("Status:         loads cleanly"),
        Err(e) => println!("Status:         NOT loadable: {e}"),
    }
    Ok(())
}

// ─── Text Output ──────────────────────────────────────────────────────────────

fn print_advisories(out: &PipelineOutput) {
    for a in &out.advisories {
        let min = a.min.map_or("-inf".to_string(), |v| v.to_string());
        let max = a.max.map_or("inf".to_string(), |v| v.to_string());
        println!("Note: {} = {} is outside [{min}, {max}]; the estimate may be unreliable.", a.field, a.value);
    }
}

fn print_form_report(report: &FormReport) {
    println!("\nPrediction Result");
    println!("  {}", report.headline);
    println!("  Probability of diabetes: {} ({:?} risk band)", report.percent, report.band);
    println!("  {}", report.summary);

    println!("\nRecommendations");
    for line in report.recommendations {
        println!("  - {line}");
    }
}

fn print_factor_notes() {
    println!("\nHow does this prediction work?");
    for (factor, note) in FACTOR_NOTES {
        println!("  - {factor}: {note}");
    }
    println!("\n{DISCLAIMER}");
}
