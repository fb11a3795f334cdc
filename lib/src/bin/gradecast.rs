//! gradecast command-line front end.
//!
//! Trains the grade model from the student dataset and answers predictions
//! from the persisted artifact. Results are printed to stdout as JSON; logs
//! go to stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use gradecast::catalog;
use gradecast::predictor::Predictor;
use gradecast::record::{InputRecord, StudentRecord};
use gradecast::trainer::{Trainer, TrainingConfig};
use gradecast::{ErrorKind, GradeError};
use serde::Serialize;
use serde_json::json;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "gradecast", version, about = "Student final-grade prediction")]
struct Cli {
    /// Directory holding trained_model.bin and model_metadata.bin
    #[arg(long, global = true, env = "GRADECAST_ARTIFACT_DIR")]
    artifact_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train the model and write the artifact files
    Train {
        /// Semicolon-separated student dataset
        #[arg(long, default_value = "data/student-mat.csv")]
        dataset: PathBuf,

        /// JSON training config; omitted keys keep their defaults
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the held-out fraction
        #[arg(long)]
        test_size: Option<f64>,

        /// Override the split seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Predict a final grade from a JSON student record
    Predict {
        /// JSON file with the record; reads stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,

        /// Accept any field map without range or choice validation
        #[arg(long)]
        raw: bool,
    },

    /// Show the loaded model's type, metrics and split sizes
    Info,

    /// List categorical choices and numeric ranges with their defaults
    Options,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gradecast=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Train {
            dataset,
            config,
            test_size,
            seed,
        } => {
            let mut config = match config {
                Some(path) => TrainingConfig::from_json_file(&path)
                    .with_context(|| format!("reading training config {}", path.display()))?,
                None => TrainingConfig::default(),
            };
            if let Some(dir) = cli.artifact_dir {
                config.artifact_dir = dir;
            }
            if let Some(test_size) = test_size {
                config.test_size = test_size;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }

            let report = Trainer::new(config).train_and_save(&dataset)?;
            print_json(&report)
        }
        Command::Predict { input, raw } => {
            let predictor = Predictor::from_dir(artifact_dir(cli.artifact_dir));
            let text = read_input(input.as_deref())?;
            let result = if raw {
                let record: InputRecord =
                    serde_json::from_str(&text).context("parsing input record")?;
                predictor.predict_record(&record)
            } else {
                let record: StudentRecord =
                    serde_json::from_str(&text).context("parsing student record")?;
                predictor.predict(&record)
            };
            let prediction = result.map_err(service_error)?;
            print_json(&json!({
                "predicted_grade": prediction.rounded(),
                "raw_score": prediction.raw_score,
            }))
        }
        Command::Info => {
            let predictor = Predictor::from_dir(artifact_dir(cli.artifact_dir));
            let info = predictor.model_info().map_err(service_error)?;
            print_json(&info)
        }
        Command::Options => print_json(&json!({
            "categorical": catalog::feature_options(),
            "numeric": catalog::numeric_options(),
        })),
    }
}

fn artifact_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| TrainingConfig::default().artifact_dir)
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading record from stdin")?;
            Ok(text)
        }
    }
}

/// Maps library errors onto the two messages clients distinguish.
fn service_error(err: GradeError) -> anyhow::Error {
    match err.kind() {
        ErrorKind::ModelUnavailable => {
            tracing::warn!(error = %err, "model not available");
            anyhow::Error::new(err).context("service temporarily unavailable")
        }
        ErrorKind::InvalidInput => anyhow::Error::new(err).context("invalid student record"),
        _ => {
            let detail = err.to_string();
            anyhow::Error::new(err).context(format!("Prediction failed: {}", detail))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
