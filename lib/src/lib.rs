//! # gradecast
//!
//! Predicts a student's final grade (0 to 20) from a partial, human-shaped
//! record, using a least-squares linear model trained on the UCI student
//! performance dataset.
//!
//! ## Core Design Principles
//!
//! - **One schema, two encoders**: training expands categorical columns into
//!   drop-first indicator columns and records the resulting column order as a
//!   [`schema::FeatureSchema`]; inference rebuilds vectors by walking that
//!   same order ([`align::align`]), so a record never has to be complete.
//! - **Stateful Type Safety**: models carry their training state in the type
//!   (`Unfitted` vs `Fitted`); only fitted models can predict or be persisted.
//! - **Validation at the boundary**: requests arrive as
//!   [`record::StudentRecord`] and are checked against the field
//!   [`catalog`] before they reach the model.
//!
//! ## Quick Start
//!
//! ```no_run
//! use gradecast::predictor::Predictor;
//! use gradecast::record::StudentRecord;
//! use gradecast::trainer::{train_and_save, TrainingConfig};
//!
//! # fn main() -> gradecast::error::Result<()> {
//! let config = TrainingConfig::default();
//! let report = train_and_save("data/student-mat.csv", &config)?;
//! println!("held-out R² = {:.4}", report.r2);
//!
//! let predictor = Predictor::from_dir(&config.artifact_dir);
//! let record = StudentRecord {
//!     g1: 14,
//!     g2: 15,
//!     ..StudentRecord::default()
//! };
//! let prediction = predictor.predict(&record)?;
//! println!("predicted grade: {:.2}", prediction.rounded());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - `dataset`: delimited-file loading into typed columns
//! - `preprocessing`: fit/transform traits and the one-hot encoder
//! - `model`: linear regression with stateful type parameters
//! - `model_selection`, `metrics`: seeded hold-out split and scoring
//! - `trainer`: the training pipeline and its configuration
//! - `artifact`, `serialization`: persisted model and metadata
//! - `record`, `catalog`, `align`, `predictor`: the inference side

/// Inference-time feature alignment and grade clamping.
pub mod align;

/// Persisted model and metadata files.
pub mod artifact;

/// Known student-record fields, their ranges and choices.
pub mod catalog;

/// Data loading utilities.
pub mod dataset;

pub mod error;

/// Regression metrics.
pub mod metrics;

/// Machine learning models with compile-time state safety.
pub mod model;

pub mod model_selection;

/// Grade prediction against a persisted artifact.
pub mod predictor;

/// Data preprocessing transformers.
pub mod preprocessing;

/// Request and loose input records.
pub mod record;

pub mod schema;

/// Model persistence.
pub mod serialization;

/// Training pipeline orchestration.
pub mod trainer;

pub use error::{ErrorKind, GradeError, Result};
pub use predictor::{ModelInfo, Prediction, Predictor};
pub use record::{InputRecord, StudentRecord};
pub use trainer::{Trainer, TrainingConfig, TrainingReport};
