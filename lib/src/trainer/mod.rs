//! Training: dataset in, persisted artifact out.
//!
//! [`Trainer::fit`] runs the whole pipeline in memory:
//!
//! 1. split the target column off the frame;
//! 2. expand categorical columns into drop-first indicators;
//! 3. hold out a seeded test split;
//! 4. fit ordinary least squares on the training rows;
//! 5. score the held-out rows.
//!
//! [`Trainer::train_and_save`] adds loading the CSV and writing the two
//! artifact files.

use crate::artifact::{ArtifactPaths, ModelArtifact, ModelMetadata};
use crate::catalog;
use crate::dataset::DataFrame;
use crate::error::{GradeError, Result};
use crate::metrics::Metrics;
use crate::model::linear::LinearRegression;
use crate::model::InferenceModel;
use crate::model_selection::train_test_split;
use crate::preprocessing::{FittedTransformer, OneHotEncoder, Transformer};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Training settings. Every field has a default, so a JSON file only needs
/// the keys it wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Numeric column to predict.
    pub target: String,
    /// Columns expanded into indicators, in expansion order.
    pub categorical_columns: Vec<String>,
    /// Fraction of rows held out for evaluation.
    pub test_size: f64,
    pub seed: u64,
    /// Field separator of the dataset file.
    pub delimiter: char,
    /// Directory the artifact files are written to.
    pub artifact_dir: PathBuf,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            target: "G3".to_string(),
            categorical_columns: catalog::categorical_columns(),
            test_size: 0.2,
            seed: 42,
            delimiter: ';',
            artifact_dir: PathBuf::from("artifacts"),
        }
    }
}

impl TrainingConfig {
    /// Loads a config from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Artifact file locations inside [`TrainingConfig::artifact_dir`].
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::in_dir(&self.artifact_dir)
    }

    fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(GradeError::Dataset(format!(
                "delimiter must be an ASCII character, got {:?}",
                self.delimiter
            )))
        }
    }
}

/// Fluent builder for a [`Trainer`].
///
/// Defaults are those of [`TrainingConfig::default`].
#[derive(Debug, Clone, Default)]
pub struct TrainerBuilder {
    config: TrainingConfig,
}

impl TrainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.config.target = target.into();
        self
    }

    pub fn categorical_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.categorical_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn test_size(mut self, test_size: f64) -> Self {
        self.config.test_size = test_size;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    pub fn artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.artifact_dir = dir.into();
        self
    }

    pub fn build(self) -> Trainer {
        Trainer::new(self.config)
    }
}

/// Outcome of a successful training run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub model_path: PathBuf,
    pub metadata_path: PathBuf,
    pub mse: f64,
    pub r2: f64,
    pub train_size: usize,
    pub test_size: usize,
    pub n_features: usize,
}

/// Fits and persists the grade model.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn builder() -> TrainerBuilder {
        TrainerBuilder::new()
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Fits the model on an already loaded frame.
    ///
    /// # Errors
    /// [`GradeError::Dataset`] when the target or a categorical column is
    /// missing or mistyped, [`GradeError::Training`] when the split or the
    /// least-squares system is degenerate.
    pub fn fit(&self, frame: &DataFrame) -> Result<ModelArtifact> {
        let (features, y) = frame.split_target(&self.config.target)?;

        let encoder =
            OneHotEncoder::new(self.config.categorical_columns.iter().cloned()).fit(&features)?;
        let x = encoder.transform(&features)?;
        let schema = encoder.schema();
        debug!(
            rows = x.nrows(),
            numeric = encoder.passthrough().len(),
            features = schema.len(),
            "encoded dataset"
        );

        let split = train_test_split(
            &x,
            &Array1::from(y),
            self.config.test_size,
            Some(self.config.seed),
        )?;

        let model = LinearRegression::new(schema.len()).fit(&split.x_train, &split.y_train)?;
        let y_pred = model.predict_batch(&split.x_test)?;
        let metrics = Metrics::evaluate(&split.y_test.to_vec(), &y_pred.to_vec())?;

        let metadata = ModelMetadata {
            feature_names: schema.feature_names(),
            categorical_columns: self.config.categorical_columns.clone(),
            mse: metrics.mse,
            r2: metrics.r2,
            train_size: split.y_train.len(),
            test_size: split.y_test.len(),
        };
        ModelArtifact::new(model, metadata)
    }

    /// Loads `dataset`, fits the model and writes the artifact files.
    ///
    /// # Errors
    /// [`GradeError::DatasetNotFound`] when `dataset` does not exist, plus
    /// everything [`Trainer::fit`] and [`ModelArtifact::save`] can return.
    pub fn train_and_save<P: AsRef<Path>>(&self, dataset: P) -> Result<TrainingReport> {
        let dataset = dataset.as_ref();
        if !dataset.is_file() {
            error!(path = %dataset.display(), "dataset not found");
            return Err(GradeError::DatasetNotFound {
                path: dataset.to_path_buf(),
            });
        }

        let frame = DataFrame::from_csv_path(dataset, self.config.delimiter_byte()?)?;
        info!(
            path = %dataset.display(),
            rows = frame.n_rows(),
            columns = frame.n_cols(),
            "loaded dataset"
        );

        let artifact = self.fit(&frame)?;
        let paths = self.config.artifact_paths();
        artifact.save(&paths)?;

        let metadata = artifact.metadata();
        info!(
            mse = metadata.mse,
            r2 = metadata.r2,
            train_size = metadata.train_size,
            test_size = metadata.test_size,
            model = %paths.model.display(),
            "model trained"
        );

        Ok(TrainingReport {
            model_path: paths.model,
            metadata_path: paths.metadata,
            mse: metadata.mse,
            r2: metadata.r2,
            train_size: metadata.train_size,
            test_size: metadata.test_size,
            n_features: artifact.schema().len(),
        })
    }
}

/// Trains with `config` and persists the artifact.
pub fn train_and_save<P: AsRef<Path>>(dataset: P, config: &TrainingConfig) -> Result<TrainingReport> {
    Trainer::new(config.clone()).train_and_save(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::fmt::Write as _;

    /// Rows where `G3 = 2 + G2 + 3*[school == MS] - [sex == M]`.
    fn exact_csv(n: usize) -> String {
        let mut csv = String::from("school;sex;age;G2;G3\n");
        for i in 0..n {
            let school = if i % 3 == 0 { "MS" } else { "GP" };
            let sex = if i % 2 == 0 { "M" } else { "F" };
            let age = 15 + (i % 7);
            let g2 = (i * 5) % 21;
            let school_bonus = if school == "MS" { 3 } else { 0 };
            let sex_penalty = if sex == "M" { 1 } else { 0 };
            let g3 = 2 + g2 + school_bonus - sex_penalty;
            writeln!(csv, "{};{};{};{};{}", school, sex, age, g2, g3).unwrap();
        }
        csv
    }

    fn trainer(dir: &Path) -> Trainer {
        Trainer::builder()
            .categorical_columns(["school", "sex"])
            .artifact_dir(dir)
            .build()
    }

    #[test]
    fn test_default_config() {
        let config = TrainingConfig::default();
        assert_eq!(config.target, "G3");
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.seed, 42);
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.categorical_columns.len(), 17);
        assert_eq!(config.categorical_columns[0], "school");
    }

    #[test]
    fn test_partial_json_config() {
        let config: TrainingConfig =
            serde_json::from_str(r#"{"seed": 7, "delimiter": ","}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.target, "G3");
    }

    #[test]
    fn test_config_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.json");
        std::fs::write(&path, r#"{"test_size": 0.25, "artifact_dir": "out"}"#).unwrap();
        let config = TrainingConfig::from_json_file(&path).unwrap();
        assert_eq!(config.test_size, 0.25);
        assert_eq!(config.artifact_paths(), ArtifactPaths::in_dir("out"));
    }

    #[test]
    fn test_builder_sets_fields() {
        let trainer = Trainer::builder()
            .target("G2")
            .test_size(0.3)
            .seed(1)
            .delimiter(',')
            .build();
        assert_eq!(trainer.config().target, "G2");
        assert_eq!(trainer.config().test_size, 0.3);
        assert_eq!(trainer.config().seed, 1);
        assert_eq!(trainer.config().delimiter, ',');
    }

    #[test]
    fn test_fit_recovers_exact_relationship() {
        let frame = DataFrame::from_reader(exact_csv(40).as_bytes(), b';').unwrap();
        let artifact = Trainer::builder()
            .categorical_columns(["school", "sex"])
            .build()
            .fit(&frame)
            .unwrap();

        let metadata = artifact.metadata();
        assert_eq!(metadata.feature_names, vec!["age", "G2", "school_MS", "sex_M"]);
        assert_eq!(metadata.train_size, 32);
        assert_eq!(metadata.test_size, 8);
        assert_abs_diff_eq!(metadata.mse, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(metadata.r2, 1.0, epsilon = 1e-9);

        let weights = artifact.model().coefficients();
        assert_abs_diff_eq!(weights[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(weights[1], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(weights[2], 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(weights[3], -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(artifact.model().intercept(), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_fit_missing_target() {
        let frame = DataFrame::from_reader(exact_csv(10).as_bytes(), b';').unwrap();
        let result = Trainer::builder()
            .target("G4")
            .categorical_columns(["school", "sex"])
            .build()
            .fit(&frame);
        assert!(matches!(result, Err(GradeError::Dataset(_))));
    }

    #[test]
    fn test_train_and_save_writes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("students.csv");
        std::fs::write(&dataset, exact_csv(50)).unwrap();

        let report = trainer(&dir.path().join("artifacts"))
            .train_and_save(&dataset)
            .unwrap();
        assert_eq!(report.train_size, 40);
        assert_eq!(report.test_size, 10);
        assert_eq!(report.n_features, 4);
        assert!(report.model_path.is_file());
        assert!(report.metadata_path.is_file());

        let loaded = ModelArtifact::load(&ArtifactPaths::in_dir(dir.path().join("artifacts"))).unwrap();
        assert_eq!(loaded.metadata().categorical_columns, vec!["school", "sex"]);
        assert_abs_diff_eq!(loaded.metadata().r2, report.r2);
    }

    #[test]
    fn test_missing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainingConfig {
            artifact_dir: dir.path().to_path_buf(),
            ..TrainingConfig::default()
        };
        let err = train_and_save(dir.path().join("nope.csv"), &config).unwrap_err();
        assert!(matches!(err, GradeError::DatasetNotFound { .. }));
        assert!(err.kind().is_not_ready());
        assert!(!config.artifact_paths().exists());
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("students.csv");
        std::fs::write(&dataset, exact_csv(10)).unwrap();
        let result = Trainer::builder().delimiter('§').build().train_and_save(&dataset);
        assert!(matches!(result, Err(GradeError::Dataset(_))));
    }
}
