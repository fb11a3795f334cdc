//! The persisted model artifact.
//!
//! Training writes two files into an artifact directory:
//!
//! - `trained_model.bin`: the fitted linear model parameters;
//! - `model_metadata.bin`: the ordered feature names, the categorical columns
//!   used for expansion, held-out metrics and split sizes.
//!
//! Both are bincode-encoded and only have to round-trip through this crate.

use crate::align::align;
use crate::error::{GradeError, Result};
use crate::model::linear::{LinearModel, SerializableLinearParams};
use crate::model::{Fitted, InferenceModel};
use crate::record::InputRecord;
use crate::schema::FeatureSchema;
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MODEL_FILE: &str = "trained_model.bin";
pub const METADATA_FILE: &str = "model_metadata.bin";

/// Locations of the two artifact files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub metadata: PathBuf,
}

impl ArtifactPaths {
    /// Standard file names inside `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(MODEL_FILE),
            metadata: dir.join(METADATA_FILE),
        }
    }

    /// Whether both files are present.
    pub fn exists(&self) -> bool {
        self.model.is_file() && self.metadata.is_file()
    }

    fn first_missing(&self) -> Option<&Path> {
        [&self.model, &self.metadata]
            .into_iter()
            .find(|path| !path.is_file())
            .map(PathBuf::as_path)
    }
}

/// Everything inference needs to know about how the model was trained.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model input columns in fitted order.
    pub feature_names: Vec<String>,
    /// Fields that were expanded into indicator columns.
    pub categorical_columns: Vec<String>,
    pub mse: f64,
    pub r2: f64,
    pub train_size: usize,
    pub test_size: usize,
}

/// A fitted model together with the schema it was trained on.
#[derive(Clone, Debug)]
pub struct ModelArtifact {
    model: LinearModel<Fitted>,
    schema: FeatureSchema,
    metadata: ModelMetadata,
}

impl ModelArtifact {
    /// Pairs a model with its metadata.
    ///
    /// # Errors
    /// [`GradeError::Internal`] when the feature-name list cannot be parsed
    /// or its length differs from the model's weight count.
    pub fn new(model: LinearModel<Fitted>, metadata: ModelMetadata) -> Result<Self> {
        let schema =
            FeatureSchema::from_feature_names(&metadata.feature_names, &metadata.categorical_columns)
                .map_err(|e| GradeError::Internal(format!("corrupt feature list: {}", e)))?;
        if schema.len() != model.n_features() {
            return Err(GradeError::Internal(format!(
                "metadata lists {} features but the model has {} weights",
                schema.len(),
                model.n_features()
            )));
        }
        Ok(Self {
            model,
            schema,
            metadata,
        })
    }

    /// Writes both files, creating parent directories as needed.
    pub fn save(&self, paths: &ArtifactPaths) -> Result<()> {
        for path in [&paths.model, &paths.metadata] {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
        }
        self.model.extract_params().save_to_file(&paths.model)?;
        self.metadata.save_to_file(&paths.metadata)?;
        Ok(())
    }

    /// Reads both files.
    ///
    /// # Errors
    /// [`GradeError::ModelUnavailable`] naming the first missing file.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        if let Some(missing) = paths.first_missing() {
            return Err(GradeError::ModelUnavailable {
                path: missing.to_path_buf(),
            });
        }
        let params = SerializableLinearParams::load_from_file(&paths.model)?;
        let metadata = ModelMetadata::load_from_file(&paths.metadata)?;
        Self::new(LinearModel::<Fitted>::from_params(params)?, metadata)
    }

    pub fn model(&self) -> &LinearModel<Fitted> {
        &self.model
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Raw (unclamped) model score for `record`.
    pub fn score(&self, record: &InputRecord) -> Result<f64> {
        self.model.predict(&align(record, &self.schema))
    }
}
