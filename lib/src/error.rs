//! Error types for training and inference.

use std::path::PathBuf;

/// Coarse classification of a [`GradeError`].
///
/// Callers map kinds to responses: [`ErrorKind::ModelUnavailable`] means the
/// service is not ready yet, everything else is a bad input or a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The trained artifact or its metadata is missing.
    ModelUnavailable,
    /// The training dataset could not be found.
    DatasetNotFound,
    /// Caller-supplied data failed validation.
    InvalidInput,
    /// Unexpected failure during training or scoring.
    Internal,
}

impl ErrorKind {
    /// Returns `true` for deployment preconditions that an operator has to fix.
    ///
    /// Retrying such a request without fixing the deployment is pointless.
    pub fn is_not_ready(self) -> bool {
        matches!(self, ErrorKind::ModelUnavailable | ErrorKind::DatasetNotFound)
    }
}

/// Error type for every fallible operation in this crate.
#[derive(Debug, thiserror::Error)]
pub enum GradeError {
    #[error("model artifact not found at {}; train a model first", path.display())]
    ModelUnavailable { path: PathBuf },

    #[error("dataset not found at {}", path.display())]
    DatasetNotFound { path: PathBuf },

    #[error("invalid value for `{field}`: {reason}")]
    InvalidRecord { field: String, reason: String },

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("training failed: {0}")]
    Training(String),

    #[error("prediction failed: {0}")]
    Internal(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GradeError {
    pub(crate) fn invalid_record(field: impl Into<String>, reason: impl Into<String>) -> Self {
        GradeError::InvalidRecord {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Classifies the error for response mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GradeError::ModelUnavailable { .. } => ErrorKind::ModelUnavailable,
            GradeError::DatasetNotFound { .. } => ErrorKind::DatasetNotFound,
            GradeError::InvalidRecord { .. } | GradeError::Dataset(_) | GradeError::Json(_) => {
                ErrorKind::InvalidInput
            }
            GradeError::Training(_)
            | GradeError::Internal(_)
            | GradeError::Io(_)
            | GradeError::Csv(_)
            | GradeError::Serialization(_) => ErrorKind::Internal,
        }
    }
}

/// Result alias defaulting to [`GradeError`].
pub type Result<T, E = GradeError> = std::result::Result<T, E>;
