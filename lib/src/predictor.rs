//! Grade prediction against a persisted artifact.
//!
//! A [`Predictor`] is cheap to construct: it only records where the artifact
//! lives. The files are read on the first call that needs them and the loaded
//! artifact is shared, read-only, by every later call and thread. A failed
//! load is not cached, so once the files appear the next request succeeds.

use crate::align::clamp_grade;
use crate::artifact::{ArtifactPaths, ModelArtifact};
use crate::error::{GradeError, Result};
use crate::record::{InputRecord, StudentRecord};
use serde::Serialize;
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::{debug, info, warn};

/// Model family reported by [`Predictor::model_info`].
pub const MODEL_TYPE: &str = "Linear Regression";

/// A predicted final grade.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Prediction {
    /// Score clamped to the grade domain.
    pub predicted_grade: f64,
    /// Model output before clamping.
    pub raw_score: f64,
}

impl Prediction {
    /// The grade rounded to two decimals, as shown to users.
    pub fn rounded(&self) -> f64 {
        (self.predicted_grade * 100.0).round() / 100.0
    }
}

/// Summary of the loaded model, with metrics rounded to four decimals.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model_type: &'static str,
    pub mean_squared_error: f64,
    pub r2_score: f64,
    pub train_samples: usize,
    pub test_samples: usize,
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Lazily loading, thread-safe grade predictor.
#[derive(Debug)]
pub struct Predictor {
    paths: ArtifactPaths,
    artifact: OnceLock<ModelArtifact>,
    init_lock: Mutex<()>,
    #[cfg(test)]
    loads: std::sync::atomic::AtomicUsize,
}

impl Predictor {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths,
            artifact: OnceLock::new(),
            init_lock: Mutex::new(()),
            #[cfg(test)]
            loads: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Predictor for the standard file names inside `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(ArtifactPaths::in_dir(dir))
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    pub fn is_loaded(&self) -> bool {
        self.artifact.get().is_some()
    }

    /// The loaded artifact, reading it from disk on first use.
    ///
    /// Concurrent first callers serialize on an init lock so the files are
    /// read once.
    ///
    /// # Errors
    /// [`GradeError::ModelUnavailable`] when either file is missing, or the
    /// decoding error when a file is corrupt.
    pub fn artifact(&self) -> Result<&ModelArtifact> {
        if let Some(artifact) = self.artifact.get() {
            return Ok(artifact);
        }

        // The guarded section only touches the OnceLock, so a poisoned lock
        // carries no broken state.
        let _guard = self.init_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(artifact) = self.artifact.get() {
            return Ok(artifact);
        }

        #[cfg(test)]
        self.loads.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let loaded = match ModelArtifact::load(&self.paths) {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(error = %e, "model artifact could not be loaded");
                return Err(e);
            }
        };
        info!(
            model = %self.paths.model.display(),
            features = loaded.schema().len(),
            "model artifact loaded"
        );
        Ok(self.artifact.get_or_init(|| loaded))
    }

    /// Validates `record` and predicts its final grade.
    ///
    /// # Errors
    /// [`GradeError::InvalidRecord`] before the model is touched, then
    /// anything [`Predictor::predict_record`] returns.
    pub fn predict(&self, record: &StudentRecord) -> Result<Prediction> {
        record.validate()?;
        self.predict_record(&record.to_input_record())
    }

    /// Predicts the final grade of a loose record.
    ///
    /// Missing fields count as 0 or as the reference level; unknown fields
    /// are ignored.
    pub fn predict_record(&self, record: &InputRecord) -> Result<Prediction> {
        let raw_score = self.artifact()?.score(record)?;
        if raw_score.is_nan() {
            return Err(GradeError::Internal("model produced NaN".into()));
        }
        let predicted_grade = clamp_grade(raw_score);
        debug!(raw_score, predicted_grade, "prediction");
        Ok(Prediction {
            predicted_grade,
            raw_score,
        })
    }

    /// Type, held-out metrics and split sizes of the loaded model.
    pub fn model_info(&self) -> Result<ModelInfo> {
        let metadata = self.artifact()?.metadata();
        Ok(ModelInfo {
            model_type: MODEL_TYPE,
            mean_squared_error: round4(metadata.mse),
            r2_score: round4(metadata.r2),
            train_samples: metadata.train_size,
            test_samples: metadata.test_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ModelMetadata;
    use crate::model::linear::{LinearModel, LinearParams};
    use crate::model::Fitted;
    use ndarray::array;

    fn save_artifact(dir: &Path, weights: ndarray::Array1<f64>, bias: f64) {
        let model = LinearModel::<Fitted>::new(LinearParams { weights, bias });
        let metadata = ModelMetadata {
            feature_names: vec!["G2".into(), "school_MS".into(), "sex_M".into()],
            categorical_columns: vec!["school".into(), "sex".into()],
            mse: 3.456789,
            r2: 0.812345678,
            train_size: 316,
            test_size: 79,
        };
        ModelArtifact::new(model, metadata)
            .unwrap()
            .save(&ArtifactPaths::in_dir(dir))
            .unwrap();
    }

    #[test]
    fn test_missing_artifact_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = Predictor::from_dir(dir.path());
        let err = predictor
            .predict(&StudentRecord::default())
            .unwrap_err();
        assert!(matches!(err, GradeError::ModelUnavailable { .. }));
        assert!(err.kind().is_not_ready());
        assert!(!predictor.is_loaded());
    }

    #[test]
    fn test_failed_load_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = Predictor::from_dir(dir.path());
        assert!(predictor.model_info().is_err());

        save_artifact(dir.path(), array![1.0, 2.0, -1.0], 0.5);
        assert!(predictor.model_info().is_ok());
        assert!(predictor.is_loaded());
    }

    #[test]
    fn test_predict_and_clamp() {
        let dir = tempfile::tempdir().unwrap();
        save_artifact(dir.path(), array![1.0, 2.0, -1.0], 0.5);
        let predictor = Predictor::from_dir(dir.path());

        let ms_female = InputRecord::new().with("G2", 12).with("school", "MS").with("sex", "F");
        let p = predictor.predict_record(&ms_female).unwrap();
        assert_eq!(p.raw_score, 14.5);
        assert_eq!(p.predicted_grade, 14.5);

        let high = InputRecord::new().with("G2", 30);
        let p = predictor.predict_record(&high).unwrap();
        assert_eq!(p.raw_score, 30.5);
        assert_eq!(p.predicted_grade, 20.0);

        let low = InputRecord::new().with("G2", 0).with("sex", "M");
        let p = predictor.predict_record(&low).unwrap();
        assert_eq!(p.raw_score, -0.5);
        assert_eq!(p.predicted_grade, 0.0);
    }

    #[test]
    fn test_predict_validates_first() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = Predictor::from_dir(dir.path());
        let record = StudentRecord {
            sex: "X".into(),
            ..StudentRecord::default()
        };
        assert!(matches!(
            predictor.predict(&record),
            Err(GradeError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_predict_student_record() {
        let dir = tempfile::tempdir().unwrap();
        save_artifact(dir.path(), array![1.0, 2.0, -1.0], 0.5);
        let predictor = Predictor::from_dir(dir.path());
        let record = StudentRecord {
            g2: 15,
            sex: "M".into(),
            ..StudentRecord::default()
        };
        let p = predictor.predict(&record).unwrap();
        assert_eq!(p.raw_score, 14.5);
    }

    #[test]
    fn test_nan_score_is_internal() {
        let dir = tempfile::tempdir().unwrap();
        save_artifact(dir.path(), array![1.0, 2.0, -1.0], 0.5);
        let predictor = Predictor::from_dir(dir.path());
        let record = InputRecord::new().with("G2", f64::NAN);
        assert!(matches!(
            predictor.predict_record(&record),
            Err(GradeError::Internal(_))
        ));
    }

    #[test]
    fn test_model_info_rounds_metrics() {
        let dir = tempfile::tempdir().unwrap();
        save_artifact(dir.path(), array![1.0, 2.0, -1.0], 0.5);
        let info = Predictor::from_dir(dir.path()).model_info().unwrap();
        assert_eq!(
            info,
            ModelInfo {
                model_type: "Linear Regression",
                mean_squared_error: 3.4568,
                r2_score: 0.8123,
                train_samples: 316,
                test_samples: 79,
            }
        );
    }

    #[test]
    fn test_rounded() {
        let p = Prediction {
            predicted_grade: 13.456,
            raw_score: 13.456,
        };
        assert_eq!(p.rounded(), 13.46);
    }

    #[test]
    fn test_concurrent_first_use_loads_once() {
        use std::sync::atomic::Ordering;
        use std::sync::Barrier;

        let dir = tempfile::tempdir().unwrap();
        save_artifact(dir.path(), array![1.0, 2.0, -1.0], 0.5);
        let predictor = Predictor::from_dir(dir.path());
        let start = Barrier::new(8);

        let loaded: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        start.wait();
                        predictor.artifact().map(|a| a as *const ModelArtifact as usize)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap().unwrap())
                .collect()
        });

        assert!(loaded.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(predictor.loads.load(Ordering::SeqCst), 1);

        predictor.predict_record(&InputRecord::new()).unwrap();
        predictor.model_info().unwrap();
        assert_eq!(predictor.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_loads_are_counted_until_success() {
        use std::sync::atomic::Ordering;

        let dir = tempfile::tempdir().unwrap();
        let predictor = Predictor::from_dir(dir.path());
        assert!(predictor.artifact().is_err());
        assert!(predictor.artifact().is_err());
        assert_eq!(predictor.loads.load(Ordering::SeqCst), 2);

        save_artifact(dir.path(), array![1.0, 2.0, -1.0], 0.5);
        predictor.artifact().unwrap();
        predictor.artifact().unwrap();
        assert_eq!(predictor.loads.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_predictor_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Predictor>();
    }
}
