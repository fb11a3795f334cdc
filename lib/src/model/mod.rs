//! Models with their training state encoded in the type.
//!
//! A model starts [`Unfitted`], and fitting consumes it and yields the
//! [`Fitted`] form, which is the only one that implements [`InferenceModel`].

pub mod linear;

use crate::error::Result;
use crate::serialization::SerializableParams;
use ndarray::{Array1, Array2};

/// Marker for a model that has not been fitted yet.
#[derive(Debug, Clone, Copy)]
pub struct Unfitted;

/// Marker for a model that carries learned parameters.
#[derive(Debug, Clone, Copy)]
pub struct Fitted;

/// Prediction interface of a fitted model.
pub trait InferenceModel {
    /// Plain-data representation written to disk.
    type ParamsRepr: SerializableParams;

    /// Number of features the model expects per sample.
    fn n_features(&self) -> usize;

    /// Score a single feature vector.
    fn predict(&self, input: &[f64]) -> Result<f64>;

    /// Score every row of `input`.
    fn predict_batch(&self, input: &Array2<f64>) -> Result<Array1<f64>>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::ParamsRepr;

    /// Reconstruct a fitted model from its parameters.
    fn from_params(params: Self::ParamsRepr) -> Result<Self>
    where
        Self: Sized;
}
