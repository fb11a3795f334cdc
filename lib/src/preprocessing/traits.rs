//! Core traits for preprocessing transformers.
//!
//! - [`Transformer`]: configured but unfitted; learns from training data.
//! - [`FittedTransformer`]: carries learned state and transforms new data.

use crate::error::Result;

/// Trait for unfitted transformers with hyperparameters.
///
/// # Example
/// ```ignore
/// use gradecast::preprocessing::{OneHotEncoder, Transformer};
///
/// let encoder = OneHotEncoder::new(["school", "sex"]);
/// let fitted = encoder.fit(&frame)?;
/// let matrix = fitted.transform(&frame)?;
/// ```
pub trait Transformer: Clone {
    /// Input data type.
    type Input;
    /// Output data type after transformation.
    type Output;
    /// The fitted transformer type.
    type Fitted: FittedTransformer<Input = Self::Input, Output = Self::Output>;

    /// Learns parameters from the training data.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted>;

    /// Fits and transforms the same data in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output> {
        self.fit(data)?.transform(data)
    }
}

/// Trait for fitted transformers ready for inference.
pub trait FittedTransformer: Clone {
    /// Input data type.
    type Input;
    /// Output data type after transformation.
    type Output;

    /// Transforms data using the learned parameters.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output>;

    /// Number of columns produced by [`FittedTransformer::transform`].
    fn n_features_out(&self) -> usize;
}
