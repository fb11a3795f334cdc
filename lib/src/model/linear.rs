//! Ordinary least squares linear regression.
//!
//! - [`LinearRegression`] = `LinearModel<Unfitted>`, consumed by [`LinearRegression::fit`].
//! - `LinearModel<Fitted>`, inference-only and serializable through
//!   [`SerializableLinearParams`].
//!
//! Fitting solves the centered normal equations `XcᵀXc w = Xcᵀyc` with a
//! Cholesky factorization and recovers the intercept as `ȳ - x̄·w`.

use crate::error::{GradeError, Result};
use crate::model::{Fitted, InferenceModel, Unfitted};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Relative pivot below which the factorization is treated as singular.
const PIVOT_TOLERANCE: f64 = 1e-12;
/// Diagonal jitter applied on the first retry, relative to the largest diagonal entry.
const INITIAL_JITTER: f64 = 1e-10;
const MAX_JITTER_ATTEMPTS: usize = 8;

/// Learned parameters of a linear model: weights and bias.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearParams {
    pub weights: Array1<f64>,
    pub bias: f64,
}

/// Serializable representation of linear model parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializableLinearParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl From<&LinearParams> for SerializableLinearParams {
    fn from(params: &LinearParams) -> Self {
        Self {
            weights: params.weights.to_vec(),
            bias: params.bias,
        }
    }
}

impl From<SerializableLinearParams> for LinearParams {
    fn from(value: SerializableLinearParams) -> Self {
        Self {
            weights: Array1::from(value.weights),
            bias: value.bias,
        }
    }
}

/// A linear model with its state encoded at the type level.
///
/// `predict()` only exists on `LinearModel<Fitted>`.
#[derive(Clone, Debug)]
pub struct LinearModel<S> {
    params: LinearParams,
    _state: PhantomData<S>,
}

/// Alias for an unfitted linear regression model.
pub type LinearRegression = LinearModel<Unfitted>;

impl LinearRegression {
    /// Creates a zero-initialized model for `n_features` inputs.
    pub fn new(n_features: usize) -> Self {
        Self {
            params: LinearParams {
                weights: Array1::zeros(n_features),
                bias: 0.0,
            },
            _state: PhantomData,
        }
    }

    /// Number of features the model was declared with.
    pub fn n_features(&self) -> usize {
        self.params.weights.len()
    }

    /// Fits ordinary least squares with an intercept.
    ///
    /// Columns without variance in `x` (for example an indicator that never
    /// fires in the training rows) end up with a weight of zero.
    ///
    /// # Errors
    /// [`GradeError::Training`] when `x` has no rows, its width differs from
    /// the declared feature count, `y` has a different length, or the system
    /// stays singular after regularization.
    pub fn fit(self, x: &Array2<f64>, y: &Array1<f64>) -> Result<LinearModel<Fitted>> {
        let (n_samples, n_features) = x.dim();
        if n_samples == 0 {
            return Err(GradeError::Training(
                "cannot fit a linear model on zero samples".into(),
            ));
        }
        if n_features != self.n_features() {
            return Err(GradeError::Training(format!(
                "expected {} feature columns, got {}",
                self.n_features(),
                n_features
            )));
        }
        if y.len() != n_samples {
            return Err(GradeError::Training(format!(
                "x has {} rows but y has {} values",
                n_samples,
                y.len()
            )));
        }

        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| GradeError::Training("empty design matrix".into()))?;
        let y_mean = y.sum() / n_samples as f64;

        let x_centered = x - &x_mean;
        let y_centered = y - y_mean;

        let gram = x_centered.t().dot(&x_centered);
        let moment = x_centered.t().dot(&y_centered);
        let weights = solve_normal_equations(&gram, &moment)?;
        let bias = y_mean - x_mean.dot(&weights);

        Ok(LinearModel::<Fitted>::new(LinearParams { weights, bias }))
    }
}

impl LinearModel<Fitted> {
    /// Creates a fitted model from explicit parameters.
    pub fn new(params: LinearParams) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    /// Learned weights, one per feature column.
    pub fn coefficients(&self) -> &Array1<f64> {
        &self.params.weights
    }

    /// Learned intercept.
    pub fn intercept(&self) -> f64 {
        self.params.bias
    }
}

/// Implements inference for a trained linear model: `y = wᵀx + b`.
impl InferenceModel for LinearModel<Fitted> {
    type ParamsRepr = SerializableLinearParams;

    fn n_features(&self) -> usize {
        self.params.weights.len()
    }

    fn predict(&self, input: &[f64]) -> Result<f64> {
        if input.len() != self.n_features() {
            return Err(GradeError::Internal(format!(
                "model expects {} features, got {}",
                self.n_features(),
                input.len()
            )));
        }
        Ok(ArrayView1::from(input).dot(&self.params.weights) + self.params.bias)
    }

    fn predict_batch(&self, input: &Array2<f64>) -> Result<Array1<f64>> {
        if input.ncols() != self.n_features() {
            return Err(GradeError::Internal(format!(
                "model expects {} features, got {}",
                self.n_features(),
                input.ncols()
            )));
        }
        Ok(input.dot(&self.params.weights) + self.params.bias)
    }

    fn extract_params(&self) -> Self::ParamsRepr {
        (&self.params).into()
    }

    fn from_params(params: Self::ParamsRepr) -> Result<Self> {
        if !params.bias.is_finite() || params.weights.iter().any(|w| !w.is_finite()) {
            return Err(GradeError::Internal(
                "stored model parameters are not finite".into(),
            ));
        }
        Ok(Self::new(params.into()))
    }
}

/// Solves the symmetric positive semi-definite system `a · x = b`.
///
/// Tries a plain Cholesky factorization first. When a pivot collapses, the
/// diagonal is lifted by a jitter that grows tenfold per attempt.
fn solve_normal_equations(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let n = b.len();
    let scale = (0..n).map(|i| a[[i, i]]).fold(0.0_f64, f64::max).max(1.0);

    let mut jitter = 0.0;
    for _ in 0..MAX_JITTER_ATTEMPTS {
        if let Some(lower) = cholesky(a, jitter, scale * PIVOT_TOLERANCE) {
            return Ok(cholesky_solve(&lower, b));
        }
        jitter = if jitter == 0.0 {
            scale * INITIAL_JITTER
        } else {
            jitter * 10.0
        };
    }

    Err(GradeError::Training(
        "normal equations are singular even after regularization".into(),
    ))
}

/// Lower-triangular factor `L` with `L Lᵀ = a + jitter·I`, or `None` when a
/// pivot falls below `tolerance`.
fn cholesky(a: &Array2<f64>, jitter: f64, tolerance: f64) -> Option<Array2<f64>> {
    let n = a.nrows();
    let mut lower = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += lower[[i, k]] * lower[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] + jitter - sum;
                if diag <= tolerance {
                    return None;
                }
                lower[[i, i]] = diag.sqrt();
            } else {
                lower[[i, j]] = (a[[i, j]] - sum) / lower[[j, j]];
            }
        }
    }

    Some(lower)
}

fn cholesky_solve(lower: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = b.len();

    // L y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += lower[[i, j]] * y[j];
        }
        y[i] = (b[i] - sum) / lower[[i, i]];
    }

    // Lᵀ x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += lower[[j, i]] * x[j];
        }
        x[i] = (y[i] - sum) / lower[[i, i]];
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_linear_regression_new_zero_initialized() {
        let model = LinearRegression::new(3);
        assert_eq!(model.n_features(), 3);
    }

    #[test]
    fn test_fit_identity() {
        // y = x
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![1.0, 2.0, 3.0, 4.0];

        let fitted = LinearRegression::new(1).fit(&x, &y).unwrap();
        assert_abs_diff_eq!(fitted.coefficients()[0], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fitted.intercept(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fitted.predict(&[2.5]).unwrap(), 2.5, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_with_bias_two_features() {
        // y = 2*x0 - 3*x1 + 1
        let x = array![
            [0.0, 1.0],
            [1.0, 0.0],
            [2.0, 2.0],
            [3.0, 1.0],
            [4.0, 5.0],
            [5.0, 3.0]
        ];
        let y = x.map_axis(Axis(1), |row| 2.0 * row[0] - 3.0 * row[1] + 1.0);

        let fitted = LinearRegression::new(2).fit(&x, &y).unwrap();
        assert_abs_diff_eq!(fitted.coefficients()[0], 2.0, epsilon = 1e-8);
        assert_abs_diff_eq!(fitted.coefficients()[1], -3.0, epsilon = 1e-8);
        assert_abs_diff_eq!(fitted.intercept(), 1.0, epsilon = 1e-8);
    }

    #[test]
    fn test_constant_column_gets_zero_weight() {
        // Second column never varies, like an indicator absent from the split.
        let x = array![[1.0, 0.0], [2.0, 0.0], [3.0, 0.0], [4.0, 0.0]];
        let y = array![3.0, 5.0, 7.0, 9.0];

        let fitted = LinearRegression::new(2).fit(&x, &y).unwrap();
        assert_abs_diff_eq!(fitted.coefficients()[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(fitted.coefficients()[1], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(fitted.intercept(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_fit_without_features_predicts_mean() {
        let x = Array2::<f64>::zeros((3, 0));
        let y = array![1.0, 2.0, 6.0];

        let fitted = LinearRegression::new(0).fit(&x, &y).unwrap();
        assert_abs_diff_eq!(fitted.predict(&[]).unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_fit_rejects_empty_data() {
        let x = Array2::<f64>::zeros((0, 2));
        let y = Array1::<f64>::zeros(0);
        let result = LinearRegression::new(2).fit(&x, &y);
        assert!(matches!(result, Err(GradeError::Training(_))));
    }

    #[test]
    fn test_fit_rejects_length_mismatch() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 2.0, 3.0];
        let result = LinearRegression::new(1).fit(&x, &y);
        assert!(matches!(result, Err(GradeError::Training(_))));
    }

    #[test]
    fn test_fit_rejects_width_mismatch() {
        let x = array![[1.0, 2.0], [2.0, 3.0]];
        let y = array![1.0, 2.0];
        let result = LinearRegression::new(3).fit(&x, &y);
        assert!(matches!(result, Err(GradeError::Training(_))));
    }

    #[test]
    fn test_predict_wrong_length_is_internal() {
        let model = LinearModel::<Fitted>::new(LinearParams {
            weights: array![1.0, 2.0],
            bias: 0.5,
        });
        assert!(matches!(
            model.predict(&[1.0]),
            Err(GradeError::Internal(_))
        ));
    }

    #[test]
    fn test_predict_batch() {
        let model = LinearModel::<Fitted>::new(LinearParams {
            weights: array![1.0, 2.0],
            bias: 0.5,
        });
        let out = model
            .predict_batch(&array![[1.0, 1.0], [0.0, 2.0], [0.0, 0.0]])
            .unwrap();
        assert_eq!(out.to_vec(), vec![3.5, 4.5, 0.5]);
    }

    #[test]
    fn test_params_round_trip() {
        let model = LinearModel::<Fitted>::new(LinearParams {
            weights: array![0.25, -1.0, 3.0],
            bias: 2.0,
        });
        let repr = model.extract_params();
        assert_eq!(repr.weights, vec![0.25, -1.0, 3.0]);

        let restored = LinearModel::<Fitted>::from_params(repr).unwrap();
        assert_eq!(restored.coefficients(), model.coefficients());
        assert_eq!(restored.intercept(), 2.0);
    }

    #[test]
    fn test_from_params_rejects_nan() {
        let repr = SerializableLinearParams {
            weights: vec![1.0, f64::NAN],
            bias: 0.0,
        };
        assert!(LinearModel::<Fitted>::from_params(repr).is_err());
    }

    #[test]
    fn test_cholesky_solve_spd() {
        let a = array![[4.0, 2.0], [2.0, 3.0]];
        let b = array![2.0, 1.0];
        let x = solve_normal_equations(&a, &b).unwrap();
        // 4x + 2y = 2, 2x + 3y = 1  =>  x = 0.5, y = 0
        assert_abs_diff_eq!(x[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 0.0, epsilon = 1e-12);
    }
}
