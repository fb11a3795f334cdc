//! Metrics for evaluating the regression on held-out rows.

use crate::error::{GradeError, Result};
use serde::{Deserialize, Serialize};

/// Regression metrics over paired slices of true and predicted values.
pub struct Metrics;

impl Metrics {
    fn check(y_true: &[f64], y_pred: &[f64]) -> Result<()> {
        if y_true.len() != y_pred.len() {
            return Err(GradeError::Training(format!(
                "cannot score {} predictions against {} targets",
                y_pred.len(),
                y_true.len()
            )));
        }
        if y_true.is_empty() {
            return Err(GradeError::Training("cannot score an empty set".into()));
        }
        Ok(())
    }

    /// Mean squared error: `mean((y_true - y_pred)^2)`.
    pub fn mse(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
        Self::check(y_true, y_pred)?;
        let sum_sq: f64 = y_true
            .iter()
            .zip(y_pred)
            .map(|(&t, &p)| (t - p).powi(2))
            .sum();
        Ok(sum_sq / y_true.len() as f64)
    }

    /// Coefficient of determination, `1 - SS_res / SS_tot`.
    ///
    /// Negative when the model does worse than predicting the mean. With a
    /// constant target the score is 1 for a perfect fit and 0 otherwise.
    pub fn r_squared(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
        Self::check(y_true, y_pred)?;
        let mean_true = y_true.iter().sum::<f64>() / y_true.len() as f64;

        let ss_res: f64 = y_true
            .iter()
            .zip(y_pred)
            .map(|(&t, &p)| (t - p).powi(2))
            .sum();
        let ss_tot: f64 = y_true.iter().map(|&t| (t - mean_true).powi(2)).sum();

        if ss_tot == 0.0 {
            return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
        }
        Ok(1.0 - ss_res / ss_tot)
    }

    /// MSE and R² together.
    pub fn evaluate(y_true: &[f64], y_pred: &[f64]) -> Result<RegressionMetrics> {
        Ok(RegressionMetrics {
            mse: Self::mse(y_true, y_pred)?,
            r2: Self::r_squared(y_true, y_pred)?,
        })
    }
}

/// Held-out scores of a trained model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub r2: f64,
}
