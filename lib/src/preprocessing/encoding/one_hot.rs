//! One-hot (dummy) encoding of categories.
//!
//! Each categorical column expands into one 0/1 column per level, except the
//! first level, which becomes the reference and is absorbed by the model
//! intercept. String levels sort lexicographically; a listed column whose
//! cells are all numbers sorts its levels numerically and names them with
//! `f64`'s `Display` (`Medu_1`, `Medu_2.5`). Columns not listed as
//! categorical pass through unchanged and come first in the output.

use crate::dataset::{Column, DataFrame};
use crate::error::{GradeError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::schema::{FeatureColumn, FeatureSchema};
use ndarray::{Array2, ArrayView1};
use std::collections::BTreeSet;

/// One-hot encoder for the categorical columns of a [`DataFrame`].
///
/// # Example
/// ```ignore
/// let encoder = OneHotEncoder::new(["school", "sex"]);
/// let fitted = encoder.fit(&frame)?;
/// // numeric columns first, then school_MS, sex_M
/// let matrix = fitted.transform(&frame)?;
/// ```
#[derive(Clone, Debug)]
pub struct OneHotEncoder {
    columns: Vec<String>,
}

impl OneHotEncoder {
    /// Creates an encoder for `columns`, expanded in the given order.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Levels learned for one categorical column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryLevels {
    pub field: String,
    /// Dropped level, encoded as all zeros.
    pub reference: String,
    /// Levels with an indicator column, in output order.
    pub levels: Vec<String>,
}

/// Fitted encoder ready to transform frames with the training layout.
#[derive(Clone, Debug)]
pub struct FittedOneHotEncoder {
    passthrough: Vec<String>,
    categories: Vec<CategoryLevels>,
    n_features_out: usize,
}

impl FittedOneHotEncoder {
    /// Levels learned for each categorical column.
    pub fn categories(&self) -> &[CategoryLevels] {
        &self.categories
    }

    /// Numeric columns copied through, in frame order.
    pub fn passthrough(&self) -> &[String] {
        &self.passthrough
    }

    /// Layout of the transformed matrix.
    pub fn schema(&self) -> FeatureSchema {
        let numeric = self.passthrough.iter().map(FeatureColumn::numeric);
        let indicators = self.categories.iter().flat_map(|category| {
            category
                .levels
                .iter()
                .map(move |level| FeatureColumn::indicator(category.field.as_str(), level.as_str()))
        });
        FeatureSchema::new(numeric.chain(indicators).collect())
    }
}

/// Distinct values of `field` in encoding order.
fn sorted_levels(data: &DataFrame, field: &str) -> Result<Vec<String>> {
    match data.column(field) {
        Some(Column::Numeric(values)) => {
            let mut values = values.clone();
            values.sort_by(f64::total_cmp);
            values.dedup();
            Ok(values.iter().map(f64::to_string).collect())
        }
        _ => {
            let labels = data.labels(field)?;
            let sorted: BTreeSet<&str> = labels.iter().map(String::as_str).collect();
            Ok(sorted.into_iter().map(str::to_string).collect())
        }
    }
}

impl Transformer for OneHotEncoder {
    type Input = DataFrame;
    type Output = Array2<f64>;
    type Fitted = FittedOneHotEncoder;

    /// # Errors
    /// [`GradeError::Dataset`] when the frame is empty, a listed column is
    /// missing or listed twice, or an unlisted column holds strings.
    fn fit(&self, data: &DataFrame) -> Result<FittedOneHotEncoder> {
        if data.n_rows() == 0 {
            return Err(GradeError::Dataset(
                "cannot fit OneHotEncoder on empty data".into(),
            ));
        }

        let mut categories = Vec::with_capacity(self.columns.len());
        for (i, field) in self.columns.iter().enumerate() {
            if self.columns[..i].contains(field) {
                return Err(GradeError::Dataset(format!(
                    "categorical column `{}` listed twice",
                    field
                )));
            }
            let mut levels = sorted_levels(data, field)?.into_iter();
            let reference = levels.next().ok_or_else(|| {
                GradeError::Dataset(format!("categorical column `{}` has no values", field))
            })?;
            categories.push(CategoryLevels {
                field: field.clone(),
                reference,
                levels: levels.collect(),
            });
        }

        let mut passthrough = Vec::new();
        for (name, column) in data.iter() {
            if self.columns.iter().any(|c| c == name) {
                continue;
            }
            match column {
                Column::Numeric(_) => passthrough.push(name.to_string()),
                Column::Categorical(_) => {
                    return Err(GradeError::Dataset(format!(
                        "column `{}` is not numeric and is not listed as categorical",
                        name
                    )))
                }
            }
        }

        let n_features_out =
            passthrough.len() + categories.iter().map(|c| c.levels.len()).sum::<usize>();
        Ok(FittedOneHotEncoder {
            passthrough,
            categories,
            n_features_out,
        })
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    type Input = DataFrame;
    type Output = Array2<f64>;

    fn transform(&self, data: &DataFrame) -> Result<Array2<f64>> {
        let mut out = Array2::<f64>::zeros((data.n_rows(), self.n_features_out));

        for (j, name) in self.passthrough.iter().enumerate() {
            out.column_mut(j)
                .assign(&ArrayView1::from(data.numeric(name)?));
        }

        let mut offset = self.passthrough.len();
        for category in &self.categories {
            for (row, value) in data.labels(&category.field)?.iter().enumerate() {
                // Unknown levels and the reference level both leave the row at zero.
                if let Some(k) = category.levels.iter().position(|level| level == value) {
                    out[[row, offset + k]] = 1.0;
                }
            }
            offset += category.levels.len();
        }

        Ok(out)
    }

    fn n_features_out(&self) -> usize {
        self.n_features_out
    }
}
