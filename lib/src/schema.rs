//! The ordered feature layout shared by training and inference.
//!
//! A [`FeatureSchema`] lists the model's input columns in the exact order
//! they were fitted: numeric features first (dataset order, target removed),
//! then one indicator column `<field>_<level>` per non-reference level of each
//! categorical field. Inference rebuilds vectors by walking this list, so any
//! drift between the two sides silently produces wrong predictions.

use crate::error::{GradeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One input column of the model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureColumn {
    /// A numeric field copied as-is.
    Numeric { name: String },
    /// A 0/1 column that is set when `field` equals `level`.
    Indicator { field: String, level: String },
}

impl FeatureColumn {
    pub fn numeric(name: impl Into<String>) -> Self {
        FeatureColumn::Numeric { name: name.into() }
    }

    pub fn indicator(field: impl Into<String>, level: impl Into<String>) -> Self {
        FeatureColumn::Indicator {
            field: field.into(),
            level: level.into(),
        }
    }

    /// Column name as it appears in the feature-name list.
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// The record field this column reads.
    pub fn field(&self) -> &str {
        match self {
            FeatureColumn::Numeric { name } => name,
            FeatureColumn::Indicator { field, .. } => field,
        }
    }
}

impl fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureColumn::Numeric { name } => f.write_str(name),
            FeatureColumn::Indicator { field, level } => write!(f, "{}_{}", field, level),
        }
    }
}

/// Ordered list of model input columns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<FeatureColumn>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<FeatureColumn>) -> Self {
        Self { columns }
    }

    /// Rebuilds a schema from a flat feature-name list.
    ///
    /// A name is an indicator when it starts with `<field>_` for one of the
    /// `categorical_fields`; the longest matching field wins. Every other name
    /// is numeric.
    ///
    /// # Errors
    /// [`GradeError::Dataset`] when a name repeats or an indicator has an
    /// empty level.
    pub fn from_feature_names<S: AsRef<str>>(
        names: &[String],
        categorical_fields: &[S],
    ) -> Result<Self> {
        let mut columns: Vec<FeatureColumn> = Vec::with_capacity(names.len());
        for name in names {
            let field = categorical_fields
                .iter()
                .map(<S as AsRef<str>>::as_ref)
                .filter(|field| {
                    name.len() > field.len()
                        && name.starts_with(field)
                        && name.as_bytes()[field.len()] == b'_'
                })
                .max_by_key(|field| field.len());

            let column = match field {
                Some(field) => {
                    let level = &name[field.len() + 1..];
                    if level.is_empty() {
                        return Err(GradeError::Dataset(format!(
                            "indicator column `{}` has no level",
                            name
                        )));
                    }
                    FeatureColumn::indicator(field, level)
                }
                None => FeatureColumn::numeric(name.as_str()),
            };
            if columns.iter().any(|c| c.name() == *name) {
                return Err(GradeError::Dataset(format!(
                    "duplicate feature column `{}`",
                    name
                )));
            }
            columns.push(column);
        }
        Ok(Self { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    /// Flat column names in schema order.
    pub fn feature_names(&self) -> Vec<String> {
        self.columns.iter().map(FeatureColumn::name).collect()
    }

    /// Position of the column called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Indicator columns of `field` as `(position, level)` pairs.
    pub fn indicators<'a>(&'a self, field: &'a str) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        self.columns
            .iter()
            .enumerate()
            .filter_map(move |(i, column)| match column {
                FeatureColumn::Indicator { field: f, level } if f == field => {
                    Some((i, level.as_str()))
                }
                _ => None,
            })
    }

    /// Names of the numeric columns in schema order.
    pub fn numeric_fields(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().filter_map(|column| match column {
            FeatureColumn::Numeric { name } => Some(name.as_str()),
            FeatureColumn::Indicator { .. } => None,
        })
    }
}
