//! Tabular training data.
//!
//! A [`DataFrame`] is a set of named, equally long columns loaded from a
//! delimited text file. Each column is typed once at load time:
//!
//! - **Numeric**: every value parses as `f64`.
//! - **Categorical**: anything else; values are kept as trimmed strings.
//!
//! Column order is preserved because it determines the order of the numeric
//! features in the trained schema.
//!
//! # Example
//!
//! ```rust
//! use gradecast::dataset::DataFrame;
//!
//! let csv = "school;age;G3\nGP;17;12\nMS;18;9\n";
//! let frame = DataFrame::from_reader(csv.as_bytes(), b';').unwrap();
//! assert_eq!(frame.n_rows(), 2);
//! assert_eq!(frame.column_names(), ["school", "age", "G3"]);
//! assert!(frame.numeric("age").is_ok());
//! assert!(frame.categorical("school").is_ok());
//! ```

use crate::error::{GradeError, Result};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A typed column of a [`DataFrame`].
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl Column {
    /// Number of values in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Types a column of raw cells: numeric when every cell parses.
    fn from_raw(cells: Vec<String>) -> Self {
        let parsed: Option<Vec<f64>> = cells.iter().map(|c| c.parse::<f64>().ok()).collect();
        match parsed {
            Some(values) if !cells.is_empty() => Column::Numeric(values),
            _ => Column::Categorical(cells),
        }
    }
}

/// Named, equally long columns.
#[derive(Clone, Debug, PartialEq)]
pub struct DataFrame {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl DataFrame {
    /// Builds a frame from already typed columns.
    ///
    /// # Errors
    /// [`GradeError::Dataset`] when names and columns disagree in count, a
    /// name is repeated, or the columns differ in length.
    pub fn from_columns(names: Vec<String>, columns: Vec<Column>) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(GradeError::Dataset(format!(
                "{} column names for {} columns",
                names.len(),
                columns.len()
            )));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(GradeError::Dataset(format!("duplicate column `{}`", name)));
            }
        }
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some((name, column)) = names
            .iter()
            .zip(&columns)
            .find(|(_, column)| column.len() != n_rows)
        {
            return Err(GradeError::Dataset(format!(
                "column `{}` has {} rows, expected {}",
                name,
                column.len(),
                n_rows
            )));
        }
        Ok(Self {
            names,
            columns,
            n_rows,
        })
    }

    /// Loads a delimited file with a header row.
    pub fn from_csv_path<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file), delimiter)
    }

    /// Loads delimited text with a header row from any reader.
    ///
    /// # Errors
    /// [`GradeError::Csv`] on malformed records (including ragged rows) and
    /// [`GradeError::Dataset`] when the input has no data rows.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let names: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];

        for result in rdr.records() {
            let record = result?;
            for (column, value) in cells.iter_mut().zip(record.iter()) {
                column.push(value.to_string());
            }
        }

        if cells.first().map_or(true, Vec::is_empty) {
            return Err(GradeError::Dataset("dataset has no rows".into()));
        }

        let columns = cells.into_iter().map(Column::from_raw).collect();
        Self::from_columns(names, columns)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.names.len()
    }

    /// Column names in file order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    /// Iterates `(name, column)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(&self.columns)
    }

    /// Values of a numeric column.
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match self.column(name) {
            Some(Column::Numeric(values)) => Ok(values),
            Some(Column::Categorical(_)) => Err(GradeError::Dataset(format!(
                "column `{}` is not numeric",
                name
            ))),
            None => Err(missing_column(name)),
        }
    }

    /// Values of a categorical column.
    pub fn categorical(&self, name: &str) -> Result<&[String]> {
        match self.column(name) {
            Some(Column::Categorical(values)) => Ok(values),
            Some(Column::Numeric(_)) => Err(GradeError::Dataset(format!(
                "column `{}` is not categorical",
                name
            ))),
            None => Err(missing_column(name)),
        }
    }

    /// Values of any column as category labels.
    ///
    /// Numeric cells are rendered with `f64`'s `Display`, so `1` reads back
    /// as `"1"` and `2.5` as `"2.5"`.
    pub fn labels(&self, name: &str) -> Result<Cow<'_, [String]>> {
        match self.column(name) {
            Some(Column::Categorical(values)) => Ok(Cow::Borrowed(values)),
            Some(Column::Numeric(values)) => {
                Ok(Cow::Owned(values.iter().map(f64::to_string).collect()))
            }
            None => Err(missing_column(name)),
        }
    }

    /// Splits off a numeric target column, returning the remaining features
    /// (order preserved) and the target values.
    pub fn split_target(&self, target: &str) -> Result<(DataFrame, Vec<f64>)> {
        let y = self.numeric(target)?.to_vec();
        let (names, columns): (Vec<String>, Vec<Column>) = self
            .iter()
            .filter(|(name, _)| *name != target)
            .map(|(name, column)| (name.to_string(), column.clone()))
            .unzip();
        let features = DataFrame {
            names,
            columns,
            n_rows: self.n_rows,
        };
        Ok((features, y))
    }
}

fn missing_column(name: &str) -> GradeError {
    GradeError::Dataset(format!("missing column `{}`", name))
}
