//! Input records.
//!
//! Two shapes of the same data:
//!
//! - [`StudentRecord`]: the request type. Every field is present (missing
//!   JSON keys take their documented defaults) and [`StudentRecord::validate`]
//!   checks ranges and enumerations against the [`catalog`](crate::catalog).
//! - [`InputRecord`]: a loose field → value map, which is what the
//!   alignment transform consumes. It may be partial and may carry fields the
//!   model does not know about.

use crate::catalog;
use crate::error::{GradeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single field value: a number or a categorical label.
///
/// Any other JSON value (bool, null, array, object) is kept as `Other` so a
/// record with undocumented keys still parses; alignment never reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Label(String),
    Other(serde_json::Value),
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Label(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Label(value)
    }
}

/// Loosely-typed mapping from field name to value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl InputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Numeric value of `field`; `None` if absent or a label.
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.fields.get(field) {
            Some(FieldValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    /// Label of `field`; `None` if absent or not a string.
    pub fn label(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(FieldValue::Label(value)) => Some(value),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for InputRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A complete student record as accepted from clients.
///
/// Field names on the wire follow the dataset's column names (`Medu`, `G1`,
/// `Pstatus`, ...). Omitted fields take the defaults listed in
/// [`catalog::NUMERIC_FIELDS`] and [`catalog::CATEGORICAL_FIELDS`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentRecord {
    pub age: i32,
    #[serde(rename = "Medu")]
    pub medu: i32,
    #[serde(rename = "Fedu")]
    pub fedu: i32,
    pub traveltime: i32,
    pub studytime: i32,
    pub failures: i32,
    pub famrel: i32,
    pub freetime: i32,
    pub goout: i32,
    #[serde(rename = "Dalc")]
    pub dalc: i32,
    #[serde(rename = "Walc")]
    pub walc: i32,
    pub health: i32,
    pub absences: i32,
    #[serde(rename = "G1")]
    pub g1: i32,
    #[serde(rename = "G2")]
    pub g2: i32,

    pub school: String,
    pub sex: String,
    pub address: String,
    pub famsize: String,
    #[serde(rename = "Pstatus")]
    pub pstatus: String,
    #[serde(rename = "Mjob")]
    pub mjob: String,
    #[serde(rename = "Fjob")]
    pub fjob: String,
    pub reason: String,
    pub guardian: String,
    pub schoolsup: String,
    pub famsup: String,
    pub paid: String,
    pub activities: String,
    pub nursery: String,
    pub higher: String,
    pub internet: String,
    pub romantic: String,
}

impl Default for StudentRecord {
    fn default() -> Self {
        Self {
            age: 17,
            medu: 2,
            fedu: 2,
            traveltime: 1,
            studytime: 2,
            failures: 0,
            famrel: 4,
            freetime: 3,
            goout: 3,
            dalc: 1,
            walc: 1,
            health: 3,
            absences: 0,
            g1: 10,
            g2: 10,
            school: "GP".into(),
            sex: "F".into(),
            address: "U".into(),
            famsize: "GT3".into(),
            pstatus: "T".into(),
            mjob: "other".into(),
            fjob: "other".into(),
            reason: "course".into(),
            guardian: "mother".into(),
            schoolsup: "no".into(),
            famsup: "yes".into(),
            paid: "no".into(),
            activities: "no".into(),
            nursery: "yes".into(),
            higher: "yes".into(),
            internet: "yes".into(),
            romantic: "no".into(),
        }
    }
}

impl StudentRecord {
    /// Numeric fields paired with their dataset column names.
    pub fn numeric_values(&self) -> [(&'static str, i32); 15] {
        [
            ("age", self.age),
            ("Medu", self.medu),
            ("Fedu", self.fedu),
            ("traveltime", self.traveltime),
            ("studytime", self.studytime),
            ("failures", self.failures),
            ("famrel", self.famrel),
            ("freetime", self.freetime),
            ("goout", self.goout),
            ("Dalc", self.dalc),
            ("Walc", self.walc),
            ("health", self.health),
            ("absences", self.absences),
            ("G1", self.g1),
            ("G2", self.g2),
        ]
    }

    /// Categorical fields paired with their dataset column names.
    pub fn categorical_values(&self) -> [(&'static str, &str); 17] {
        [
            ("school", self.school.as_str()),
            ("sex", self.sex.as_str()),
            ("address", self.address.as_str()),
            ("famsize", self.famsize.as_str()),
            ("Pstatus", self.pstatus.as_str()),
            ("Mjob", self.mjob.as_str()),
            ("Fjob", self.fjob.as_str()),
            ("reason", self.reason.as_str()),
            ("guardian", self.guardian.as_str()),
            ("schoolsup", self.schoolsup.as_str()),
            ("famsup", self.famsup.as_str()),
            ("paid", self.paid.as_str()),
            ("activities", self.activities.as_str()),
            ("nursery", self.nursery.as_str()),
            ("higher", self.higher.as_str()),
            ("internet", self.internet.as_str()),
            ("romantic", self.romantic.as_str()),
        ]
    }

    /// Checks every field against its documented range or choice list.
    ///
    /// # Errors
    /// [`GradeError::InvalidRecord`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.numeric_values() {
            let field = catalog::numeric_field(name)
                .ok_or_else(|| GradeError::invalid_record(name, "unknown numeric field"))?;
            if !field.contains(value) {
                return Err(GradeError::invalid_record(
                    name,
                    format!(
                        "must be between {} and {}, got {}",
                        field.min, field.max, value
                    ),
                ));
            }
        }
        for (name, value) in self.categorical_values() {
            let field = catalog::categorical_field(name)
                .ok_or_else(|| GradeError::invalid_record(name, "unknown categorical field"))?;
            if !field.allows(value) {
                let choices: Vec<_> = field.values().collect();
                return Err(GradeError::invalid_record(
                    name,
                    format!("\"{}\" is not one of {}", value, choices.join(", ")),
                ));
            }
        }
        Ok(())
    }

    /// Converts into the loose record consumed by the alignment transform.
    pub fn to_input_record(&self) -> InputRecord {
        let numbers = self
            .numeric_values()
            .into_iter()
            .map(|(name, value)| (name, FieldValue::from(value)));
        let labels = self
            .categorical_values()
            .into_iter()
            .map(|(name, value)| (name, FieldValue::from(value)));
        numbers.chain(labels).collect()
    }
}
