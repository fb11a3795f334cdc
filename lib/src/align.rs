//! Inference-time feature alignment.
//!
//! [`align`] turns a loose [`InputRecord`] into the dense vector the model was
//! trained on by walking the [`FeatureSchema`] in order. Training and
//! inference never share code paths for encoding, so this function has to
//! reproduce the one-hot layout exactly:
//!
//! - numeric column: the record's number, or 0 when absent;
//! - indicator `<field>_<level>`: 1 when the record's label for `field`
//!   equals `level` ignoring case, or when its number renders as `level`
//!   (levels learned from a numeric column), else 0.
//!
//! A label matching no level, or a missing field, leaves all its indicators
//! at 0, which is how the reference level is encoded.

use crate::record::{FieldValue, InputRecord};
use crate::schema::{FeatureColumn, FeatureSchema};

/// Lowest reportable grade.
pub const GRADE_MIN: f64 = 0.0;
/// Highest reportable grade.
pub const GRADE_MAX: f64 = 20.0;

/// Builds the model input vector for `record` in `schema` order.
///
/// Never fails: unknown fields are ignored and values of the wrong kind
/// leave their position at 0.
///
/// # Example
/// ```
/// use gradecast::align::align;
/// use gradecast::record::InputRecord;
/// use gradecast::schema::{FeatureColumn, FeatureSchema};
///
/// let schema = FeatureSchema::new(vec![
///     FeatureColumn::numeric("age"),
///     FeatureColumn::indicator("school", "MS"),
/// ]);
/// let record = InputRecord::new().with("age", 17).with("school", "ms");
/// assert_eq!(align(&record, &schema), vec![17.0, 1.0]);
/// ```
pub fn align(record: &InputRecord, schema: &FeatureSchema) -> Vec<f64> {
    schema
        .columns()
        .iter()
        .map(|column| match column {
            FeatureColumn::Numeric { name } => record.number(name).unwrap_or(0.0),
            FeatureColumn::Indicator { field, level } => match record.get(field) {
                Some(FieldValue::Label(label)) if label.to_lowercase() == level.to_lowercase() => 1.0,
                Some(FieldValue::Number(value)) if value.to_string() == *level => 1.0,
                _ => 0.0,
            },
        })
        .collect()
}

/// Clamps a raw model score into `[GRADE_MIN, GRADE_MAX]`.
///
/// NaN passes through unchanged; callers treat it as a fault.
pub fn clamp_grade(raw: f64) -> f64 {
    raw.clamp(GRADE_MIN, GRADE_MAX)
}
