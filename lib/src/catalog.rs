//! The student-record fields known to the predictor.
//!
//! Numeric fields carry their inclusive valid range and the default used
//! when a request omits them; categorical fields carry their enumerated
//! choices with display labels. The categorical order here is also the order
//! in which training expands indicator columns.

use serde::Serialize;

/// A bounded integer field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumericField {
    pub name: &'static str,
    pub min: i32,
    pub max: i32,
    pub default: i32,
    /// Human-readable name, for fields whose column name is an abbreviation.
    pub description: Option<&'static str>,
}

impl NumericField {
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// One allowed value of a categorical field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

/// A field restricted to an enumerated set of labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoricalField {
    pub name: &'static str,
    pub choices: &'static [Choice],
    pub default: &'static str,
}

impl CategoricalField {
    /// Exact (case-sensitive) membership test.
    pub fn allows(&self, value: &str) -> bool {
        self.choices.iter().any(|c| c.value == value)
    }

    pub fn values(&self) -> impl Iterator<Item = &'static str> {
        self.choices.iter().map(|c| c.value)
    }
}

/// Choices of one categorical field, as reported to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FeatureOptions {
    pub field: &'static str,
    pub choices: &'static [Choice],
}

/// Range, default and description of one numeric field, as reported to
/// clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct NumericOptions {
    pub field: &'static str,
    pub min: i32,
    pub max: i32,
    pub default: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

const fn numeric(
    name: &'static str,
    min: i32,
    max: i32,
    default: i32,
    description: Option<&'static str>,
) -> NumericField {
    NumericField {
        name,
        min,
        max,
        default,
        description,
    }
}

const fn choice(value: &'static str, label: &'static str) -> Choice {
    Choice { value, label }
}

const YES_NO: &[Choice] = &[choice("yes", "Yes"), choice("no", "No")];

const JOBS: &[Choice] = &[
    choice("teacher", "Teacher"),
    choice("health", "Health care"),
    choice("services", "Civil services"),
    choice("at_home", "At home"),
    choice("other", "Other"),
];

pub static NUMERIC_FIELDS: [NumericField; 15] = [
    numeric("age", 15, 22, 17, None),
    numeric("Medu", 0, 4, 2, Some("Mother's education")),
    numeric("Fedu", 0, 4, 2, Some("Father's education")),
    numeric("traveltime", 1, 4, 1, None),
    numeric("studytime", 1, 4, 2, None),
    numeric("failures", 0, 4, 0, None),
    numeric("famrel", 1, 5, 4, Some("Family relationship quality")),
    numeric("freetime", 1, 5, 3, None),
    numeric("goout", 1, 5, 3, None),
    numeric("Dalc", 1, 5, 1, Some("Daily alcohol consumption")),
    numeric("Walc", 1, 5, 1, Some("Weekend alcohol consumption")),
    numeric("health", 1, 5, 3, None),
    numeric("absences", 0, 93, 0, None),
    numeric("G1", 0, 20, 10, Some("First period grade")),
    numeric("G2", 0, 20, 10, Some("Second period grade")),
];

pub static CATEGORICAL_FIELDS: [CategoricalField; 17] = [
    CategoricalField {
        name: "school",
        choices: &[
            choice("GP", "Gabriel Pereira"),
            choice("MS", "Mousinho da Silveira"),
        ],
        default: "GP",
    },
    CategoricalField {
        name: "sex",
        choices: &[choice("F", "Female"), choice("M", "Male")],
        default: "F",
    },
    CategoricalField {
        name: "address",
        choices: &[choice("U", "Urban"), choice("R", "Rural")],
        default: "U",
    },
    CategoricalField {
        name: "famsize",
        choices: &[
            choice("GT3", "Greater than 3"),
            choice("LE3", "Less or equal to 3"),
        ],
        default: "GT3",
    },
    CategoricalField {
        name: "Pstatus",
        choices: &[choice("T", "Living together"), choice("A", "Apart")],
        default: "T",
    },
    CategoricalField {
        name: "Mjob",
        choices: JOBS,
        default: "other",
    },
    CategoricalField {
        name: "Fjob",
        choices: JOBS,
        default: "other",
    },
    CategoricalField {
        name: "reason",
        choices: &[
            choice("home", "Close to home"),
            choice("reputation", "School reputation"),
            choice("course", "Course preference"),
            choice("other", "Other"),
        ],
        default: "course",
    },
    CategoricalField {
        name: "guardian",
        choices: &[
            choice("mother", "Mother"),
            choice("father", "Father"),
            choice("other", "Other"),
        ],
        default: "mother",
    },
    CategoricalField {
        name: "schoolsup",
        choices: YES_NO,
        default: "no",
    },
    CategoricalField {
        name: "famsup",
        choices: YES_NO,
        default: "yes",
    },
    CategoricalField {
        name: "paid",
        choices: YES_NO,
        default: "no",
    },
    CategoricalField {
        name: "activities",
        choices: YES_NO,
        default: "no",
    },
    CategoricalField {
        name: "nursery",
        choices: YES_NO,
        default: "yes",
    },
    CategoricalField {
        name: "higher",
        choices: YES_NO,
        default: "yes",
    },
    CategoricalField {
        name: "internet",
        choices: YES_NO,
        default: "yes",
    },
    CategoricalField {
        name: "romantic",
        choices: YES_NO,
        default: "no",
    },
];

pub fn numeric_field(name: &str) -> Option<&'static NumericField> {
    NUMERIC_FIELDS.iter().find(|f| f.name == name)
}

pub fn categorical_field(name: &str) -> Option<&'static CategoricalField> {
    CATEGORICAL_FIELDS.iter().find(|f| f.name == name)
}

/// Categorical column names in training expansion order.
pub fn categorical_columns() -> Vec<String> {
    CATEGORICAL_FIELDS.iter().map(|f| f.name.to_string()).collect()
}

/// Choices of every categorical field, for populating client forms.
pub fn feature_options() -> Vec<FeatureOptions> {
    CATEGORICAL_FIELDS
        .iter()
        .map(|f| FeatureOptions {
            field: f.name,
            choices: f.choices,
        })
        .collect()
}

/// Range, default and description of every numeric field.
pub fn numeric_options() -> Vec<NumericOptions> {
    NUMERIC_FIELDS
        .iter()
        .map(|f| NumericOptions {
            field: f.name,
            min: f.min,
            max: f.max,
            default: f.default,
            description: f.description,
        })
        .collect()
}
