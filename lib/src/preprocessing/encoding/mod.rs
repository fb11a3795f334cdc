//! Categorical feature encoding.
//!
//! Categorical values stay strings end to end: the dataset keeps the raw
//! labels and the encoder emits indicator columns named `<field>_<level>`,
//! which is also the naming the inference side looks up.

mod one_hot;

pub use one_hot::{CategoryLevels, FittedOneHotEncoder, OneHotEncoder};
