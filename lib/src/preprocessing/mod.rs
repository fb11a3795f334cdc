//! Data preprocessing transformers.
//!
//! Transformers follow the same type-state split as models: a configured
//! [`Transformer`] is fitted into a [`FittedTransformer`], which owns the
//! learned state.
//!
//! # Available Transformers
//!
//! - [`OneHotEncoder`]: drop-first dummy encoding of string categories.

pub mod encoding;
pub mod traits;

pub use encoding::{CategoryLevels, FittedOneHotEncoder, OneHotEncoder};
pub use traits::{FittedTransformer, Transformer};
