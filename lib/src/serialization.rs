//! Serialization of fitted parameters.
//!
//! Parameter representations hold only plain data (`Vec<f64>`, strings,
//! counts) and are written with bincode. The format is internal: training and
//! inference only have to agree with each other.

use crate::error::GradeError;
use std::error::Error;
use std::path::Path;

/// A parameter representation that can be serialized to and from bytes.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;

    /// Write the serialized parameters to `path`, replacing any existing file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let bytes = self.to_bytes().map_err(std::io::Error::other)?;
        std::fs::write(path, bytes)
    }

    /// Read parameters previously written by [`SerializableParams::save_to_file`].
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, GradeError>
    where
        GradeError: From<Self::Error>,
    {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes)?)
    }
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}
