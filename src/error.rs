//! Error types for variable encoding operations.

use thiserror::Error;

/// Error type for catalogue, encode and decode operations.
#[derive(Debug, Error)]
pub enum VariableError {
    /// Value was never observed by the variable's catalogue.
    #[error("Unknown value: {value:?} is not in the catalogue of variable {variable:?}")]
    UnknownValue { variable: String, value: String },
    /// Label lookup with an index past the end of the catalogue.
    #[error("Index out of range: index {index} for catalogue of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// Output or activation buffer is too short for the variable's width.
    #[error("Buffer overflow: need {needed} slots, buffer has {available}")]
    BufferOverflow { needed: usize, available: usize },
    /// No activation exceeded the decode threshold and the fallback is disabled.
    #[error("No activation: nothing to decode for variable {variable:?}")]
    NoActivation { variable: String },
    /// A catalogue was rebuilt from labels containing a duplicate.
    #[error("Duplicate label: {0:?}")]
    DuplicateLabel(String),
    /// Record length differs from the number of variables.
    #[error("Feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for VariableError {
    fn from(err: std::io::Error) -> Self {
        VariableError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for VariableError {
    fn from(err: bincode::Error) -> Self {
        VariableError::SerializationError(err.to_string())
    }
}
