//! Variables that map raw record values to numeric feature blocks.
//!
//! A variable is built in two phases, mirroring the fit/transform split of
//! the preprocessing transformers:
//!
//! 1. **Statistics pass**: a mutable [`Variable`] observes raw values
//!    through [`Variable::compute_statistics`] and grows its state.
//! 2. **Encode/decode pass**: the variable is frozen into a
//!    [`FittedVariable`] whose encoding width can no longer change.
//!
//! Every variable writes its encoding into a caller-owned `f64` buffer at a
//! cursor and returns the cursor for the next variable, so several
//! variables compose into one flat feature vector without extra allocation.
//!
//! # Example
//! ```
//! use machinelearne_vars::variable::{DiscreteVariable, FittedVariable, Variable};
//!
//! let mut color = DiscreteVariable::new("color");
//! for v in ["red", "green", "blue", "green"] {
//!     color.compute_statistics(v);
//! }
//! let color = color.finalize();
//!
//! let mut features = vec![0.0; color.normalized_size()];
//! let next = color.normalize("green", &mut features, 0).unwrap();
//! assert_eq!(next, 3);
//! assert_eq!(features, vec![0.0, 1.0, 0.0]);
//! assert_eq!(color.decoded_value(&[0.1, 0.9, 0.05], 0).unwrap(), "green");
//! ```

mod catalogue;
mod discrete;
mod schema;

pub use catalogue::LabelCatalogue;
pub use discrete::{
    DiscreteVariable, DiscreteVariableConfig, DiscreteVariableParams, FittedDiscreteVariable,
};
pub use schema::{FittedVariableSet, VariableSet};

use crate::error::VariableError;
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};

/// Strategy for values that were not observed during the statistics pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleUnknown {
    /// Encode unseen values as an all-zero block.
    #[default]
    Ignore,
    /// Return [`VariableError::UnknownValue`].
    Error,
}

/// Strategy when no activation clears the decode threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeFallback {
    /// Return the placeholder label [`PLACEHOLDER_LABEL`].
    #[default]
    Placeholder,
    /// Return [`VariableError::NoActivation`].
    Error,
}

/// Label returned by decode when no activation wins.
pub const PLACEHOLDER_LABEL: &str = "0";

/// Activations must exceed this value to be decoded.
pub const ACTIVATION_FLOOR: f64 = -1.0;

/// A variable in its statistics-gathering state.
///
/// Concrete variable kinds implement this trait; aggregators hold them as
/// `Box<dyn Variable>`.
pub trait Variable {
    /// Name of the variable.
    fn name(&self) -> &str;

    /// Fold one raw value into the variable's statistics.
    fn compute_statistics(&mut self, value: &str);

    /// Encoding index of `value`.
    fn index_of(&self, value: &str) -> Result<usize, VariableError>;

    /// Symbolic value at encoding index `index`.
    fn label(&self, index: usize) -> Result<&str, VariableError>;

    /// Number of output slots written by [`Variable::normalize`].
    fn normalized_size(&self) -> usize;

    /// Encode `value` into `out` starting at `cursor`; returns the next free cursor.
    fn normalize(&self, value: &str, out: &mut [f64], cursor: usize)
        -> Result<usize, VariableError>;

    /// Decode the activations starting at `start` back to a symbolic value.
    fn decoded_value(&self, activations: &[f64], start: usize) -> Result<String, VariableError>;

    /// Freeze the variable for encoding and decoding.
    fn into_fitted(self: Box<Self>) -> Result<Box<dyn FittedVariable>, VariableError>;
}

/// A frozen variable ready for encoding and decoding.
pub trait FittedVariable {
    /// Name of the variable.
    fn name(&self) -> &str;

    /// Number of output slots written by [`FittedVariable::normalize`].
    fn normalized_size(&self) -> usize;

    /// Encode `value` into `out` starting at `cursor`; returns the next free cursor.
    fn normalize(&self, value: &str, out: &mut [f64], cursor: usize)
        -> Result<usize, VariableError>;

    /// Decode the activations starting at `start` back to a symbolic value.
    fn decoded_value(&self, activations: &[f64], start: usize) -> Result<String, VariableError>;
}

/// Persistence for fitted variables.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `save_to_file` / `load_from_file` use the bincode encoding of `Params`.
pub trait Persist: Sized {
    /// Serializable representation of the fitted state.
    type Params: SerializableParams;

    /// Extract the fitted state as plain data.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct from plain data, re-validating invariants.
    fn from_params(params: Self::Params) -> Result<Self, VariableError>;

    /// Save to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), VariableError> {
        let bytes = self
            .extract_params()
            .to_bytes()
            .map_err(|e| VariableError::SerializationError(e.to_string()))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load from a file.
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, VariableError> {
        let bytes = std::fs::read(path)?;
        let params = Self::Params::from_bytes(&bytes)
            .map_err(|e| VariableError::SerializationError(e.to_string()))?;
        Self::from_params(params)
    }
}

/// Check that `len` slots starting at `start` fit in a buffer of `available`.
pub(crate) fn check_capacity(
    start: usize,
    len: usize,
    available: usize,
) -> Result<(), VariableError> {
    let needed = start.saturating_add(len);
    if needed > available {
        return Err(VariableError::BufferOverflow { needed, available });
    }
    Ok(())
}

/// Index of the first activation strictly greater than every earlier one
/// and than [`ACTIVATION_FLOOR`]. Earlier indices win ties.
pub(crate) fn argmax_above_floor(activations: &[f64]) -> Option<usize> {
    let mut best = None;
    let mut max = ACTIVATION_FLOOR;
    for (i, &act) in activations.iter().enumerate() {
        if act > max {
            max = act;
            best = Some(i);
        }
    }
    best
}
