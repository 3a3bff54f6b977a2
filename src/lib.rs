//! # machinelearne-vars
//!
//! Categorical variable encoding for numeric learning models, with a strict
//! separation between the statistics pass and the encode/decode pass.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: a [`DiscreteVariable`] grows its label
//!   catalogue while observing data; [`DiscreteVariable::finalize`] turns it
//!   into a [`FittedDiscreteVariable`] whose encoding width is fixed.
//! - **Caller-owned buffers**: encoders write into a provided `f64` slice at
//!   a cursor and return the next cursor, so variables compose into one
//!   feature vector.
//! - **Explicit policies**: unseen values and empty decodes degrade silently
//!   by default and can be turned into errors per variable.
//!
//! ## Quick Start
//!
//! ```rust
//! use machinelearne_vars::variable::{DiscreteVariable, FittedVariable, Variable};
//!
//! let mut color = DiscreteVariable::new("color");
//! for v in ["red", "green", "blue"] {
//!     color.compute_statistics(v);
//! }
//! let mut size = DiscreteVariable::new("size");
//! for v in ["S", "M", "L"] {
//!     size.compute_statistics(v);
//! }
//! let (color, size) = (color.finalize(), size.finalize());
//!
//! let mut features = vec![0.0; color.normalized_size() + size.normalized_size()];
//! let cursor = color.normalize("green", &mut features, 0).unwrap();
//! size.normalize("L", &mut features, cursor).unwrap();
//! assert_eq!(features, vec![0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
//! ```
//!
//! ## Module Structure
//!
//! - `variable` — the `Variable` traits, label catalogue, discrete variables
//!   and variable sets
//! - `error` — the crate error type
//! - `serialization` — byte encoding of fitted parameters

/// Error type shared by all variable operations.
pub mod error;

/// Persistence formats for fitted variables.
pub mod serialization;

/// Variables, their catalogues and encode/decode operations.
pub mod variable;

pub use error::VariableError;
pub use variable::{
    DiscreteVariable, DiscreteVariableConfig, FittedDiscreteVariable, FittedVariable,
    FittedVariableSet, Persist, Variable, VariableSet,
};
