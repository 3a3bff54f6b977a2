//! Discrete (categorical) variables encoded as one-of-N blocks.
//!
//! Each distinct observed value gets one output slot, in first-seen order.
//! Decoding picks the slot with the largest activation.

use crate::error::VariableError;
use crate::variable::catalogue::LabelCatalogue;
use crate::variable::{
    argmax_above_floor, check_capacity, DecodeFallback, FittedVariable, HandleUnknown, Persist,
    Variable, PLACEHOLDER_LABEL,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Configuration for DiscreteVariable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscreteVariableConfig {
    /// How to encode values missing from the catalogue.
    pub handle_unknown: HandleUnknown,
    /// What to decode when no activation clears the floor.
    pub decode_fallback: DecodeFallback,
}

impl DiscreteVariableConfig {
    /// Surface unseen values and empty decodes as errors.
    pub fn strict() -> Self {
        Self {
            handle_unknown: HandleUnknown::Error,
            decode_fallback: DecodeFallback::Error,
        }
    }
}

/// Discrete variable in its statistics-gathering state.
///
/// Values are folded in with [`Variable::compute_statistics`]; each new
/// value is appended to the catalogue. Call [`DiscreteVariable::finalize`]
/// once the statistics pass is over to obtain a variable whose width can
/// no longer change.
///
/// # Example
/// ```
/// use machinelearne_vars::variable::{DiscreteVariable, Variable};
///
/// let mut shape = DiscreteVariable::new("shape");
/// shape.compute_statistics("circle");
/// shape.compute_statistics("square");
/// shape.compute_statistics("circle");
/// assert_eq!(shape.normalized_size(), 2);
/// assert_eq!(shape.index_of("square").unwrap(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct DiscreteVariable {
    name: String,
    min: i32,
    max: i32,
    catalogue: LabelCatalogue,
    config: DiscreteVariableConfig,
}

impl DiscreteVariable {
    /// Create a variable with an empty catalogue and default policies.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min: 0,
            max: 0,
            catalogue: LabelCatalogue::new(),
            config: DiscreteVariableConfig::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: DiscreteVariableConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the strategy for values missing from the catalogue.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.config.handle_unknown = strategy;
        self
    }

    /// Set the strategy for decodes where no activation wins.
    pub fn with_decode_fallback(mut self, fallback: DecodeFallback) -> Self {
        self.config.decode_fallback = fallback;
        self
    }

    /// Declare the minimum of the variable's numeric domain.
    ///
    /// Not derived from observed data and not used by encode or decode.
    pub fn set_min(&mut self, min: i32) {
        self.min = min;
    }

    /// Declare the maximum of the variable's numeric domain.
    pub fn set_max(&mut self, max: i32) {
        self.max = max;
    }

    /// Declared domain minimum.
    pub fn min(&self) -> i32 {
        self.min
    }

    /// Declared domain maximum.
    pub fn max(&self) -> i32 {
        self.max
    }

    /// Unknown-value and decode-fallback policies.
    pub fn config(&self) -> DiscreteVariableConfig {
        self.config
    }

    /// Labels observed so far, in encoding order.
    pub fn catalogue(&self) -> &LabelCatalogue {
        &self.catalogue
    }

    /// End the statistics pass.
    pub fn finalize(self) -> FittedDiscreteVariable {
        debug!(
            variable = %self.name,
            width = self.catalogue.len(),
            "finalized discrete variable"
        );
        FittedDiscreteVariable {
            name: self.name,
            min: self.min,
            max: self.max,
            catalogue: self.catalogue,
            config: self.config,
        }
    }
}

impl Variable for DiscreteVariable {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute_statistics(&mut self, value: &str) {
        if self.catalogue.observe(value) {
            trace!(
                variable = %self.name,
                value,
                index = self.catalogue.len() - 1,
                "new label"
            );
        }
    }

    fn index_of(&self, value: &str) -> Result<usize, VariableError> {
        self.catalogue.index(&self.name, value)
    }

    fn label(&self, index: usize) -> Result<&str, VariableError> {
        self.catalogue.label(index)
    }

    fn normalized_size(&self) -> usize {
        self.catalogue.len()
    }

    fn normalize(
        &self,
        value: &str,
        out: &mut [f64],
        cursor: usize,
    ) -> Result<usize, VariableError> {
        encode_one_of_n(&self.name, &self.catalogue, self.config, value, out, cursor)
    }

    fn decoded_value(&self, activations: &[f64], start: usize) -> Result<String, VariableError> {
        decode_one_of_n(&self.name, &self.catalogue, self.config, activations, start)
    }

    fn into_fitted(self: Box<Self>) -> Result<Box<dyn FittedVariable>, VariableError> {
        Ok(Box::new(self.finalize()))
    }
}

/// Serializable parameters for a fitted DiscreteVariable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscreteVariableParams {
    /// Variable name.
    pub name: String,
    /// Labels in encoding order.
    pub labels: Vec<String>,
    /// Declared domain minimum.
    pub min: i32,
    /// Declared domain maximum.
    pub max: i32,
    /// Policies.
    pub config: DiscreteVariableConfig,
}

/// Discrete variable with a frozen catalogue.
///
/// The encoding width is fixed for the lifetime of the value, so feature
/// vectors built with it stay compatible with a model trained on them.
#[derive(Clone, Debug)]
pub struct FittedDiscreteVariable {
    name: String,
    min: i32,
    max: i32,
    catalogue: LabelCatalogue,
    config: DiscreteVariableConfig,
}

impl FittedDiscreteVariable {
    /// Labels in encoding order.
    pub fn labels(&self) -> &[String] {
        self.catalogue.labels()
    }

    /// Encoding index of `value`.
    pub fn index_of(&self, value: &str) -> Result<usize, VariableError> {
        self.catalogue.index(&self.name, value)
    }

    /// Label at encoding index `index`.
    pub fn label(&self, index: usize) -> Result<&str, VariableError> {
        self.catalogue.label(index)
    }

    /// Declared domain minimum.
    pub fn min(&self) -> i32 {
        self.min
    }

    /// Declared domain maximum.
    pub fn max(&self) -> i32 {
        self.max
    }

    /// Unknown-value and decode-fallback policies.
    pub fn config(&self) -> DiscreteVariableConfig {
        self.config
    }
}

impl FittedVariable for FittedDiscreteVariable {
    fn name(&self) -> &str {
        &self.name
    }

    fn normalized_size(&self) -> usize {
        self.catalogue.len()
    }

    fn normalize(
        &self,
        value: &str,
        out: &mut [f64],
        cursor: usize,
    ) -> Result<usize, VariableError> {
        encode_one_of_n(&self.name, &self.catalogue, self.config, value, out, cursor)
    }

    fn decoded_value(&self, activations: &[f64], start: usize) -> Result<String, VariableError> {
        decode_one_of_n(&self.name, &self.catalogue, self.config, activations, start)
    }
}

impl Persist for FittedDiscreteVariable {
    type Params = DiscreteVariableParams;

    fn extract_params(&self) -> Self::Params {
        DiscreteVariableParams {
            name: self.name.clone(),
            labels: self.catalogue.labels().to_vec(),
            min: self.min,
            max: self.max,
            config: self.config,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, VariableError> {
        let catalogue = LabelCatalogue::from_labels(params.labels)?;
        debug!(
            variable = %params.name,
            width = catalogue.len(),
            "restored discrete variable"
        );
        Ok(Self {
            name: params.name,
            min: params.min,
            max: params.max,
            catalogue,
            config: params.config,
        })
    }
}

impl From<FittedDiscreteVariable> for DiscreteVariableParams {
    fn from(fitted: FittedDiscreteVariable) -> Self {
        DiscreteVariableParams {
            name: fitted.name,
            labels: fitted.catalogue.into_labels(),
            min: fitted.min,
            max: fitted.max,
            config: fitted.config,
        }
    }
}

fn encode_one_of_n(
    name: &str,
    catalogue: &LabelCatalogue,
    config: DiscreteVariableConfig,
    value: &str,
    out: &mut [f64],
    cursor: usize,
) -> Result<usize, VariableError> {
    let hot = match catalogue.position(value) {
        Some(idx) => Some(idx),
        None => match config.handle_unknown {
            HandleUnknown::Error => {
                return Err(VariableError::UnknownValue {
                    variable: name.to_string(),
                    value: value.to_string(),
                })
            }
            HandleUnknown::Ignore => {
                trace!(variable = name, value, "unseen value encoded as zeros");
                None
            }
        },
    };

    // An empty catalogue writes nothing, so the buffer is never touched.
    let width = catalogue.len();
    if width == 0 {
        return Ok(cursor);
    }
    check_capacity(cursor, width, out.len())?;

    let block = &mut out[cursor..cursor + width];
    block.fill(0.0);
    if let Some(idx) = hot {
        block[idx] = 1.0;
    }
    Ok(cursor + width)
}

fn decode_one_of_n(
    name: &str,
    catalogue: &LabelCatalogue,
    config: DiscreteVariableConfig,
    activations: &[f64],
    start: usize,
) -> Result<String, VariableError> {
    let width = catalogue.len();
    let winner = if width == 0 {
        None
    } else {
        check_capacity(start, width, activations.len())?;
        argmax_above_floor(&activations[start..start + width])
    };

    match winner {
        Some(idx) => Ok(catalogue.label(idx)?.to_string()),
        None => match config.decode_fallback {
            DecodeFallback::Placeholder => Ok(PLACEHOLDER_LABEL.to_string()),
            DecodeFallback::Error => Err(VariableError::NoActivation {
                variable: name.to_string(),
            }),
        },
    }
}
