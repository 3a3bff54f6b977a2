//! Ordered sets of variables encoded side by side.
//!
//! A record is one raw value per variable. Encoding writes each variable's
//! block right after the previous one, so the feature width of a record is
//! the sum of the variables' widths.

use crate::error::VariableError;
use crate::variable::{check_capacity, FittedVariable, Variable};
use tracing::debug;

/// Encode/decode surface shared by builder and fitted variables.
trait Block {
    fn block_name(&self) -> &str;
    fn width(&self) -> usize;
    fn encode(&self, value: &str, out: &mut [f64], cursor: usize) -> Result<usize, VariableError>;
    fn decode(&self, activations: &[f64], start: usize) -> Result<String, VariableError>;
}

impl Block for Box<dyn Variable> {
    fn block_name(&self) -> &str {
        self.name()
    }

    fn width(&self) -> usize {
        self.normalized_size()
    }

    fn encode(&self, value: &str, out: &mut [f64], cursor: usize) -> Result<usize, VariableError> {
        self.normalize(value, out, cursor)
    }

    fn decode(&self, activations: &[f64], start: usize) -> Result<String, VariableError> {
        self.decoded_value(activations, start)
    }
}

impl Block for Box<dyn FittedVariable> {
    fn block_name(&self) -> &str {
        self.name()
    }

    fn width(&self) -> usize {
        self.normalized_size()
    }

    fn encode(&self, value: &str, out: &mut [f64], cursor: usize) -> Result<usize, VariableError> {
        self.normalize(value, out, cursor)
    }

    fn decode(&self, activations: &[f64], start: usize) -> Result<String, VariableError> {
        self.decoded_value(activations, start)
    }
}

fn check_record_len(expected: usize, got: usize) -> Result<(), VariableError> {
    if expected != got {
        return Err(VariableError::FeatureMismatch {
            expected_features: expected,
            got_features: got,
        });
    }
    Ok(())
}

fn total_width<T: Block>(blocks: &[T]) -> usize {
    blocks.iter().map(Block::width).sum()
}

fn block_names<T: Block>(blocks: &[T]) -> Vec<&str> {
    blocks.iter().map(Block::block_name).collect()
}

/// Encode a record into a staging block and copy it to `out` only once
/// every variable has accepted its value; `out` is unchanged on error.
fn encode_record_into<T: Block>(
    blocks: &[T],
    record: &[&str],
    out: &mut [f64],
) -> Result<usize, VariableError> {
    check_record_len(blocks.len(), record.len())?;
    let width = total_width(blocks);
    check_capacity(0, width, out.len())?;

    let mut staged = vec![0.0; width];
    let mut cursor = 0;
    for (block, value) in blocks.iter().zip(record) {
        cursor = block.encode(value, &mut staged, cursor)?;
    }
    out[..width].copy_from_slice(&staged);
    Ok(cursor)
}

fn decode_record<T: Block>(blocks: &[T], activations: &[f64]) -> Result<Vec<String>, VariableError> {
    let mut start = 0;
    let mut decoded = Vec::with_capacity(blocks.len());
    for block in blocks {
        decoded.push(block.decode(activations, start)?);
        start += block.width();
    }
    Ok(decoded)
}

/// Variables in their statistics-gathering state, in record order.
#[derive(Default)]
pub struct VariableSet {
    variables: Vec<Box<dyn Variable>>,
}

impl VariableSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a variable; it reads the next field of every record.
    pub fn push(&mut self, variable: impl Variable + 'static) {
        self.variables.push(Box::new(variable));
    }

    /// Builder form of [`VariableSet::push`].
    pub fn with_variable(mut self, variable: impl Variable + 'static) -> Self {
        self.push(variable);
        self
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the set holds no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Variable names in record order.
    pub fn names(&self) -> Vec<&str> {
        block_names(&self.variables)
    }

    /// Total feature width of one encoded record.
    pub fn normalized_size(&self) -> usize {
        total_width(&self.variables)
    }

    /// Fold one record into every variable's statistics.
    pub fn compute_statistics(&mut self, record: &[&str]) -> Result<(), VariableError> {
        check_record_len(self.variables.len(), record.len())?;
        for (var, value) in self.variables.iter_mut().zip(record) {
            var.compute_statistics(value);
        }
        Ok(())
    }

    /// Encode one record into `out` starting at slot 0; returns the end cursor.
    ///
    /// `out` is left untouched if any variable rejects its value.
    pub fn normalize(&self, record: &[&str], out: &mut [f64]) -> Result<usize, VariableError> {
        encode_record_into(&self.variables, record, out)
    }

    /// Decode one label per variable from a full activation vector.
    pub fn decode(&self, activations: &[f64]) -> Result<Vec<String>, VariableError> {
        decode_record(&self.variables, activations)
    }

    /// Freeze every variable.
    pub fn finalize(self) -> Result<FittedVariableSet, VariableError> {
        let variables = self
            .variables
            .into_iter()
            .map(|v| v.into_fitted())
            .collect::<Result<Vec<_>, _>>()?;
        let fitted = FittedVariableSet { variables };
        debug!(
            variables = fitted.len(),
            width = fitted.normalized_size(),
            "finalized variable set"
        );
        Ok(fitted)
    }
}

/// Frozen variables in record order.
pub struct FittedVariableSet {
    variables: Vec<Box<dyn FittedVariable>>,
}

impl FittedVariableSet {
    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the set holds no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Variable names in record order.
    pub fn names(&self) -> Vec<&str> {
        block_names(&self.variables)
    }

    /// Total feature width of one encoded record.
    pub fn normalized_size(&self) -> usize {
        total_width(&self.variables)
    }

    /// Encode one record into `out` starting at slot 0; returns the end cursor.
    ///
    /// `out` is left untouched if any variable rejects its value.
    pub fn normalize(&self, record: &[&str], out: &mut [f64]) -> Result<usize, VariableError> {
        encode_record_into(&self.variables, record, out)
    }

    /// Encode one record into a freshly allocated vector.
    pub fn encode_record(&self, record: &[&str]) -> Result<Vec<f64>, VariableError> {
        let mut out = vec![0.0; self.normalized_size()];
        self.normalize(record, &mut out)?;
        Ok(out)
    }

    /// Decode one label per variable from a full activation vector.
    pub fn decode(&self, activations: &[f64]) -> Result<Vec<String>, VariableError> {
        decode_record(&self.variables, activations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::{DiscreteVariable, HandleUnknown};

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn weather() -> VariableSet {
        let mut set = VariableSet::new()
            .with_variable(DiscreteVariable::new("outlook"))
            .with_variable(DiscreteVariable::new("windy"));
        let records = [
            ["sunny", "false"],
            ["overcast", "true"],
            ["rain", "false"],
            ["sunny", "true"],
        ];
        for record in &records {
            set.compute_statistics(record).unwrap();
        }
        set
    }

    #[test]
    fn test_widths_and_names() {
        init_logging();
        let set = weather();
        assert_eq!(set.len(), 2);
        assert_eq!(set.names(), vec!["outlook", "windy"]);
        assert_eq!(set.normalized_size(), 5);
    }

    #[test]
    fn test_record_length_mismatch() {
        let mut set = weather();
        let result = set.compute_statistics(&["sunny"]);
        assert!(matches!(
            result,
            Err(VariableError::FeatureMismatch {
                expected_features: 2,
                got_features: 1
            })
        ));
    }

    #[test]
    fn test_encode_record_blocks_are_adjacent() {
        init_logging();
        let set = weather().finalize().unwrap();
        let encoded = set.encode_record(&["rain", "true"]).unwrap();
        assert_eq!(encoded, vec![0.0, 0.0, 1.0, 0.0, 1.0]);
        assert_eq!(set.decode(&encoded).unwrap(), vec!["rain", "true"]);
    }

    #[test]
    fn test_builder_state_encodes_too() {
        let set = weather();
        let mut out = vec![0.0; 5];
        assert_eq!(set.normalize(&["overcast", "false"], &mut out).unwrap(), 5);
        assert_eq!(out, vec![0.0, 1.0, 0.0, 1.0, 0.0]);
        assert_eq!(set.decode(&out).unwrap(), vec!["overcast", "false"]);
    }

    #[test]
    fn test_unseen_value_in_record() {
        let set = weather().finalize().unwrap();
        let encoded = set.encode_record(&["snow", "false"]).unwrap();
        assert_eq!(encoded, vec![0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(set.decode(&encoded).unwrap(), vec!["sunny", "false"]);
    }

    #[test]
    fn test_strict_variable_in_set() {
        let mut set = VariableSet::new()
            .with_variable(DiscreteVariable::new("a").with_handle_unknown(HandleUnknown::Error));
        set.compute_statistics(&["x"]).unwrap();
        let set = set.finalize().unwrap();
        assert!(matches!(
            set.encode_record(&["y"]),
            Err(VariableError::UnknownValue { .. })
        ));
    }

    #[test]
    fn test_rejected_record_leaves_output_untouched() {
        let mut set = VariableSet::new()
            .with_variable(DiscreteVariable::new("a"))
            .with_variable(DiscreteVariable::new("b").with_handle_unknown(HandleUnknown::Error));
        set.compute_statistics(&["x", "y"]).unwrap();

        let mut out = vec![9.0, 9.0];
        assert!(matches!(
            set.normalize(&["x", "zzz"], &mut out),
            Err(VariableError::UnknownValue { ref variable, .. }) if variable == "b"
        ));
        assert_eq!(out, vec![9.0, 9.0]);

        let fitted = set.finalize().unwrap();
        assert!(fitted.normalize(&["x", "zzz"], &mut out).is_err());
        assert_eq!(out, vec![9.0, 9.0]);
        assert_eq!(fitted.normalize(&["x", "y"], &mut out).unwrap(), 2);
        assert_eq!(out, vec![1.0, 1.0]);
    }

    #[test]
    fn test_output_too_short() {
        let set = weather().finalize().unwrap();
        let mut out = vec![0.0; 4];
        assert!(matches!(
            set.normalize(&["sunny", "true"], &mut out),
            Err(VariableError::BufferOverflow { .. })
        ));
    }

    #[test]
    fn test_empty_set() {
        let set = VariableSet::new();
        assert!(set.is_empty());
        let fitted = set.finalize().unwrap();
        assert!(fitted.is_empty());
        assert_eq!(fitted.encode_record(&[]).unwrap(), Vec::<f64>::new());
        assert_eq!(fitted.decode(&[]).unwrap(), Vec::<String>::new());
    }
}
