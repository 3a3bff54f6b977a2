//! Insertion-ordered label catalogue.
//!
//! A label's position in the catalogue is its encoding index. Labels are
//! only ever appended, so an index handed out once stays valid for the
//! lifetime of the catalogue.

use crate::error::VariableError;
use std::collections::HashMap;

/// Ordered, duplicate-free set of observed labels with index lookup.
#[derive(Clone, Debug, Default)]
pub struct LabelCatalogue {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelCatalogue {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a catalogue from labels in encoding order.
    ///
    /// # Errors
    /// Returns [`VariableError::DuplicateLabel`] if a label appears twice.
    pub fn from_labels(labels: Vec<String>) -> Result<Self, VariableError> {
        let mut index = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if index.insert(label.clone(), i).is_some() {
                return Err(VariableError::DuplicateLabel(label.clone()));
            }
        }
        Ok(Self { labels, index })
    }

    /// Append `value` if it has not been seen before.
    ///
    /// Returns `true` when the catalogue grew.
    pub fn observe(&mut self, value: &str) -> bool {
        if self.index.contains_key(value) {
            return false;
        }
        self.index.insert(value.to_string(), self.labels.len());
        self.labels.push(value.to_string());
        true
    }

    /// Position of `value`, or `None` if it was never observed.
    pub fn position(&self, value: &str) -> Option<usize> {
        self.index.get(value).copied()
    }

    /// Position of `value`.
    ///
    /// Lookup never inserts; an unseen value is an error so the encoding
    /// width cannot change as a side effect of encoding.
    pub fn index(&self, variable: &str, value: &str) -> Result<usize, VariableError> {
        self.position(value)
            .ok_or_else(|| VariableError::UnknownValue {
                variable: variable.to_string(),
                value: value.to_string(),
            })
    }

    /// Label stored at `index`.
    pub fn label(&self, index: usize) -> Result<&str, VariableError> {
        self.labels
            .get(index)
            .map(String::as_str)
            .ok_or(VariableError::IndexOutOfRange {
                index,
                len: self.labels.len(),
            })
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no label has been observed yet.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in encoding order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Iterate labels in encoding order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub(crate) fn into_labels(self) -> Vec<String> {
        self.labels
    }
}

impl PartialEq for LabelCatalogue {
    fn eq(&self, other: &Self) -> bool {
        self.labels == other.labels
    }
}

impl Eq for LabelCatalogue {}
