//! Pre-bound named operands.
//!
//! A dictionary seeds names for `<ceq …>` checks before matching starts:
//! when an equality check's name is not bound by an earlier in-pattern
//! capture, the dictionary supplies the expected operand.

use std::collections::HashMap;

use ilregex_common::Operand;
use ilregex_pattern::is_valid_name;

use crate::error::UsageError;
use crate::result::MatchResult;

/// A validated name → operand mapping.
#[derive(Debug, Clone, Default)]
pub struct OperandDictionary {
    entries: HashMap<String, Operand>,
}

impl OperandDictionary {
    /// An empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name. The name must be a capture identifier, the operand
    /// must carry a value, and the name must not already be bound.
    pub fn add(&mut self, name: &str, operand: Operand) -> Result<(), UsageError> {
        Self::validate(name, &operand)?;
        if self.entries.contains_key(name) {
            return Err(UsageError::DuplicateName(name.to_string()));
        }
        self.entries.insert(name.to_string(), operand);
        Ok(())
    }

    /// Bind a name, replacing any existing binding.
    pub fn set(&mut self, name: &str, operand: Operand) -> Result<(), UsageError> {
        Self::validate(name, &operand)?;
        self.entries.insert(name.to_string(), operand);
        Ok(())
    }

    /// Import every named operand a match captured, replacing existing
    /// bindings of the same names.
    pub fn add_match(&mut self, result: &MatchResult<'_>) -> Result<(), UsageError> {
        for capture in result.operands() {
            if let (Some(name), Some(operand)) = (capture.name(), capture.operand()) {
                self.set(name, operand.clone())?;
            }
        }
        Ok(())
    }

    /// Bind a batch of named operands.
    pub fn add_operands<I>(&mut self, operands: I) -> Result<(), UsageError>
    where
        I: IntoIterator<Item = (String, Operand)>,
    {
        for (name, operand) in operands {
            self.add(&name, operand)?;
        }
        Ok(())
    }

    /// Look up a bound operand.
    pub fn get(&self, name: &str) -> Option<&Operand> {
        self.entries.get(name)
    }

    /// Look up a bound operand, failing loudly when absent.
    pub fn require(&self, name: &str) -> Result<&Operand, UsageError> {
        self.entries
            .get(name)
            .ok_or_else(|| UsageError::MissingName(name.to_string()))
    }

    /// Whether a name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the bindings, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Operand)> {
        self.entries.iter().map(|(name, op)| (name.as_str(), op))
    }

    fn validate(name: &str, operand: &Operand) -> Result<(), UsageError> {
        if !is_valid_name(name) {
            return Err(UsageError::InvalidName(name.to_string()));
        }
        if operand.is_none() {
            return Err(UsageError::UnsupportedOperand(operand.kind_name()));
        }
        Ok(())
    }
}
