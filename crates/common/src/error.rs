//! Cast errors for operand accessors.

use thiserror::Error;

/// Raised when a typed operand accessor is applied to an operand of a
/// different kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("operand is {actual}, not {expected}")]
pub struct TypeCastError {
    /// Kind the accessor expected.
    pub expected: &'static str,
    /// Kind actually stored.
    pub actual: &'static str,
}

impl TypeCastError {
    pub(crate) fn new(expected: &'static str, actual: &'static str) -> Self {
        Self { expected, actual }
    }
}
