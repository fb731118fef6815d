//! Caller-error types for the matcher crate.
//!
//! The matcher itself never fails: a non-match is an unsuccessful
//! [`MatchResult`](crate::MatchResult). These errors cover misuse of the
//! API surface — bad ranges and bad dictionary entries.

use thiserror::Error;

/// Invalid arguments to matching entry points or the operand dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// `start` exceeds the instruction count.
    #[error("start index {start} out of range for {len} instruction(s)")]
    StartOutOfRange { start: usize, len: usize },

    /// `end` exceeds the instruction count.
    #[error("end index {end} out of range for {len} instruction(s)")]
    EndOutOfRange { end: usize, len: usize },

    /// `start` exceeds `end`.
    #[error("start index {start} exceeds end index {end}")]
    InvertedRange { start: usize, end: usize },

    /// A dictionary name that is not a valid capture identifier.
    #[error("invalid operand name '{0}'")]
    InvalidName(String),

    /// A dictionary value of a kind that cannot seed a capture.
    #[error("operand kind '{0}' cannot be stored in a dictionary")]
    UnsupportedOperand(&'static str),

    /// A dictionary lookup for a name that is not bound.
    #[error("no operand named '{0}'")]
    MissingName(String),

    /// An insertion under a name that is already bound.
    #[error("an operand named '{0}' is already bound")]
    DuplicateName(String),
}
