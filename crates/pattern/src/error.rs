//! Error types for pattern parsing and compilation.

use thiserror::Error;

use crate::quantifier::QuantifierError;

/// What went wrong while scanning pattern text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A character that starts no token.
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    /// A string literal with no closing quote.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A capture reference with no closing quote.
    #[error("unterminated capture reference")]
    UnterminatedCapture,

    /// A `/* … */` comment with no closing `*/`.
    #[error("unterminated block comment")]
    UnterminatedComment,

    /// An angle check with no closing `>`.
    #[error("unterminated check, expected '>'")]
    UnterminatedCheck,

    /// `(?` followed by something other than `:` or `'name'`.
    #[error("malformed group start")]
    BadGroupStart,

    /// A quantifier with nothing before it to repeat.
    #[error("quantifier has no preceding check to repeat")]
    QuantifierWithoutAtom,

    /// A quantifier following a check that cannot take one.
    #[error("quantifier cannot attach to the preceding check")]
    DanglingQuantifier,

    /// A malformed or out-of-range quantifier.
    #[error(transparent)]
    BadQuantifier(#[from] QuantifierError),

    /// An angle check with an unrecognized prefix.
    #[error("unknown check prefix '{0}'")]
    UnknownPrefix(String),

    /// An angle check with the wrong number of arguments.
    #[error("'{prefix}' takes {expected} argument(s), found {found}")]
    WrongArgCount {
        prefix: &'static str,
        expected: &'static str,
        found: usize,
    },

    /// An opcode or family name that resolves to nothing.
    #[error("unknown opcode '{0}'")]
    UnknownOpcode(String),

    /// A capture name that is not an identifier, or a digit-only name
    /// where one is not allowed.
    #[error("invalid capture name '{0}'")]
    InvalidCaptureName(String),

    /// An operand literal that parses to no supported operand kind.
    #[error("invalid operand literal '{0}'")]
    InvalidOperandLiteral(String),

    /// An unsupported escape inside a string literal.
    #[error("invalid escape '\\{0}'")]
    InvalidEscape(char),
}

/// A pattern-text error located at a 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}, column {column}: {kind}")]
pub struct ParseError {
    /// 1-based line of the offending character.
    pub line: u32,
    /// 1-based column of the offending character.
    pub column: u32,
    /// What went wrong.
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: u32, column: u32, kind: ParseErrorKind) -> Self {
        Self { line, column, kind }
    }
}

/// Structurally valid checks that cannot form a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A group start with no matching end.
    #[error("unmatched group start")]
    UnmatchedGroupStart,

    /// A group end with no matching start.
    #[error("unmatched group end")]
    UnmatchedGroupEnd,

    /// A floating quantifier that no check could absorb.
    #[error("dangling quantifier at check {index}")]
    DanglingQuantifier { index: usize },

    /// A quantifier attached to a group start or alternation bar.
    #[error("check {index} cannot carry a quantifier")]
    UnquantifiableCheck { index: usize },

    /// Two capturing groups with the same name.
    #[error("duplicate group name '{0}'")]
    DuplicateGroupName(String),

    /// A member-name pattern whose derived regex fails to compile. Only
    /// reachable through verbatim (`?`-prefixed) patterns.
    #[error("invalid member-name pattern {pattern:?}: {message}")]
    BadMemberPattern { pattern: String, message: String },
}
