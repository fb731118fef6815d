//! Pattern DSL parser and compiler for the ILRegex engine.
//!
//! This crate turns pattern text into an executable program:
//!
//! - [`Quantifier`] — repetition bounds with greedy/lazy policy
//! - [`Check`] / [`CheckKind`] — the atoms of a pattern
//! - [`Pattern`] — parsed check sequence with quantifiers attached
//!   ([`Pattern::parse`], [`Pattern::from_file`])
//! - [`Program`] — the compiled, flat, indexed form the matcher runs
//! - [`ParseError`] with 1-based line/column, and [`CompileError`]
//!
//! Matching lives in the `ilregex-matcher` crate; this crate is purely
//! text → program.

pub mod check;
pub mod compiler;
pub mod error;
pub mod member;
pub mod parser;
pub mod pattern;
pub mod program;
pub mod quantifier;

pub use check::{Check, CheckKind, OperandRef};
pub use error::{CompileError, ParseError, ParseErrorKind};
pub use parser::is_valid_name;
pub use pattern::{Pattern, PatternFileError};
pub use program::Program;
pub use quantifier::{Quantifier, QuantifierError, UNBOUNDED};
