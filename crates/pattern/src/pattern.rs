//! Patterns: parsed, quantifier-resolved check sequences.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::check::{Check, CheckKind};
use crate::compiler;
use crate::error::{CompileError, ParseError, ParseErrorKind};
use crate::parser::parse_checks;
use crate::program::Program;

/// Errors from reading a pattern file.
#[derive(Debug, Error)]
pub enum PatternFileError {
    /// The file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The file contents failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// An immutable sequence of checks with quantifier attachment already
/// resolved.
///
/// Patterns are cheap to clone structurally and are shared freely;
/// matching never mutates one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    checks: Vec<Check>,
}

impl Pattern {
    /// Parse pattern text.
    pub fn parse(text: &str) -> Result<Pattern, ParseError> {
        let output = parse_checks(text)?;
        let mut checks = output.checks;
        if let Err(index) = attach_quantifiers(&mut checks) {
            let (line, column) = output
                .quantifier_positions
                .iter()
                .find(|(i, _, _)| *i == index)
                .map(|(_, l, c)| (*l, *c))
                .unwrap_or((1, 1));
            return Err(ParseError {
                line,
                column,
                kind: ParseErrorKind::DanglingQuantifier,
            });
        }
        Ok(Pattern { checks })
    }

    /// Read and parse a `.ilregex` file (UTF-8).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Pattern, PatternFileError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Pattern::parse(&text)?)
    }

    /// Build a pattern from programmatically assembled checks, attaching
    /// floating quantifiers. A quantifier that no check can absorb is an
    /// error.
    pub fn new(mut checks: Vec<Check>) -> Result<Pattern, CompileError> {
        match attach_quantifiers(&mut checks) {
            Ok(()) => Ok(Pattern { checks }),
            Err(index) => Err(CompileError::DanglingQuantifier { index }),
        }
    }

    /// Like [`Pattern::new`], but silently drops quantifiers that cannot
    /// attach.
    pub fn new_lenient(mut checks: Vec<Check>) -> Pattern {
        attach_quantifiers_lenient(&mut checks);
        Pattern { checks }
    }

    /// The resolved checks.
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Number of checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether the pattern has no checks. An empty pattern still matches
    /// (it matches zero instructions anywhere).
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Compile to a flat program.
    pub fn compile(&self) -> Result<Program, CompileError> {
        compiler::compile(&self.checks)
    }
}

impl FromStr for Pattern {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Pattern::parse(text)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, check) in self.checks.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{check}")?;
        }
        Ok(())
    }
}

/// Fuse floating quantifier checks onto their preceding check, in
/// sequence order. Returns the input index of the first quantifier that
/// cannot attach; unattachable quantifiers stay in place so lenient
/// callers can drop them instead.
fn attach_quantifiers(checks: &mut Vec<Check>) -> Result<(), usize> {
    let input = std::mem::take(checks);
    let mut out: Vec<Check> = Vec::with_capacity(input.len());
    let mut dangling = None;
    for (index, check) in input.into_iter().enumerate() {
        if let CheckKind::Quantifier(q) = &check.kind {
            match out.last_mut() {
                Some(last) if last.accepts_quantifier() => last.quantifier = *q,
                _ => {
                    if dangling.is_none() {
                        dangling = Some(index);
                    }
                    out.push(check);
                }
            }
        } else {
            out.push(check);
        }
    }
    *checks = out;
    match dangling {
        None => Ok(()),
        Some(index) => Err(index),
    }
}

/// Fusing pass that drops unattachable quantifiers instead of failing.
fn attach_quantifiers_lenient(checks: &mut Vec<Check>) {
    if attach_quantifiers(checks).is_err() {
        checks.retain(|check| !matches!(check.kind, CheckKind::Quantifier(_)));
    }
}
