//! Repetition counts for pattern checks.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Sentinel for an unbounded upper repetition count.
pub const UNBOUNDED: u32 = u32::MAX;

/// Errors from [`Quantifier::new`] and quantifier parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantifierError {
    /// Text is not one of `?`, `*`, `+`, `{n}`, `{n,}`, `{n,m}` with an
    /// optional trailing `?`.
    #[error("malformed quantifier '{0}'")]
    Malformed(String),

    /// Lower bound exceeds upper bound.
    #[error("quantifier minimum {min} exceeds maximum {max}")]
    MinAboveMax { min: u32, max: u32 },

    /// `{0}` repeats nothing.
    #[error("quantifier cannot be exactly zero")]
    Zero,
}

/// How many times a check repeats: `min..=max`, expanded greedily or
/// lazily.
///
/// The identity quantifier is `(1, 1, greedy)`; every check carries one.
/// Greediness is irrelevant when `min == max`, and equality ignores it
/// in that case.
#[derive(Debug, Clone, Copy)]
pub struct Quantifier {
    min: u32,
    max: u32,
    greedy: bool,
}

impl Quantifier {
    /// Build a quantifier, validating `min ≤ max` and `(min, max) ≠ (0, 0)`.
    pub fn new(min: u32, max: u32, greedy: bool) -> Result<Self, QuantifierError> {
        if min > max {
            return Err(QuantifierError::MinAboveMax { min, max });
        }
        if min == 0 && max == 0 {
            return Err(QuantifierError::Zero);
        }
        Ok(Self { min, max, greedy })
    }

    /// The identity quantifier: exactly one, greedy.
    pub const fn exactly_one() -> Self {
        Self {
            min: 1,
            max: 1,
            greedy: true,
        }
    }

    /// Lower repetition bound.
    pub fn min(self) -> u32 {
        self.min
    }

    /// Upper repetition bound; [`UNBOUNDED`] when there is none.
    pub fn max(self) -> u32 {
        self.max
    }

    /// Whether the quantifier expands greedily.
    pub fn is_greedy(self) -> bool {
        self.greedy
    }

    /// Whether this is exactly-one, regardless of greediness.
    pub fn is_one(self) -> bool {
        self.min == 1 && self.max == 1
    }

    /// Whether the upper bound is unbounded.
    pub fn is_unbounded(self) -> bool {
        self.max == UNBOUNDED
    }

    /// Greediness after applying the runtime swap option.
    pub fn greedy_with(self, swap: bool) -> bool {
        self.greedy != swap
    }

    /// The same bounds with inverted greediness.
    pub fn swapped(self) -> Self {
        Self {
            greedy: !self.greedy,
            ..self
        }
    }
}

impl Default for Quantifier {
    fn default() -> Self {
        Self::exactly_one()
    }
}

impl PartialEq for Quantifier {
    fn eq(&self, other: &Self) -> bool {
        self.min == other.min
            && self.max == other.max
            && (self.min == self.max || self.greedy == other.greedy)
    }
}

impl Eq for Quantifier {}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (1, 1) => return Ok(()),
            (0, 1) => f.write_str("?")?,
            (0, UNBOUNDED) => f.write_str("*")?,
            (1, UNBOUNDED) => f.write_str("+")?,
            (min, max) if min == max => write!(f, "{{{min}}}")?,
            (min, UNBOUNDED) => write!(f, "{{{min},}}")?,
            (min, max) => write!(f, "{{{min},{max}}}")?,
        }
        if !self.greedy && self.min != self.max {
            f.write_str("?")?;
        }
        Ok(())
    }
}

impl FromStr for Quantifier {
    type Err = QuantifierError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let malformed = || QuantifierError::Malformed(text.to_string());
        let (body, greedy) = match text.strip_suffix('?') {
            // A bare "?" is a quantifier, not a greediness suffix.
            Some(body) if !body.is_empty() => (body, false),
            _ => (text, true),
        };
        let (min, max) = match body {
            "?" => (0, 1),
            "*" => (0, UNBOUNDED),
            "+" => (1, UNBOUNDED),
            _ => {
                let inner = body
                    .strip_prefix('{')
                    .and_then(|rest| rest.strip_suffix('}'))
                    .ok_or_else(malformed)?;
                match inner.split_once(',') {
                    None => {
                        let n = parse_bound(inner).ok_or_else(malformed)?;
                        (n, n)
                    }
                    Some((lo, "")) => (parse_bound(lo).ok_or_else(malformed)?, UNBOUNDED),
                    Some((lo, hi)) => (
                        parse_bound(lo).ok_or_else(malformed)?,
                        parse_bound(hi).ok_or_else(malformed)?,
                    ),
                }
            }
        };
        Quantifier::new(min, max, greedy)
    }
}

fn parse_bound(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
