//! Backtracking matcher for the ILRegex engine.
//!
//! Executes compiled instruction patterns against instruction arrays:
//!
//! - [`Regex`] — the compiled, shareable handle
//!   ([`Regex::find`], [`Regex::find_in_method`], [`Regex::find_with`],
//!   [`Regex::find_iter`])
//! - [`MatchOptions`] — `search_boundaries` and `swap_greedy`
//! - [`MatchResult`] / [`Group`] / [`OperandCapture`] — read-only views
//!   over captured ranges and operands
//! - [`OperandDictionary`] — pre-bound named operands for equality
//!   checks
//!
//! The matcher is a cooperative, single-threaded backtracking
//! interpreter: a compiled [`Regex`] is immutable and can be shared
//! across threads, while each `find` call owns its transient state.
//! Matching itself never fails — a non-match is a [`MatchResult`] with
//! `success() == false` — and [`UsageError`] covers misuse of the API
//! surface.
//!
//! # Example
//!
//! ```
//! use ilregex_common::{Instruction, Opcode};
//! use ilregex_matcher::Regex;
//! use ilregex_pattern::Pattern;
//!
//! let pattern = Pattern::parse("<op ldarg.0> <op ldarg.1> <op add>").unwrap();
//! let regex = Regex::new(pattern).unwrap();
//!
//! let body = [
//!     Instruction::bare(Opcode::Ldarg0),
//!     Instruction::bare(Opcode::Ldarg1),
//!     Instruction::bare(Opcode::Add),
//!     Instruction::bare(Opcode::Ret),
//! ];
//! let found = regex.find(&body);
//! assert!(found.success());
//! assert_eq!(found.index(), 0);
//! assert_eq!(found.length(), 3);
//! ```

pub mod dictionary;
pub mod error;
pub mod options;
pub mod regex;
pub mod result;
mod runner;

pub use dictionary::OperandDictionary;
pub use error::UsageError;
pub use options::MatchOptions;
pub use regex::{Matches, Regex};
pub use result::{Group, MatchResult, OperandCapture};
