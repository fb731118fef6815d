//! The compiled, shareable regex handle.

use std::sync::Arc;

use tracing::debug;

use ilregex_common::{Instruction, MethodInfo};
use ilregex_pattern::{CompileError, Pattern, Program};

use crate::dictionary::OperandDictionary;
use crate::error::UsageError;
use crate::options::MatchOptions;
use crate::result::MatchResult;
use crate::runner::Runner;

#[derive(Debug)]
struct RegexInner {
    pattern: Pattern,
    program: Program,
    options: MatchOptions,
}

/// A compiled instruction regex.
///
/// Compilation happens once in [`Regex::new`]; the handle is a cheap
/// clone over shared immutable state, so one compiled regex can be used
/// from many threads. Each `find` call owns its own transient matcher
/// state.
#[derive(Debug, Clone)]
pub struct Regex {
    inner: Arc<RegexInner>,
}

impl Regex {
    /// Compile a pattern with default options.
    pub fn new(pattern: Pattern) -> Result<Regex, CompileError> {
        Regex::with_options(pattern, MatchOptions::default())
    }

    /// Compile a pattern with explicit options.
    pub fn with_options(pattern: Pattern, options: MatchOptions) -> Result<Regex, CompileError> {
        let program = pattern.compile()?;
        Ok(Regex {
            inner: Arc::new(RegexInner {
                pattern,
                program,
                options,
            }),
        })
    }

    /// The pattern this regex was compiled from.
    pub fn pattern(&self) -> &Pattern {
        &self.inner.pattern
    }

    /// The options this regex runs with.
    pub fn options(&self) -> MatchOptions {
        self.inner.options
    }

    pub(crate) fn program(&self) -> &Program {
        &self.inner.program
    }

    /// Number of capturing groups, the whole-match group included.
    pub fn group_count(&self) -> usize {
        self.inner.program.group_count()
    }

    /// Number of operand capture slots.
    pub fn operand_count(&self) -> usize {
        self.inner.program.operand_count()
    }

    /// Whether the regex matches anywhere in the instructions.
    pub fn is_match(&self, instructions: &[Instruction]) -> bool {
        self.find(instructions).success()
    }

    /// Find the first match in the instructions.
    pub fn find<'i>(&self, instructions: &'i [Instruction]) -> MatchResult<'i> {
        // Bounds are the whole array, so the range checks cannot fail.
        self.find_with(instructions, None, None, 0, instructions.len())
            .unwrap_or_else(|_| {
                MatchResult::failed(self.clone(), instructions, None, None, instructions.len())
            })
    }

    /// Find the first match in a method body, resolving short-form
    /// operands against the method's parameter and variable lists.
    pub fn find_in_method<'i>(&self, method: &'i MethodInfo) -> MatchResult<'i> {
        let instructions = method.instructions();
        self.find_with(instructions, Some(method), None, 0, instructions.len())
            .unwrap_or_else(|_| {
                MatchResult::failed(
                    self.clone(),
                    instructions,
                    Some(method),
                    None,
                    instructions.len(),
                )
            })
    }

    /// Find the first match within `[start, end)`, with an optional
    /// enclosing method and an optional dictionary of pre-bound named
    /// operands.
    pub fn find_with<'i>(
        &self,
        instructions: &'i [Instruction],
        method: Option<&'i MethodInfo>,
        dictionary: Option<&OperandDictionary>,
        start: usize,
        end: usize,
    ) -> Result<MatchResult<'i>, UsageError> {
        let len = instructions.len();
        if start > len {
            return Err(UsageError::StartOutOfRange { start, len });
        }
        if end > len {
            return Err(UsageError::EndOutOfRange { end, len });
        }
        if start > end {
            return Err(UsageError::InvertedRange { start, end });
        }

        debug!(start, end, len, "searching");
        let runner = Runner::new(
            self.program(),
            instructions,
            method,
            dictionary,
            start,
            end,
            self.inner.options,
        );
        let outcome = runner.run();
        debug!(success = outcome.is_some(), "search finished");

        Ok(match outcome {
            Some(output) => MatchResult::matched(
                self.clone(),
                instructions,
                method,
                dictionary.cloned(),
                output,
                end,
            ),
            None => MatchResult::failed(self.clone(), instructions, method, dictionary.cloned(), end),
        })
    }

    /// Iterate successive non-overlapping matches.
    pub fn find_iter<'r, 'i>(&'r self, instructions: &'i [Instruction]) -> Matches<'r, 'i> {
        Matches {
            regex: self,
            instructions,
            pos: 0,
            done: false,
        }
    }
}

/// Iterator over successive matches, in the style of
/// [`MatchResult::next_match`]: each search resumes at the previous
/// match's end, bumping by one after a zero-length match.
pub struct Matches<'r, 'i> {
    regex: &'r Regex,
    instructions: &'i [Instruction],
    pos: usize,
    done: bool,
}

impl<'r, 'i> Iterator for Matches<'r, 'i> {
    type Item = MatchResult<'i>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos > self.instructions.len() {
            return None;
        }
        let result = self
            .regex
            .find_with(self.instructions, None, None, self.pos, self.instructions.len())
            .ok()?;
        if !result.success() {
            self.done = true;
            return None;
        }
        self.pos = if result.length() == 0 {
            result.end() + 1
        } else {
            result.end()
        };
        Some(result)
    }
}
