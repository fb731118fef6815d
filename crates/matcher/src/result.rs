//! Read-only views over a finished match.

use ilregex_common::{Instruction, MethodInfo, Operand, TypeCastError};

use crate::dictionary::OperandDictionary;
use crate::regex::Regex;
use crate::runner::RunnerOutput;

/// A captured group: a sub-range of the matched instructions.
///
/// Lookups that miss return a group with `success == false` rather than
/// failing; its range is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    start: usize,
    end: usize,
    name: Option<String>,
    success: bool,
}

static EMPTY_GROUP: Group = Group {
    start: 0,
    end: 0,
    name: None,
    success: false,
};

impl Group {
    /// Whether the group captured anything.
    pub fn success(&self) -> bool {
        self.success
    }

    /// First instruction index of the captured range.
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last instruction index of the captured range.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of instructions captured.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the captured range is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The group's name, for named groups.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// A captured operand value.
///
/// Lookups that miss return a capture with `success == false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandCapture {
    operand: Option<Operand>,
    name: Option<String>,
}

static EMPTY_OPERAND: OperandCapture = OperandCapture {
    operand: None,
    name: None,
};

macro_rules! operand_accessor {
    ($fn_name:ident, $ty:ty) => {
        #[doc = concat!(
            "The captured value as `", stringify!($ty), "`. Absent captures \
             are `Ok(None)`; a capture of another kind is a [`TypeCastError`]."
        )]
        pub fn $fn_name(&self) -> Result<Option<$ty>, TypeCastError> {
            self.operand.as_ref().map(|op| op.$fn_name()).transpose()
        }
    };
}

impl OperandCapture {
    /// Whether an operand was captured.
    pub fn success(&self) -> bool {
        self.operand.is_some()
    }

    /// The capture's name, for named captures.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The captured operand, if any.
    pub fn operand(&self) -> Option<&Operand> {
        self.operand.as_ref()
    }

    operand_accessor!(as_i32, i32);
    operand_accessor!(as_i64, i64);
    operand_accessor!(as_i8, i8);
    operand_accessor!(as_u8, u8);
    operand_accessor!(as_f32, f32);
    operand_accessor!(as_f64, f64);
    operand_accessor!(as_parameter, u16);
    operand_accessor!(as_variable, u16);

    /// The captured string. Absent captures are `Ok(None)`; a capture of
    /// another kind is a [`TypeCastError`].
    pub fn as_str(&self) -> Result<Option<&str>, TypeCastError> {
        self.operand.as_ref().map(|op| op.as_str()).transpose()
    }
}

/// The outcome of one `find` call.
///
/// A result borrows the instruction array it was matched against and
/// keeps a handle on its regex, so [`MatchResult::next_match`] can
/// resume where this match ended.
#[derive(Debug, Clone)]
pub struct MatchResult<'i> {
    regex: Regex,
    instructions: &'i [Instruction],
    method: Option<&'i MethodInfo>,
    dictionary: Option<OperandDictionary>,
    success: bool,
    start: usize,
    end: usize,
    search_end: usize,
    groups: Vec<Group>,
    operands: Vec<OperandCapture>,
}

impl<'i> MatchResult<'i> {
    pub(crate) fn matched(
        regex: Regex,
        instructions: &'i [Instruction],
        method: Option<&'i MethodInfo>,
        dictionary: Option<OperandDictionary>,
        output: RunnerOutput,
        search_end: usize,
    ) -> Self {
        let program = regex.program();
        let groups = output
            .captures
            .groups
            .iter()
            .copied()
            .enumerate()
            .map(|(slot, span)| Group {
                start: span.map(|s| s.start).unwrap_or(0),
                end: span.map(|s| s.end).unwrap_or(0),
                name: program.group_name(slot).map(str::to_string),
                success: span.is_some(),
            })
            .collect();
        let operands = output
            .captures
            .operands
            .iter()
            .enumerate()
            .map(|(slot, operand)| OperandCapture {
                operand: operand.clone(),
                name: program.operand_name(slot).map(str::to_string),
            })
            .collect();
        Self {
            regex,
            instructions,
            method,
            dictionary,
            success: true,
            start: output.start,
            end: output.end,
            search_end,
            groups,
            operands,
        }
    }

    pub(crate) fn failed(
        regex: Regex,
        instructions: &'i [Instruction],
        method: Option<&'i MethodInfo>,
        dictionary: Option<OperandDictionary>,
        search_end: usize,
    ) -> Self {
        Self {
            regex,
            instructions,
            method,
            dictionary,
            success: false,
            start: 0,
            end: 0,
            search_end,
            groups: Vec::new(),
            operands: Vec::new(),
        }
    }

    /// Whether the pattern matched.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Index of the first matched instruction.
    pub fn index(&self) -> usize {
        self.start
    }

    /// One past the last matched instruction.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of instructions matched.
    pub fn length(&self) -> usize {
        self.end - self.start
    }

    /// The regex that produced this result.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// The full instruction array the match ran over.
    pub fn instructions(&self) -> &'i [Instruction] {
        self.instructions
    }

    /// The matched instructions.
    pub fn matched_instructions(&self) -> &'i [Instruction] {
        &self.instructions[self.start..self.end]
    }

    /// Number of capture groups, the whole-match group included.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// All capture groups; index 0 is the whole match.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// A group by slot. Misses return an unsuccessful empty group.
    pub fn group(&self, index: usize) -> &Group {
        self.groups.get(index).unwrap_or(&EMPTY_GROUP)
    }

    /// A group by name. Misses return an unsuccessful empty group.
    pub fn group_named(&self, name: &str) -> &Group {
        match self.regex.program().group_slot(name) {
            Some(slot) => self.group(slot),
            None => &EMPTY_GROUP,
        }
    }

    /// The instructions a group captured.
    pub fn group_instructions(&self, index: usize) -> &'i [Instruction] {
        let group = self.group(index);
        if group.success() {
            &self.instructions[group.start()..group.end()]
        } else {
            &[]
        }
    }

    /// Number of operand capture slots.
    pub fn operand_count(&self) -> usize {
        self.operands.len()
    }

    /// All operand captures, in slot order.
    pub fn operands(&self) -> &[OperandCapture] {
        &self.operands
    }

    /// An operand capture by slot. Misses return an unsuccessful empty
    /// capture.
    pub fn operand(&self, index: usize) -> &OperandCapture {
        self.operands.get(index).unwrap_or(&EMPTY_OPERAND)
    }

    /// An operand capture by name. Misses return an unsuccessful empty
    /// capture.
    pub fn operand_named(&self, name: &str) -> &OperandCapture {
        match self.regex.program().operand_slot(name) {
            Some(slot) => self.operand(slot),
            None => &EMPTY_OPERAND,
        }
    }

    /// Run the same regex again, starting where this match ended.
    ///
    /// A zero-length match resumes one instruction later so iteration
    /// always advances. An unsuccessful result stays unsuccessful.
    pub fn next_match(&self) -> MatchResult<'i> {
        self.next_match_until(self.search_end)
    }

    /// Like [`MatchResult::next_match`], but searching only up to `end`
    /// (clamped to the original search bound).
    pub fn next_match_until(&self, end: usize) -> MatchResult<'i> {
        let search_end = end.min(self.search_end);
        if !self.success {
            return self.clone();
        }
        let next_start = if self.length() == 0 {
            self.end + 1
        } else {
            self.end
        };
        if next_start > search_end {
            return MatchResult::failed(
                self.regex.clone(),
                self.instructions,
                self.method,
                self.dictionary.clone(),
                search_end,
            );
        }
        self.regex
            .find_with(
                self.instructions,
                self.method,
                self.dictionary.as_ref(),
                next_start,
                search_end,
            )
            .unwrap_or_else(|_| {
                MatchResult::failed(
                    self.regex.clone(),
                    self.instructions,
                    self.method,
                    self.dictionary.clone(),
                    search_end,
                )
            })
    }
}
