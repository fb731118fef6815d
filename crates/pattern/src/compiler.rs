//! Pattern → program compilation.
//!
//! Flattens the check sequence into an executable program: a sentinel
//! no-op at index 0, a synthetic capturing group around everything,
//! group pairs wired together, alternation entry points collected, and
//! capture slots numbered. Groups and alternatives that close
//! immediately get a no-op filler so every path has a check to run.

use std::collections::HashMap;

use regex::Regex;

use crate::check::{Check, CheckKind};
use crate::error::CompileError;
use crate::member::derive_member_regex;
use crate::program::Program;

pub(crate) fn compile(input: &[Check]) -> Result<Program, CompileError> {
    Compiler::default().run(input)
}

#[derive(Default)]
struct Compiler {
    checks: Vec<Check>,
    // Indices of open group starts, outermost first; the synthetic outer
    // group sits at the bottom for the whole walk.
    group_stack: Vec<usize>,
    // One alternation list per open group.
    alt_stack: Vec<Vec<usize>>,
    group_count: usize,
    operand_count: usize,
    group_names: Vec<Option<String>>,
    operand_names: Vec<Option<String>>,
    group_slots: HashMap<String, usize>,
    operand_slots: HashMap<String, usize>,
    member_regexes: HashMap<usize, Regex>,
}

impl Compiler {
    fn run(mut self, input: &[Check]) -> Result<Program, CompileError> {
        self.checks.push(Check::new(CheckKind::Nop));
        self.open_group(Check::new(CheckKind::GroupStart {
            capturing: true,
            name: None,
        }))?;

        for (index, check) in input.iter().enumerate() {
            match &check.kind {
                CheckKind::GroupStart { .. } => {
                    if !check.quantifier.is_one() {
                        return Err(CompileError::UnquantifiableCheck { index });
                    }
                    self.open_group(check.clone())?;
                }
                CheckKind::GroupEnd => {
                    if self.group_stack.len() == 1 {
                        return Err(CompileError::UnmatchedGroupEnd);
                    }
                    self.close_group(check.clone());
                }
                CheckKind::Alternative => {
                    if !check.quantifier.is_one() {
                        return Err(CompileError::UnquantifiableCheck { index });
                    }
                    self.fill_empty_path();
                    let at = self.checks.len();
                    // The innermost open group owns this alternation.
                    if let Some(alts) = self.alt_stack.last_mut() {
                        alts.push(at);
                    }
                    self.checks.push(check.clone());
                }
                CheckKind::Quantifier(_) => {
                    return Err(CompileError::DanglingQuantifier { index });
                }
                CheckKind::CaptureOperand { name, .. } => {
                    let mut compiled = check.clone();
                    compiled.capture = Some(self.operand_slot(name.as_deref()));
                    self.checks.push(compiled);
                }
                CheckKind::MemberName { kind, pattern, .. } => {
                    let regex = derive_member_regex(*kind, pattern)?;
                    self.member_regexes.insert(self.checks.len(), regex);
                    self.checks.push(check.clone());
                }
                _ => self.checks.push(check.clone()),
            }
        }

        if self.group_stack.len() != 1 {
            return Err(CompileError::UnmatchedGroupStart);
        }
        self.close_group(Check::new(CheckKind::GroupEnd));

        Ok(Program::new(
            self.checks,
            self.group_count,
            self.operand_count,
            self.group_names,
            self.operand_names,
            self.group_slots,
            self.operand_slots,
            self.member_regexes,
        ))
    }

    fn open_group(&mut self, mut start: Check) -> Result<(), CompileError> {
        let captured_name = match &start.kind {
            CheckKind::GroupStart {
                capturing: true,
                name,
            } => Some(name.clone()),
            _ => None,
        };
        if let Some(name) = captured_name {
            let slot = self.group_count;
            self.group_count += 1;
            start.capture = Some(slot);
            self.group_names.push(name.clone());
            if let Some(name) = name {
                if self.group_slots.insert(name.clone(), slot).is_some() {
                    return Err(CompileError::DuplicateGroupName(name));
                }
            }
        }
        self.group_stack.push(self.checks.len());
        self.alt_stack.push(Vec::new());
        self.checks.push(start);
        Ok(())
    }

    fn close_group(&mut self, mut end: Check) {
        self.fill_empty_path();
        let start_index = self.group_stack.pop().unwrap_or(0);
        let alternatives = self.alt_stack.pop().unwrap_or_default();
        let end_index = self.checks.len();

        end.other = Some(start_index);
        end.alternatives = alternatives.clone();
        // The group's quantifier is written after the closing paren, so
        // it arrives on the end check; the start drives the matcher.
        let quantifier = end.quantifier;
        self.checks.push(end);

        let start = &mut self.checks[start_index];
        start.other = Some(end_index);
        start.alternatives = alternatives;
        start.quantifier = quantifier;
    }

    /// Insert a no-op when a group or alternative closes with no checks
    /// in its path, so the matcher has a check to run.
    fn fill_empty_path(&mut self) {
        if matches!(
            self.checks.last().map(|c| &c.kind),
            Some(CheckKind::GroupStart { .. }) | Some(CheckKind::Alternative)
        ) {
            self.checks.push(Check::new(CheckKind::Nop));
        }
    }

    fn operand_slot(&mut self, name: Option<&str>) -> usize {
        if let Some(name) = name {
            if let Some(&slot) = self.operand_slots.get(name) {
                // Same-named captures share a slot, like branches of an
                // alternation both capturing 'x'.
                return slot;
            }
        }
        let slot = self.operand_count;
        self.operand_count += 1;
        self.operand_names.push(name.map(str::to_string));
        if let Some(name) = name {
            self.operand_slots.insert(name.to_string(), slot);
        }
        slot
    }
}
