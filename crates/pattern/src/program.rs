//! Compiled pattern programs.
//!
//! A program is the flat, indexed form the matcher executes: a sentinel
//! no-op at index 0, a synthetic capturing group wrapping every user
//! check, group pairs wired through [`Check::other`] and alternation
//! entry points collected per group.
//!
//! [`Check::other`]: crate::check::Check

use std::collections::HashMap;

use regex::Regex;

use crate::check::Check;

/// A compiled pattern.
#[derive(Debug, Clone)]
pub struct Program {
    checks: Vec<Check>,
    group_count: usize,
    operand_count: usize,
    group_names: Vec<Option<String>>,
    operand_names: Vec<Option<String>>,
    group_slots: HashMap<String, usize>,
    operand_slots: HashMap<String, usize>,
    member_regexes: HashMap<usize, Regex>,
}

impl Program {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        checks: Vec<Check>,
        group_count: usize,
        operand_count: usize,
        group_names: Vec<Option<String>>,
        operand_names: Vec<Option<String>>,
        group_slots: HashMap<String, usize>,
        operand_slots: HashMap<String, usize>,
        member_regexes: HashMap<usize, Regex>,
    ) -> Self {
        Self {
            checks,
            group_count,
            operand_count,
            group_names,
            operand_names,
            group_slots,
            operand_slots,
            member_regexes,
        }
    }

    /// The compiled checks. Index 0 is the sentinel; index 1 opens the
    /// synthetic whole-match group.
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// One compiled check.
    pub fn check(&self, index: usize) -> &Check {
        &self.checks[index]
    }

    /// Number of capturing groups, the whole-match group included.
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Number of operand capture slots.
    pub fn operand_count(&self) -> usize {
        self.operand_count
    }

    /// Name of a group slot, if the group was named.
    pub fn group_name(&self, slot: usize) -> Option<&str> {
        self.group_names.get(slot)?.as_deref()
    }

    /// Name of an operand slot, if the capture was named.
    pub fn operand_name(&self, slot: usize) -> Option<&str> {
        self.operand_names.get(slot)?.as_deref()
    }

    /// Slot of a named group.
    pub fn group_slot(&self, name: &str) -> Option<usize> {
        self.group_slots.get(name).copied()
    }

    /// Slot of a named operand capture.
    pub fn operand_slot(&self, name: &str) -> Option<usize> {
        self.operand_slots.get(name).copied()
    }

    /// The compiled member-name regex of the check at `index`, when that
    /// check is a member-name check.
    pub fn member_regex(&self, index: usize) -> Option<&Regex> {
        self.member_regexes.get(&index)
    }

    /// Index of the synthetic outer group's start.
    pub fn root(&self) -> usize {
        1
    }
}
