//! The backtracking interpreter.
//!
//! One [`Runner`] executes a compiled program against an instruction
//! range for a single `find` call. The interpreter keeps a chain of
//! match states: one per check being executed, each owning a stack of
//! quantifier iterations. A group iteration owns the child states it
//! consumed plus the queue of alternation entry points still untried,
//! so backtracking is popping — discard the most recent iteration (or
//! re-run it down another alternative) and everything it captured
//! reverts with it.
//!
//! Every quantifier iteration snapshots the group and operand capture
//! tables, which keeps capture lifetimes correct across retries at the
//! cost of copying; the tables are as small as the pattern's capture
//! count, not the input.

use std::collections::VecDeque;

use tracing::trace;

use ilregex_common::{matches_instruction, Instruction, MethodInfo, Operand};
use ilregex_pattern::{CheckKind, OperandRef, Program};

use crate::dictionary::OperandDictionary;
use crate::options::MatchOptions;

/// A captured group's input range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GroupSpan {
    pub start: usize,
    pub end: usize,
}

/// Snapshot of the capture tables at one point of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Captures {
    pub groups: Vec<Option<GroupSpan>>,
    pub operands: Vec<Option<Operand>>,
}

impl Captures {
    fn sized(program: &Program) -> Self {
        Self {
            groups: vec![None; program.group_count()],
            operands: vec![None; program.operand_count()],
        }
    }

    fn unused() -> Self {
        Self {
            groups: Vec::new(),
            operands: Vec::new(),
        }
    }
}

/// A successful run: the matched range plus the final capture tables.
#[derive(Debug)]
pub(crate) struct RunnerOutput {
    pub start: usize,
    pub end: usize,
    pub captures: Captures,
}

/// One successful iteration of a check's quantifier.
#[derive(Debug)]
struct QuantMatch {
    /// Input position at iteration entry.
    entry: usize,
    /// Input position reached by this iteration.
    end: usize,
    /// Captures as of iteration entry; alternation retries restart here.
    entry_caps: Captures,
    /// Captures as of iteration completion.
    caps: Captures,
    /// Child states consumed inside this iteration (groups only).
    children: Vec<MatchState>,
    /// Alternation entry points not yet tried (groups only).
    alts: VecDeque<usize>,
}

/// The execution state of one check: its quantifier iteration stack.
#[derive(Debug)]
struct MatchState {
    /// Program index of the check.
    pc: usize,
    /// Input position where the state begins.
    entry: usize,
    /// Captures inherited from the lexical predecessor.
    base_caps: Captures,
    /// One entry per completed quantifier iteration.
    iters: Vec<QuantMatch>,
}

impl MatchState {
    fn new(pc: usize, entry: usize, base_caps: Captures) -> Self {
        Self {
            pc,
            entry,
            base_caps,
            iters: Vec::new(),
        }
    }

    fn count(&self) -> u32 {
        self.iters.len() as u32
    }

    fn current_end(&self) -> usize {
        self.iters.last().map(|qm| qm.end).unwrap_or(self.entry)
    }

    fn current_caps(&self) -> &Captures {
        self.iters
            .last()
            .map(|qm| &qm.caps)
            .unwrap_or(&self.base_caps)
    }
}

enum Phase {
    Forward {
        idx: usize,
        pos: usize,
        caps: Captures,
    },
    Backtrack,
}

/// A single match attempt over `[start, end)` of the instruction array.
pub(crate) struct Runner<'a> {
    program: &'a Program,
    instructions: &'a [Instruction],
    method: Option<&'a MethodInfo>,
    dictionary: Option<&'a OperandDictionary>,
    start: usize,
    end: usize,
    options: MatchOptions,
}

impl<'a> Runner<'a> {
    pub(crate) fn new(
        program: &'a Program,
        instructions: &'a [Instruction],
        method: Option<&'a MethodInfo>,
        dictionary: Option<&'a OperandDictionary>,
        start: usize,
        end: usize,
        options: MatchOptions,
    ) -> Self {
        Self {
            program,
            instructions,
            method,
            dictionary,
            start,
            end,
            options,
        }
    }

    /// Try every candidate start position in order; the first that
    /// matches wins.
    pub(crate) fn run(&self) -> Option<RunnerOutput> {
        for at in self.start..=self.end {
            trace!(at, "attempting match");
            let mut root = MatchState::new(
                self.program.root(),
                at,
                Captures::sized(self.program),
            );
            if self.state_first(&mut root) {
                let qm = root.iters.last()?;
                return Some(RunnerOutput {
                    start: at,
                    end: qm.end,
                    captures: qm.caps.clone(),
                });
            }
        }
        None
    }

    // --- Quantifier drivers ---

    /// Run a state's quantifier to its first configuration.
    fn state_first(&self, st: &mut MatchState) -> bool {
        let q = self.program.check(st.pc).quantifier;
        if q.greedy_with(self.options.swap_greedy) {
            self.grow_greedy(st, q.min(), q.max());
            if st.count() >= q.min() {
                return true;
            }
            self.greedy_next(st, q.min(), q.max(), true)
        } else {
            self.grow_to(st, q.min())
        }
    }

    /// Advance a state to its next configuration after a backtrack.
    fn state_continue(&self, st: &mut MatchState) -> bool {
        let q = self.program.check(st.pc).quantifier;
        if q.greedy_with(self.options.swap_greedy) {
            self.greedy_next(st, q.min(), q.max(), false)
        } else {
            self.lazy_next(st, q.min(), q.max())
        }
    }

    /// Push iterations while they match, up to `max`. Zero-width
    /// iterations stop the loop once `min` is reached, so quantified
    /// anchors and empty groups terminate.
    fn grow_greedy(&self, st: &mut MatchState, min: u32, max: u32) {
        while st.count() < max {
            match self.match_iteration(st) {
                None => break,
                Some((entry, end)) => {
                    if end == entry && st.count() >= min {
                        break;
                    }
                }
            }
        }
    }

    /// Grow a state to at least `target` iterations, re-running earlier
    /// iterations down other alternatives when a growth step fails.
    fn grow_to(&self, st: &mut MatchState, target: u32) -> bool {
        while st.count() < target {
            if self.match_iteration(st).is_none() {
                loop {
                    if st.iters.is_empty() {
                        return false;
                    }
                    if self.continue_top(st) {
                        break;
                    }
                    st.iters.pop();
                }
            }
        }
        true
    }

    /// The greedy backtracking step: vary the most recent choice, regrow
    /// to the longest configuration it allows, or concede one iteration.
    /// With `first` set, no configuration has been yielded yet and
    /// shorter stacks are not themselves answers until `min` is met.
    fn greedy_next(&self, st: &mut MatchState, min: u32, max: u32, first: bool) -> bool {
        loop {
            if st.iters.is_empty() {
                return false;
            }
            if self.continue_top(st) {
                self.grow_greedy(st, min, max);
                if st.count() >= min {
                    return true;
                }
            } else {
                st.iters.pop();
                if !first && st.count() >= min {
                    return true;
                }
            }
        }
    }

    /// The lazy backtracking step: prefer one more iteration, then vary
    /// the most recent choice and repair back up to `min`.
    fn lazy_next(&self, st: &mut MatchState, min: u32, max: u32) -> bool {
        if st.count() < max {
            if let Some((entry, end)) = self.match_iteration(st) {
                if end == entry && st.count() > min {
                    // A zero-width growth changes nothing; drop it and
                    // fall through to genuine alternatives.
                    st.iters.pop();
                } else {
                    return true;
                }
            }
        }
        loop {
            if st.iters.is_empty() {
                return false;
            }
            if self.continue_top(st) {
                if self.grow_to(st, min) {
                    return true;
                }
            } else {
                st.iters.pop();
            }
        }
    }

    // --- Iterations ---

    /// Attempt one more iteration of a state's check. On success the
    /// iteration is pushed and `(entry, end)` returned.
    fn match_iteration(&self, st: &mut MatchState) -> Option<(usize, usize)> {
        let entry = st.current_end();
        let entry_caps = st.current_caps().clone();
        if self.program.check(st.pc).is_group_start() {
            let mut qm = QuantMatch {
                entry,
                end: entry,
                entry_caps,
                caps: Captures::unused(),
                children: Vec::new(),
                alts: self.alternation_entries(st.pc),
            };
            if self.run_group_iter(st.pc, &mut qm) {
                let span = (entry, qm.end);
                st.iters.push(qm);
                Some(span)
            } else {
                None
            }
        } else {
            let mut caps = entry_caps;
            let consumed = self.match_atom(st.pc, entry, &mut caps)?;
            let end = entry + consumed;
            st.iters.push(QuantMatch {
                entry,
                end,
                entry_caps: Captures::unused(),
                caps,
                children: Vec::new(),
                alts: VecDeque::new(),
            });
            Some((entry, end))
        }
    }

    /// Re-run the top iteration of a group state down its next
    /// configuration. Atoms have no internal choices and always refuse.
    fn continue_top(&self, st: &mut MatchState) -> bool {
        if !self.program.check(st.pc).is_group_start() {
            return false;
        }
        let pc = st.pc;
        match st.iters.last_mut() {
            Some(qm) => self.run_group_iter(pc, qm),
            None => false,
        }
    }

    /// Path entry points of a group: the check after the start, then the
    /// check after each alternation bar.
    fn alternation_entries(&self, g_pc: usize) -> VecDeque<usize> {
        let check = self.program.check(g_pc);
        let mut entries = VecDeque::with_capacity(1 + check.alternatives.len());
        entries.push_back(g_pc + 1);
        for &alt in &check.alternatives {
            entries.push_back(alt + 1);
        }
        entries
    }

    /// Drive one iteration of a group to its next success.
    ///
    /// A fresh iteration has no children and a full alternation queue, so
    /// the backtrack phase immediately seeds the first path. A resumed
    /// iteration re-enters the backtrack phase over its existing
    /// children. Walking forward, every check becomes a child state;
    /// reaching the group's end (or one of its own alternation bars)
    /// completes the iteration.
    fn run_group_iter(&self, g_pc: usize, qm: &mut QuantMatch) -> bool {
        let group = self.program.check(g_pc);
        let end_index = group
            .other
            .expect("compiled group start is always paired");

        let mut phase = Phase::Backtrack;
        loop {
            match phase {
                Phase::Forward { idx, pos, caps } => {
                    if idx == end_index || group.alternatives.contains(&idx) {
                        qm.end = pos;
                        qm.caps = caps;
                        if let Some(slot) = group.capture {
                            qm.caps.groups[slot] = Some(GroupSpan {
                                start: qm.entry,
                                end: pos,
                            });
                        }
                        return true;
                    }
                    let mut child = MatchState::new(idx, pos, caps);
                    if self.state_first(&mut child) {
                        phase = Phase::Forward {
                            idx: self.next_index(child.pc),
                            pos: child.current_end(),
                            caps: child.current_caps().clone(),
                        };
                        qm.children.push(child);
                    } else {
                        phase = Phase::Backtrack;
                    }
                }
                Phase::Backtrack => {
                    if let Some(top) = qm.children.last_mut() {
                        if self.state_continue(top) {
                            phase = Phase::Forward {
                                idx: self.next_index(top.pc),
                                pos: top.current_end(),
                                caps: top.current_caps().clone(),
                            };
                        } else {
                            qm.children.pop();
                            phase = Phase::Backtrack;
                        }
                    } else if let Some(entry) = qm.alts.pop_front() {
                        phase = Phase::Forward {
                            idx: entry,
                            pos: qm.entry,
                            caps: qm.entry_caps.clone(),
                        };
                    } else {
                        return false;
                    }
                }
            }
        }
    }

    /// The lexical successor of a completed child: past the whole group
    /// for group starts, the next check otherwise.
    fn next_index(&self, pc: usize) -> usize {
        match self.program.check(pc).other {
            Some(end) if self.program.check(pc).is_group_start() => end + 1,
            _ => pc + 1,
        }
    }

    // --- Atoms ---

    /// Evaluate a non-group check at `pos`. Returns how many
    /// instructions it consumed, or `None` on mismatch. Capture writes
    /// land in `caps`.
    fn match_atom(&self, pc: usize, pos: usize, caps: &mut Captures) -> Option<usize> {
        let check = self.program.check(pc);
        match &check.kind {
            CheckKind::Nop => Some(0),
            CheckKind::Start => {
                let boundary = if self.options.search_boundaries {
                    self.start
                } else {
                    0
                };
                (pos == boundary).then_some(0)
            }
            CheckKind::End => {
                let boundary = if self.options.search_boundaries {
                    self.end
                } else {
                    self.instructions.len()
                };
                (pos == boundary).then_some(0)
            }
            CheckKind::Any => (pos < self.end).then_some(1),
            CheckKind::Opcode(matcher) => {
                let instruction = self.instruction_at(pos)?;
                matcher.matches(instruction.opcode()).then_some(1)
            }
            CheckKind::OpcodeOperand(matcher, expected) => {
                let instruction = self.instruction_at(pos)?;
                matches_instruction(instruction, *matcher, expected, self.method).then_some(1)
            }
            CheckKind::CaptureOperand { matcher, .. } => {
                let instruction = self.instruction_at(pos)?;
                if !matcher.matches(instruction.opcode()) {
                    return None;
                }
                let operand = if matcher.is_family() {
                    instruction
                        .effective_operand(self.method)
                        .unwrap_or(Operand::None)
                } else {
                    instruction.operand().clone()
                };
                if let Some(slot) = check.capture {
                    caps.operands[slot] = Some(operand);
                }
                Some(1)
            }
            CheckKind::EqualsOperand { matcher, target } => {
                let instruction = self.instruction_at(pos)?;
                if !matcher.matches(instruction.opcode()) {
                    return None;
                }
                let expected = self.resolve_operand_target(target, caps)?;
                let actual = if matcher.is_family() {
                    instruction
                        .effective_operand(self.method)
                        .unwrap_or(Operand::None)
                } else {
                    instruction.operand().clone()
                };
                actual.matches(&expected, matcher.is_family()).then_some(1)
            }
            CheckKind::MemberName { kind, matcher, .. } => {
                let instruction = self.instruction_at(pos)?;
                if !matcher.matches(instruction.opcode()) {
                    return None;
                }
                if instruction.operand().member_kind() != Some(*kind) {
                    return None;
                }
                let member = instruction.operand().as_member()?;
                let regex = self.program.member_regex(pc)?;
                regex.is_match(member.full_name()).then_some(1)
            }
            // Group delimiters and floating quantifiers never reach the
            // atom evaluator.
            CheckKind::Alternative
            | CheckKind::GroupStart { .. }
            | CheckKind::GroupEnd
            | CheckKind::Quantifier(_) => None,
        }
    }

    fn instruction_at(&self, pos: usize) -> Option<&Instruction> {
        if pos < self.end {
            self.instructions.get(pos)
        } else {
            None
        }
    }

    /// The operand an equality check compares against: an in-pattern
    /// capture first, then the caller's dictionary for unresolved names.
    fn resolve_operand_target(
        &self,
        target: &OperandRef,
        caps: &Captures,
    ) -> Option<Operand> {
        match target {
            OperandRef::Index(index) => caps.operands.get(*index).cloned().flatten(),
            OperandRef::Name(name) => {
                if let Some(slot) = self.program.operand_slot(name) {
                    if let Some(operand) = caps.operands.get(slot).cloned().flatten() {
                        return Some(operand);
                    }
                }
                self.dictionary
                    .and_then(|dictionary| dictionary.get(name).cloned())
            }
        }
    }
}
