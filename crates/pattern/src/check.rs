//! Checks: the atoms of a pattern.
//!
//! A check is one logical matching step. The parser produces a flat
//! sequence of checks (group delimiters included), the builder attaches
//! floating quantifiers, and the compiler clones checks into a program
//! while filling in the capture, pair-link and alternation fields.

use std::fmt;

use ilregex_common::{MemberKind, OpcodeMatcher, Operand};

use crate::quantifier::Quantifier;

/// Target of an operand-equality check: a named capture (or dictionary
/// entry) or a numeric capture slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandRef {
    /// By capture name; falls back to the operand dictionary when the
    /// pattern has no capture with this name.
    Name(String),
    /// By operand capture slot.
    Index(usize),
}

impl fmt::Display for OperandRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandRef::Name(name) => f.write_str(name),
            OperandRef::Index(index) => write!(f, "{index}"),
        }
    }
}

/// What a check does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckKind {
    /// Matches nothing and always succeeds. The compiler inserts these
    /// as the program sentinel and as filler for empty alternatives.
    Nop,
    /// Zero-width start anchor (`^`).
    Start,
    /// Zero-width end anchor (`$`).
    End,
    /// Matches one instruction unconditionally (`.`).
    Any,
    /// Splits the enclosing group into an alternation path (`|`).
    Alternative,
    /// Opens a group (`(`, `(?:`, `(?'name'`).
    GroupStart {
        /// Whether the group captures.
        capturing: bool,
        /// Capture name for `(?'name'` groups.
        name: Option<String>,
    },
    /// Closes a group (`)`).
    GroupEnd,
    /// Matches the opcode only (`<op …>`).
    Opcode(OpcodeMatcher),
    /// Matches the opcode and compares the operand to a literal
    /// (`<op … lit>`).
    OpcodeOperand(OpcodeMatcher, Operand),
    /// Matches the opcode and stores the operand (`<cap …>`).
    CaptureOperand {
        /// Opcode side of the check.
        matcher: OpcodeMatcher,
        /// Capture name; anonymous captures get only a slot.
        name: Option<String>,
    },
    /// Matches the opcode and requires operand equality with an earlier
    /// capture or a dictionary entry (`<ceq …>`).
    EqualsOperand {
        /// Opcode side of the check.
        matcher: OpcodeMatcher,
        /// Which captured operand to compare against.
        target: OperandRef,
    },
    /// Matches the opcode and tests the reference operand's fully
    /// qualified name (`<fld …>`, `<mth …>`, `<typ …>`, `<cls …>`).
    MemberName {
        /// Which member kind the operand must be.
        kind: MemberKind,
        /// Opcode side of the check.
        matcher: OpcodeMatcher,
        /// The name pattern as written; compiled per the member-name
        /// derivation rules.
        pattern: String,
    },
    /// A floating quantifier awaiting attachment. Parser output only;
    /// never survives into a compiled program.
    Quantifier(Quantifier),
}

/// One element of a pattern.
///
/// `capture`, `other` and `alternatives` are assigned by the compiler
/// and are meaningless on freshly parsed checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    /// What this check does.
    pub kind: CheckKind,
    /// How often it repeats.
    pub quantifier: Quantifier,
    /// Capture slot: group index for capturing group starts, operand
    /// slot for operand captures.
    pub capture: Option<usize>,
    /// Program index of the paired delimiter, for group starts and ends.
    pub other: Option<usize>,
    /// Program indices of the `Alternative` checks directly inside this
    /// group, for group starts and ends.
    pub alternatives: Vec<usize>,
}

impl Check {
    /// A check with the identity quantifier.
    pub fn new(kind: CheckKind) -> Self {
        Self {
            kind,
            quantifier: Quantifier::exactly_one(),
            capture: None,
            other: None,
            alternatives: Vec::new(),
        }
    }

    /// A check with an explicit quantifier.
    pub fn with_quantifier(kind: CheckKind, quantifier: Quantifier) -> Self {
        Self {
            quantifier,
            ..Self::new(kind)
        }
    }

    /// Whether a floating quantifier may fuse onto this check: its own
    /// quantifier must still be the identity and it must not be a group
    /// start, an alternation bar or another quantifier.
    pub fn accepts_quantifier(&self) -> bool {
        self.quantifier.is_one()
            && !matches!(
                self.kind,
                CheckKind::GroupStart { .. } | CheckKind::Alternative | CheckKind::Quantifier(_)
            )
    }

    /// Whether this check consumes an instruction when it matches.
    pub fn consumes(&self) -> bool {
        matches!(
            self.kind,
            CheckKind::Any
                | CheckKind::Opcode(_)
                | CheckKind::OpcodeOperand(..)
                | CheckKind::CaptureOperand { .. }
                | CheckKind::EqualsOperand { .. }
                | CheckKind::MemberName { .. }
        )
    }

    /// Whether this check opens a group.
    pub fn is_group_start(&self) -> bool {
        matches!(self.kind, CheckKind::GroupStart { .. })
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CheckKind::Nop => f.write_str("<nop>")?,
            CheckKind::Start => f.write_str("^")?,
            CheckKind::End => f.write_str("$")?,
            CheckKind::Any => f.write_str(".")?,
            CheckKind::Alternative => return f.write_str("|"),
            CheckKind::GroupStart { capturing, name } => {
                return match (*capturing, name) {
                    (false, _) => f.write_str("(?:"),
                    (true, Some(name)) => write!(f, "(?'{name}'"),
                    (true, None) => f.write_str("("),
                };
            }
            CheckKind::GroupEnd => f.write_str(")")?,
            CheckKind::Opcode(matcher) => write!(f, "<op {matcher}>")?,
            CheckKind::OpcodeOperand(matcher, operand) => {
                write!(f, "<op {matcher} {operand}>")?
            }
            CheckKind::CaptureOperand { matcher, name } => match name {
                Some(name) => write!(f, "<cap {matcher} '{name}'>")?,
                None => write!(f, "<cap {matcher}>")?,
            },
            CheckKind::EqualsOperand { matcher, target } => {
                write!(f, "<ceq {matcher} '{target}'>")?
            }
            CheckKind::MemberName {
                kind,
                matcher,
                pattern,
            } => {
                let prefix = match kind {
                    MemberKind::Field => "fld",
                    MemberKind::Method => "mth",
                    MemberKind::Type => "typ",
                    MemberKind::CallSite => "cls",
                };
                write!(f, "<{prefix} {matcher} {pattern:?}>")?
            }
            CheckKind::Quantifier(q) => return write!(f, "{q}"),
        }
        write!(f, "{}", self.quantifier)
    }
}
