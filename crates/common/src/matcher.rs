//! Opcode matchers: a concrete opcode or a whole family.

use std::fmt;

use crate::family::OpcodeFamily;
use crate::opcode::Opcode;

/// The opcode side of a pattern check: either one concrete opcode or a
/// multi-opcode family.
///
/// A family compares equal to every opcode it contains, which is the
/// invariant the matcher relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpcodeMatcher {
    /// Exactly this opcode.
    Single(Opcode),
    /// Any opcode in the family.
    Family(OpcodeFamily),
}

impl OpcodeMatcher {
    /// Whether the given opcode satisfies this matcher.
    pub fn matches(self, op: Opcode) -> bool {
        match self {
            OpcodeMatcher::Single(expected) => expected == op,
            OpcodeMatcher::Family(family) => family.matches(op),
        }
    }

    /// True when this matcher is a family rather than a concrete opcode.
    /// Family checks compare operands with relaxed numeric typing.
    pub fn is_family(self) -> bool {
        matches!(self, OpcodeMatcher::Family(_))
    }

    /// Parse a matcher as written in patterns: `%name` for a family,
    /// `any` for the universal family, a plain opcode name otherwise.
    pub fn from_name(name: &str) -> Option<OpcodeMatcher> {
        if let Some(family) = name.strip_prefix('%') {
            return OpcodeFamily::from_name(family).map(OpcodeMatcher::Family);
        }
        if name.eq_ignore_ascii_case("any") {
            return Some(OpcodeMatcher::Family(OpcodeFamily::Any));
        }
        Opcode::from_name(name).map(OpcodeMatcher::Single)
    }
}

impl From<Opcode> for OpcodeMatcher {
    fn from(op: Opcode) -> Self {
        OpcodeMatcher::Single(op)
    }
}

impl From<OpcodeFamily> for OpcodeMatcher {
    fn from(family: OpcodeFamily) -> Self {
        OpcodeMatcher::Family(family)
    }
}

impl fmt::Display for OpcodeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpcodeMatcher::Single(op) => write!(f, "{op}"),
            OpcodeMatcher::Family(OpcodeFamily::Any) => f.write_str("any"),
            OpcodeMatcher::Family(family) => write!(f, "%{family}"),
        }
    }
}
