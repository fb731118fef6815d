//! The instruction model the engine matches against.

use std::fmt;

use crate::family::OpcodeFamily;
use crate::matcher::OpcodeMatcher;
use crate::method::MethodInfo;
use crate::opcode::Opcode;
use crate::operand::Operand;

/// One CIL instruction: an opcode and its inline operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    opcode: Opcode,
    operand: Operand,
}

impl Instruction {
    /// Create an instruction.
    pub fn new(opcode: Opcode, operand: Operand) -> Self {
        Self { opcode, operand }
    }

    /// An instruction with no operand.
    pub fn bare(opcode: Opcode) -> Self {
        Self::new(opcode, Operand::None)
    }

    /// The opcode.
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// The inline operand; [`Operand::None`] when there is none.
    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// The operand this instruction carries for matching purposes: the
    /// explicit operand when present, otherwise the operand implied by a
    /// short-form opcode (`ldarg.1`, `ldc.i4.7`), resolved against the
    /// enclosing method when one is supplied.
    pub fn effective_operand(&self, method: Option<&MethodInfo>) -> Option<Operand> {
        if !self.operand.is_none() {
            return Some(self.operand.clone());
        }
        OpcodeFamily::implied_operand(self.opcode, method)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operand.is_none() {
            write!(f, "{}", self.opcode)
        } else {
            write!(f, "{} {}", self.opcode, self.operand)
        }
    }
}

/// Decide whether an instruction satisfies an opcode matcher together
/// with an expected operand.
///
/// The opcode must satisfy the matcher. The operand comparison then
/// depends on the matcher's shape: a concrete opcode compares the
/// explicit operand strictly, while a family first synthesizes the
/// operand implied by short forms and compares numerics by value (so
/// `ldc.i4.5` satisfies a `%ldc.i4` check expecting `5`, and `ldarg.2`
/// satisfies a `%ldarg` check expecting parameter 2).
pub fn matches_instruction(
    instruction: &Instruction,
    matcher: OpcodeMatcher,
    expected: &Operand,
    method: Option<&MethodInfo>,
) -> bool {
    if !matcher.matches(instruction.opcode()) {
        return false;
    }
    if matcher.is_family() {
        match instruction.effective_operand(method) {
            Some(actual) => actual.matches(expected, true),
            None => expected.is_none(),
        }
    } else {
        instruction.operand().matches(expected, false)
    }
}
