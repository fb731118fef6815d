//! Multi-opcode families.
//!
//! A family names a set of logically equivalent opcodes: every
//! short-form and full-form variant of one operation. Pattern checks can
//! reference a family (`%ldarg`) instead of a concrete opcode, and a
//! family knows how to synthesize the operand a short form leaves
//! implicit (`ldc.i4.7` carries a 7 in the opcode itself).

use crate::method::MethodInfo;
use crate::opcode::Opcode;
use crate::operand::Operand;

macro_rules! families {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// A named set of logically equivalent opcodes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum OpcodeFamily {
            $(
                #[doc = concat!("The `", $name, "` family.")]
                $variant,
            )*
        }

        /// All families, `any` first.
        pub const ALL_FAMILIES: &[OpcodeFamily] = &[$(OpcodeFamily::$variant,)*];

        impl OpcodeFamily {
            /// The family's name as written in patterns (without the `%`).
            pub fn name(self) -> &'static str {
                match self {
                    $(OpcodeFamily::$variant => $name,)*
                }
            }
        }
    };
}

families! {
    Any => "any",
    Ldarg => "ldarg",
    Ldarga => "ldarga",
    Starg => "starg",
    Ldloc => "ldloc",
    Ldloca => "ldloca",
    Stloc => "stloc",
    LdcI4 => "ldc.i4",
    Br => "br",
    Brfalse => "brfalse",
    Brtrue => "brtrue",
    Beq => "beq",
    BneUn => "bne.un",
    Bge => "bge",
    BgeUn => "bge.un",
    Bgt => "bgt",
    BgtUn => "bgt.un",
    Ble => "ble",
    BleUn => "ble.un",
    Blt => "blt",
    BltUn => "blt.un",
    Leave => "leave",
}

impl OpcodeFamily {
    /// Look up a family by name, case-insensitively, with `.` and `_`
    /// interchangeable.
    pub fn from_name(name: &str) -> Option<OpcodeFamily> {
        let normalized = name.to_ascii_lowercase().replace('_', ".");
        ALL_FAMILIES
            .iter()
            .find(|fam| fam.name() == normalized)
            .copied()
    }

    /// Whether the concrete opcode belongs to this family.
    pub fn matches(self, op: Opcode) -> bool {
        use Opcode::*;
        match self {
            OpcodeFamily::Any => true,
            OpcodeFamily::Ldarg => {
                matches!(op, Ldarg0 | Ldarg1 | Ldarg2 | Ldarg3 | LdargS | Ldarg)
            }
            OpcodeFamily::Ldarga => matches!(op, LdargaS | Ldarga),
            OpcodeFamily::Starg => matches!(op, StargS | Starg),
            OpcodeFamily::Ldloc => {
                matches!(op, Ldloc0 | Ldloc1 | Ldloc2 | Ldloc3 | LdlocS | Ldloc)
            }
            OpcodeFamily::Ldloca => matches!(op, LdlocaS | Ldloca),
            OpcodeFamily::Stloc => {
                matches!(op, Stloc0 | Stloc1 | Stloc2 | Stloc3 | StlocS | Stloc)
            }
            OpcodeFamily::LdcI4 => matches!(
                op,
                LdcI4M1
                    | LdcI40
                    | LdcI41
                    | LdcI42
                    | LdcI43
                    | LdcI44
                    | LdcI45
                    | LdcI46
                    | LdcI47
                    | LdcI48
                    | LdcI4S
                    | LdcI4
            ),
            OpcodeFamily::Br => matches!(op, BrS | Br),
            OpcodeFamily::Brfalse => matches!(op, BrfalseS | Brfalse),
            OpcodeFamily::Brtrue => matches!(op, BrtrueS | Brtrue),
            OpcodeFamily::Beq => matches!(op, BeqS | Beq),
            OpcodeFamily::BneUn => matches!(op, BneUnS | BneUn),
            OpcodeFamily::Bge => matches!(op, BgeS | Bge),
            OpcodeFamily::BgeUn => matches!(op, BgeUnS | BgeUn),
            OpcodeFamily::Bgt => matches!(op, BgtS | Bgt),
            OpcodeFamily::BgtUn => matches!(op, BgtUnS | BgtUn),
            OpcodeFamily::Ble => matches!(op, BleS | Ble),
            OpcodeFamily::BleUn => matches!(op, BleUnS | BleUn),
            OpcodeFamily::Blt => matches!(op, BltS | Blt),
            OpcodeFamily::BltUn => matches!(op, BltUnS | BltUn),
            OpcodeFamily::Leave => matches!(op, LeaveS | Leave),
        }
    }

    /// Synthesize the operand a short-form opcode leaves implicit.
    ///
    /// Constant shortcuts decode to their integer value; parameter and
    /// variable shortcuts resolve by index, validated against the
    /// enclosing method's lists when one is supplied. Opcodes that carry
    /// an explicit operand (or belong to no shortcut scheme) synthesize
    /// nothing.
    pub fn implied_operand(op: Opcode, method: Option<&MethodInfo>) -> Option<Operand> {
        use Opcode::*;
        match op {
            Ldarg0 => parameter(0, method),
            Ldarg1 => parameter(1, method),
            Ldarg2 => parameter(2, method),
            Ldarg3 => parameter(3, method),
            Ldloc0 => variable(0, method),
            Ldloc1 => variable(1, method),
            Ldloc2 => variable(2, method),
            Ldloc3 => variable(3, method),
            Stloc0 => variable(0, method),
            Stloc1 => variable(1, method),
            Stloc2 => variable(2, method),
            Stloc3 => variable(3, method),
            LdcI4M1 => Some(Operand::Int32(-1)),
            LdcI40 => Some(Operand::Int32(0)),
            LdcI41 => Some(Operand::Int32(1)),
            LdcI42 => Some(Operand::Int32(2)),
            LdcI43 => Some(Operand::Int32(3)),
            LdcI44 => Some(Operand::Int32(4)),
            LdcI45 => Some(Operand::Int32(5)),
            LdcI46 => Some(Operand::Int32(6)),
            LdcI47 => Some(Operand::Int32(7)),
            LdcI48 => Some(Operand::Int32(8)),
            _ => None,
        }
    }
}

fn parameter(index: u16, method: Option<&MethodInfo>) -> Option<Operand> {
    match method {
        Some(m) if (index as usize) >= m.parameters().len() => None,
        _ => Some(Operand::Parameter(index)),
    }
}

fn variable(index: u16, method: Option<&MethodInfo>) -> Option<Operand> {
    match method {
        Some(m) if (index as usize) >= m.variables().len() => None,
        _ => Some(Operand::Variable(index)),
    }
}

impl std::fmt::Display for OpcodeFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
