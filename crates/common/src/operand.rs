//! Operand representation for CIL instructions.
//!
//! Operands are heterogeneous: inline numeric constants, strings,
//! parameter and variable indices, metadata references and branch
//! targets. The [`Operand`] enum is the tagged union over all of them;
//! equality and display dispatch on the variant.

use std::fmt;
use std::sync::Arc;

use crate::error::TypeCastError;
use crate::instruction::Instruction;

/// The metadata member kinds a reference operand can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// A field reference.
    Field,
    /// A method reference.
    Method,
    /// A type reference.
    Type,
    /// A standalone call-site signature.
    CallSite,
}

impl MemberKind {
    /// Lowercase noun used in messages and display.
    pub fn name(self) -> &'static str {
        match self {
            MemberKind::Field => "field",
            MemberKind::Method => "method",
            MemberKind::Type => "type",
            MemberKind::CallSite => "callsite",
        }
    }
}

/// A reference to a metadata member: a fully qualified name plus the
/// identifier of the module that owns it.
///
/// Both parts are shared strings so clones stay cheap; equality compares
/// `(full_name, module)` so the same member resolved through two modules
/// is not conflated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberRef {
    full_name: Arc<str>,
    module: Arc<str>,
}

impl MemberRef {
    /// Create a member reference.
    pub fn new(full_name: impl Into<Arc<str>>, module: impl Into<Arc<str>>) -> Self {
        Self {
            full_name: full_name.into(),
            module: module.into(),
        }
    }

    /// The fully qualified member name, e.g. `System.Void Foo::M()`.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Identifier of the owning module.
    pub fn module(&self) -> &str {
        &self.module
    }
}

/// The inline argument of an instruction.
#[derive(Debug, Clone)]
pub enum Operand {
    /// No operand.
    None,
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// 8-bit signed integer (`ldc.i4.s` and friends).
    Int8(i8),
    /// 8-bit unsigned integer.
    UInt8(u8),
    /// 32-bit float.
    Float32(f32),
    /// 64-bit float.
    Float64(f64),
    /// String literal (`ldstr`).
    String(Arc<str>),
    /// Method parameter, by index.
    Parameter(u16),
    /// Local variable, by index.
    Variable(u16),
    /// Field reference.
    Field(MemberRef),
    /// Method reference.
    Method(MemberRef),
    /// Type reference.
    Type(MemberRef),
    /// Standalone call-site signature.
    CallSite(MemberRef),
    /// Branch target. Compared by identity, not by content, so cyclic
    /// branch structures never recurse.
    Target(Arc<Instruction>),
    /// Switch target table. Compared by identity.
    TargetArray(Arc<[Instruction]>),
}

impl Operand {
    /// Shorthand for a string operand.
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Operand::String(s.into())
    }

    /// Lowercase name of this operand's kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Operand::None => "none",
            Operand::Int32(_) => "int32",
            Operand::Int64(_) => "int64",
            Operand::Int8(_) => "int8",
            Operand::UInt8(_) => "uint8",
            Operand::Float32(_) => "float32",
            Operand::Float64(_) => "float64",
            Operand::String(_) => "string",
            Operand::Parameter(_) => "parameter",
            Operand::Variable(_) => "variable",
            Operand::Field(_) => "field",
            Operand::Method(_) => "method",
            Operand::Type(_) => "type",
            Operand::CallSite(_) => "callsite",
            Operand::Target(_) => "target",
            Operand::TargetArray(_) => "target array",
        }
    }

    /// True for `Operand::None`.
    pub fn is_none(&self) -> bool {
        matches!(self, Operand::None)
    }

    /// The member kind of a reference operand, if it is one.
    pub fn member_kind(&self) -> Option<MemberKind> {
        match self {
            Operand::Field(_) => Some(MemberKind::Field),
            Operand::Method(_) => Some(MemberKind::Method),
            Operand::Type(_) => Some(MemberKind::Type),
            Operand::CallSite(_) => Some(MemberKind::CallSite),
            _ => None,
        }
    }

    /// The member reference of a reference operand, if it is one.
    pub fn as_member(&self) -> Option<&MemberRef> {
        match self {
            Operand::Field(m)
            | Operand::Method(m)
            | Operand::Type(m)
            | Operand::CallSite(m) => Some(m),
            _ => None,
        }
    }

    /// Compare against an expected operand.
    ///
    /// In strict mode this is plain equality. In relaxed mode, which
    /// applies when the opcode side of the check is a family rather than
    /// a concrete opcode, numeric primitives of different types compare
    /// by value, so `Int8(5)` from `ldc.i4.s` matches an expected
    /// `Int32(5)`.
    pub fn matches(&self, expected: &Operand, relaxed: bool) -> bool {
        if self == expected {
            return true;
        }
        if relaxed {
            if let (Some(a), Some(b)) = (self.numeric(), expected.numeric()) {
                return a.eq_by_value(b);
            }
        }
        false
    }

    fn numeric(&self) -> Option<Numeric> {
        match *self {
            Operand::Int32(v) => Some(Numeric::Int(v as i128)),
            Operand::Int64(v) => Some(Numeric::Int(v as i128)),
            Operand::Int8(v) => Some(Numeric::Int(v as i128)),
            Operand::UInt8(v) => Some(Numeric::Int(v as i128)),
            Operand::Float32(v) => Some(Numeric::Float(v as f64)),
            Operand::Float64(v) => Some(Numeric::Float(v)),
            _ => None,
        }
    }
}

#[derive(Clone, Copy)]
enum Numeric {
    Int(i128),
    Float(f64),
}

impl Numeric {
    fn eq_by_value(self, other: Numeric) -> bool {
        match (self, other) {
            (Numeric::Int(a), Numeric::Int(b)) => a == b,
            (Numeric::Float(a), Numeric::Float(b)) => a == b,
            (Numeric::Int(a), Numeric::Float(b)) | (Numeric::Float(b), Numeric::Int(a)) => {
                a as f64 == b
            }
        }
    }
}

// Floats compare by bit pattern so Operand stays Eq-capable and usable as
// a map value; matching never relies on NaN equality.
impl PartialEq for Operand {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Operand::None, Operand::None) => true,
            (Operand::Int32(a), Operand::Int32(b)) => a == b,
            (Operand::Int64(a), Operand::Int64(b)) => a == b,
            (Operand::Int8(a), Operand::Int8(b)) => a == b,
            (Operand::UInt8(a), Operand::UInt8(b)) => a == b,
            (Operand::Float32(a), Operand::Float32(b)) => a.to_bits() == b.to_bits(),
            (Operand::Float64(a), Operand::Float64(b)) => a.to_bits() == b.to_bits(),
            (Operand::String(a), Operand::String(b)) => a == b,
            (Operand::Parameter(a), Operand::Parameter(b)) => a == b,
            (Operand::Variable(a), Operand::Variable(b)) => a == b,
            (Operand::Field(a), Operand::Field(b)) => a == b,
            (Operand::Method(a), Operand::Method(b)) => a == b,
            (Operand::Type(a), Operand::Type(b)) => a == b,
            (Operand::CallSite(a), Operand::CallSite(b)) => a == b,
            (Operand::Target(a), Operand::Target(b)) => Arc::ptr_eq(a, b),
            (Operand::TargetArray(a), Operand::TargetArray(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Operand {}

macro_rules! typed_accessor {
    ($fn_name:ident, $variant:ident, $ty:ty, $kind:literal) => {
        #[doc = concat!("The ", $kind, " value, or a [`TypeCastError`] for any other kind.")]
        pub fn $fn_name(&self) -> Result<$ty, TypeCastError> {
            match self {
                Operand::$variant(v) => Ok(*v),
                other => Err(TypeCastError::new($kind, other.kind_name())),
            }
        }
    };
}

impl Operand {
    typed_accessor!(as_i32, Int32, i32, "int32");
    typed_accessor!(as_i64, Int64, i64, "int64");
    typed_accessor!(as_i8, Int8, i8, "int8");
    typed_accessor!(as_u8, UInt8, u8, "uint8");
    typed_accessor!(as_f32, Float32, f32, "float32");
    typed_accessor!(as_f64, Float64, f64, "float64");
    typed_accessor!(as_parameter, Parameter, u16, "parameter");
    typed_accessor!(as_variable, Variable, u16, "variable");

    /// The string value, or a [`TypeCastError`] for any other kind.
    pub fn as_str(&self) -> Result<&str, TypeCastError> {
        match self {
            Operand::String(s) => Ok(s),
            other => Err(TypeCastError::new("string", other.kind_name())),
        }
    }

    /// The branch target, or a [`TypeCastError`] for any other kind.
    pub fn as_target(&self) -> Result<&Arc<Instruction>, TypeCastError> {
        match self {
            Operand::Target(t) => Ok(t),
            other => Err(TypeCastError::new("target", other.kind_name())),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => Ok(()),
            Operand::Int32(v) => write!(f, "{v}"),
            Operand::Int64(v) => write!(f, "{v}l"),
            Operand::Int8(v) => write!(f, "{v}sb"),
            Operand::UInt8(v) => write!(f, "{v}b"),
            Operand::Float32(v) => write!(f, "{v}f"),
            Operand::Float64(v) => write!(f, "{v}d"),
            Operand::String(s) => write!(f, "{:?}", s.as_ref()),
            Operand::Parameter(i) => write!(f, "arg({i})"),
            Operand::Variable(i) => write!(f, "loc({i})"),
            Operand::Field(m)
            | Operand::Method(m)
            | Operand::Type(m)
            | Operand::CallSite(m) => f.write_str(m.full_name()),
            Operand::Target(t) => write!(f, "-> {}", t.opcode()),
            Operand::TargetArray(ts) => write!(f, "-> [{} targets]", ts.len()),
        }
    }
}
