//! Shared instruction-model types for the ILRegex engine.
//!
//! This crate provides the data the pattern and matcher crates operate
//! on:
//!
//! - [`Opcode`] — the closed CIL opcode enumeration with name lookup
//! - [`OpcodeFamily`] — multi-opcode families (`%ldarg`, `%ldc.i4`, …)
//! - [`OpcodeMatcher`] — a concrete opcode or a family
//! - [`Operand`] — the tagged operand union, with typed accessors
//! - [`Instruction`] — one opcode/operand pair
//! - [`MethodInfo`] — enclosing-method descriptor for short-form
//!   resolution
//! - [`matches_instruction`] — the instruction-equality contract used by
//!   every opcode-bearing check
//!
//! # Dependencies
//!
//! This crate uses `thiserror` (compile-time proc-macro, zero runtime
//! cost) and has no other dependencies.

pub mod error;
pub mod family;
pub mod instruction;
pub mod matcher;
pub mod method;
pub mod opcode;
pub mod operand;

// Re-export commonly used types at the crate root.
pub use error::TypeCastError;
pub use family::{OpcodeFamily, ALL_FAMILIES};
pub use instruction::{matches_instruction, Instruction};
pub use matcher::OpcodeMatcher;
pub use method::{MethodInfo, ParameterInfo, VariableInfo};
pub use opcode::{opcode_names, Opcode, ALL_OPCODES};
pub use operand::{MemberKind, MemberRef, Operand};
