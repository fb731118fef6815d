//! Enclosing-method descriptor.
//!
//! A [`MethodInfo`] is the view of a method body the engine needs:
//! its instruction stream plus the parameter and variable lists used to
//! resolve short-form operands like `ldarg.1`.

use crate::instruction::Instruction;

/// A method parameter, as far as matching is concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterInfo {
    /// Declared name, when the metadata preserves one.
    pub name: Option<String>,
}

impl ParameterInfo {
    /// A parameter with a known name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// A local variable slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableInfo {
    /// Declared name, when debug information preserves one.
    pub name: Option<String>,
}

/// The enclosing method a pattern is matched against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodInfo {
    parameters: Vec<ParameterInfo>,
    variables: Vec<VariableInfo>,
    instructions: Vec<Instruction>,
}

impl MethodInfo {
    /// Assemble a method descriptor.
    pub fn new(
        parameters: Vec<ParameterInfo>,
        variables: Vec<VariableInfo>,
        instructions: Vec<Instruction>,
    ) -> Self {
        Self {
            parameters,
            variables,
            instructions,
        }
    }

    /// A descriptor with just a body, no parameters or variables.
    pub fn from_instructions(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            ..Self::default()
        }
    }

    /// The parameter list, indexed the way `ldarg` indexes it.
    pub fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    /// The local variable list, indexed the way `ldloc` indexes it.
    pub fn variables(&self) -> &[VariableInfo] {
        &self.variables
    }

    /// The method body.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}
