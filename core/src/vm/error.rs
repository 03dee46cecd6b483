//! Errors raised while building a VM or executing instructions.
//!
//! # Error Categories
//!
//! - **Construction errors** ([`ConstructionError`]): the definition is invalid
//!   or references handlers the host did not register. No VM is produced.
//!
//! - **Execution errors** ([`ExecutionError`]): what an execute handler may
//!   return. A [`MemoryFaultError`] leaves the VM faulted until it is reset; a
//!   [`HandlerError`] is a domain failure and the VM stays usable.
//!
//! - **Dispatch errors** ([`DispatchError`]): everything `Vm::dispatch` can
//!   report. Statistics are never updated for a failed dispatch.

use thiserror::Error;

use crate::definition::{DefinitionError, Span};
use crate::vm::Value;
use crate::{String, ToString};

/// Which registry a name was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Execute,
    Fuel,
}

impl core::fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HandlerKind::Execute => write!(f, "execute handler"),
            HandlerKind::Fuel => write!(f, "fuel function"),
        }
    }
}

/// An instruction references a handler name absent from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("instruction `{opcode}` references unknown {kind} `{name}`")]
pub struct UnresolvedHandlerError {
    pub opcode: String,
    pub kind: HandlerKind,
    pub name: String,
    pub span: Span,
}

/// Building a VM failed; no VM was produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    UnresolvedHandler(#[from] UnresolvedHandlerError),
}

impl ConstructionError {
    /// Source location of the offending declaration.
    pub fn span(&self) -> &Span {
        match self {
            ConstructionError::Definition(err) => &err.span,
            ConstructionError::UnresolvedHandler(err) => &err.span,
        }
    }
}

/// `dispatch` was called with an opcode the table does not contain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown opcode `{opcode}`")]
pub struct UnknownOpcodeError {
    pub opcode: String,
}

/// An instruction accessed the stack or memory out of bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryFaultError {
    #[error("stack underflow: needed {needed} value(s), {available} available")]
    StackUnderflow { needed: usize, available: usize },

    #[error("stack overflow: capacity of {capacity} values exceeded")]
    StackOverflow { capacity: usize },

    #[error("memory address {address} out of bounds (size: {size})")]
    OutOfBounds { address: usize, size: usize },

    #[error("memory size {requested} exceeds the limit of {max}")]
    MemoryLimit { requested: usize, max: usize },
}

/// A domain failure signalled by an execute handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,

    #[error("invalid operand: expected {expected}, got {found} byte(s)")]
    InvalidOperand { expected: &'static str, found: usize },

    #[error("{0}")]
    Custom(String),
}

impl HandlerError {
    pub fn type_mismatch(expected: &'static str, found: &Value) -> Self {
        HandlerError::TypeMismatch {
            expected,
            found: found.type_name(),
        }
    }

    pub fn custom(message: impl core::fmt::Display) -> Self {
        HandlerError::Custom(message.to_string())
    }
}

/// What an execute handler returns on failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    MemoryFault(#[from] MemoryFaultError),

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// Failure of a single `Vm::dispatch` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    UnknownOpcode(#[from] UnknownOpcodeError),

    #[error(transparent)]
    MemoryFault(#[from] MemoryFaultError),

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error("vm is faulted; reset it before dispatching `{opcode}`")]
    Faulted { opcode: String },
}

impl From<ExecutionError> for DispatchError {
    fn from(err: ExecutionError) -> Self {
        match err {
            ExecutionError::MemoryFault(fault) => DispatchError::MemoryFault(fault),
            ExecutionError::Handler(err) => DispatchError::Handler(err),
        }
    }
}
