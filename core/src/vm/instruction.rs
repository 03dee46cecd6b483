use alloc::sync::Arc;
use core::fmt;

use crate::String;
use crate::definition::Span;
use crate::vm::{ExecutionError, Vm};

/// Executes one instruction against the VM with its raw parameter bytes.
pub type ExecuteFn = Arc<dyn Fn(&mut Vm, &[u8]) -> Result<(), ExecutionError> + Send + Sync>;

/// Computes the fuel cost of one instruction from the VM and its parameters.
pub type FuelFn = Arc<dyn Fn(&Vm, &[u8]) -> u64 + Send + Sync>;

/// How the fuel cost of an instruction is determined.
///
/// Decided once at load time: a `fuel` field holding an integer literal is a
/// fixed cost, anything else names a fuel function.
#[derive(Clone)]
pub enum FuelCost {
    Fixed(u64),
    Function { name: String, cost: FuelFn },
}

impl FuelCost {
    pub fn is_fixed(&self) -> bool {
        matches!(self, FuelCost::Fixed(_))
    }

    pub fn fixed(&self) -> Option<u64> {
        match self {
            FuelCost::Fixed(cost) => Some(*cost),
            FuelCost::Function { .. } => None,
        }
    }

    pub fn function_name(&self) -> Option<&str> {
        match self {
            FuelCost::Fixed(_) => None,
            FuelCost::Function { name, .. } => Some(name),
        }
    }

    /// The cost of executing with `params`: the fixed cost when no function
    /// is bound, the function's result otherwise.
    #[inline]
    pub fn compute(&self, vm: &Vm, params: &[u8]) -> u64 {
        match self {
            FuelCost::Fixed(cost) => *cost,
            FuelCost::Function { cost, .. } => cost(vm, params),
        }
    }
}

impl fmt::Debug for FuelCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelCost::Fixed(cost) => f.debug_tuple("Fixed").field(cost).finish(),
            FuelCost::Function { name, .. } => f.debug_tuple("Function").field(name).finish(),
        }
    }
}

impl fmt::Display for FuelCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelCost::Fixed(cost) => write!(f, "{}", cost),
            FuelCost::Function { name, .. } => write!(f, "{}", name),
        }
    }
}

/// A resolved row of the opcode table.
#[derive(Clone)]
pub struct Instruction {
    pub(crate) opcode: String,
    pub(crate) description: String,
    pub(crate) handler: String,
    pub(crate) execute: ExecuteFn,
    pub(crate) fuel: FuelCost,
    pub(crate) span: Span,
}

impl Instruction {
    pub fn opcode(&self) -> &str {
        &self.opcode
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Name of the execute handler this instruction was bound to.
    pub fn handler_name(&self) -> &str {
        &self.handler
    }

    pub fn fuel(&self) -> &FuelCost {
        &self.fuel
    }

    /// Location of the declaring `instruction` element.
    pub fn span(&self) -> &Span {
        &self.span
    }

    #[inline]
    pub(crate) fn execute(&self, vm: &mut Vm, params: &[u8]) -> Result<(), ExecutionError> {
        (self.execute)(vm, params)
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instruction")
            .field("opcode", &self.opcode)
            .field("description", &self.description)
            .field("handler", &self.handler)
            .field("fuel", &self.fuel)
            .finish()
    }
}
