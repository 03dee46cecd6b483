mod error;
mod instruction;
mod memory;
mod options;
mod registry;
mod runner;
mod runtime;
mod stack;
mod stats;
mod table;
mod value;

pub use error::{
    ConstructionError, DispatchError, ExecutionError, HandlerError, HandlerKind,
    MemoryFaultError, UnknownOpcodeError, UnresolvedHandlerError,
};
pub use instruction::{ExecuteFn, FuelCost, FuelFn, Instruction};
pub use memory::Memory;
pub use options::{RunOptions, VmOptions};
pub use registry::Registry;
pub use runner::{RunError, RunOutcome};
pub use runtime::{Metadata, Vm, VmState};
pub use stack::Stack;
pub use stats::Stats;
pub use table::OpcodeTable;
pub use value::Value;
