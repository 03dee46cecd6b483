#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

// Re-export for convenience so other modules don't need alloc:: prefix
#[allow(unused_imports)]
pub(crate) use alloc::{boxed::Box, format, string::String, string::ToString, vec, vec::Vec};

pub mod definition;
pub mod program;
pub mod report;
pub mod stdlib;
pub mod vm;

pub use definition::{Definition, DefinitionError, DefinitionErrorKind, InstructionDecl, Span};
pub use program::{Program, ProgramError, ProgramInstruction};
pub use report::{Report, ReportRow};
pub use vm::{
    ConstructionError, DispatchError, ExecutionError, FuelCost, HandlerError, HandlerKind,
    Instruction, MemoryFaultError, Metadata, OpcodeTable, Registry, RunError, RunOptions,
    RunOutcome, Stats, UnknownOpcodeError, UnresolvedHandlerError, Value, Vm, VmOptions,
};

/// Version of this crate, exposed for diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the semantic version string of the VM core.
pub fn version() -> &'static str {
    VERSION
}
