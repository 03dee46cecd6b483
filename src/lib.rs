//! vmgen - Virtual machines generated from definition documents
//!
//! # Overview
//!
//! A definition document names a VM and declares its instructions: opcode,
//! description, fuel cost and the name of the host handler that executes it.
//! The host registers handlers by name, builds a [`Vm`] and dispatches
//! instructions (or whole [`Program`]s) against it. The VM meters every
//! successful dispatch in operations and fuel.
//!
//! # Quick Start
//!
//! ```
//! use vmgen::{Registry, Value, Vm};
//!
//! let source = r#"
//!     name = "Adder"
//!     author = "docs"
//!     receiver = "stack"
//!
//!     instruction ADD {
//!         description = "Sum of the two topmost values"
//!         fuel = 3
//!         execute = add
//!     }
//! "#;
//!
//! let registry = Registry::new().with_execute("add", |vm, _params| {
//!     let b = vm.stack_mut().pop()?.as_int()?;
//!     let a = vm.stack_mut().pop()?.as_int()?;
//!     vm.stack_mut().push(Value::Int(a + b))?;
//!     Ok(())
//! });
//!
//! let mut vm = Vm::from_source(source, &registry).unwrap();
//! vm.stack_mut().push(Value::Int(2)).unwrap();
//! vm.stack_mut().push(Value::Int(5)).unwrap();
//! vm.dispatch("ADD", &[]).unwrap();
//!
//! assert_eq!(vm.stack().peek(), Some(&Value::Int(7)));
//! assert_eq!(vm.stats().fuel(), 3);
//! ```
//!
//! # Standard library
//!
//! [`stdlib`] bundles a complete stack machine (arithmetic, control flow and
//! memory) that hosts can use as is or extend with their own handlers.

use std::path::Path;

pub use vmgen_core::{
    ConstructionError, Definition, DefinitionError, DefinitionErrorKind, DispatchError,
    ExecutionError, FuelCost, HandlerError, HandlerKind, Instruction, InstructionDecl,
    MemoryFaultError, Metadata, OpcodeTable, Program, ProgramError, ProgramInstruction, Registry,
    Report, ReportRow, RunError, RunOptions, RunOutcome, Span, Stats, UnknownOpcodeError,
    UnresolvedHandlerError, VERSION, Value, Vm, VmOptions, stdlib, version,
};

mod error_renderer;
pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};

/// Any failure surfaced to an application embedding vmgen.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(code(vmgen::definition))]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    #[diagnostic(code(vmgen::program))]
    Program(#[from] ProgramError),

    #[error(transparent)]
    #[diagnostic(code(vmgen::dispatch))]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    #[diagnostic(code(vmgen::run), help("raise the limit or check the program for loops"))]
    Run(#[from] RunError),

    #[error("cannot read `{path}`")]
    #[diagnostic(code(vmgen::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Read a program file. With `hex`, the file holds hex text instead of raw
/// bytes.
pub fn load_program(path: &Path, hex: bool) -> Result<Program, Error> {
    if !hex {
        return Ok(Program::from_file(path)?);
    }
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Program::from_hex(&text)?)
}

/// Build a VM from a definition file and the given registry.
///
/// Returns the document source alongside the result so that construction
/// errors can be rendered with [`render_error`].
pub fn load_vm(
    path: &Path,
    registry: &Registry,
    options: VmOptions,
) -> Result<(String, Result<Vm, ConstructionError>), Error> {
    let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })?;
    let vm = Definition::parse(&source)
        .map_err(ConstructionError::from)
        .and_then(|definition| Vm::with_options(&definition, registry, options));
    Ok((source, vm))
}
