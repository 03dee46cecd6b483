//! Standard instruction set
//!
//! A ready-made stack machine: the [`DEFINITION`] document plus the handlers
//! it names, grouped by concern:
//! - Stack: PUSH, PUSHB, POP, DUP, SWAP
//! - Arithmetic: ADD, SUB, MUL, DIV, MOD, EQ, LT, NOT
//! - Control: HALT, JUMP, JUMPI
//! - Memory: LOAD, STORE, GROW, COPY
//!
//! Hosts can extend [`registry()`] with their own handlers and reference them
//! from a custom document.

use crate::definition::Definition;
use crate::vm::{ConstructionError, Registry, Vm, VmOptions};

mod arithmetic;
mod control;
mod memory;
pub mod operands;
mod stack;

/// Definition document of the standard machine.
pub const DEFINITION: &str = include_str!("stdlib.vm");

/// Every standard execute handler and fuel function.
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    stack::register(&mut registry);
    arithmetic::register(&mut registry);
    control::register(&mut registry);
    memory::register(&mut registry);
    registry
}

pub fn definition() -> Result<Definition, ConstructionError> {
    Ok(Definition::parse(DEFINITION)?)
}

/// The standard machine with default options.
pub fn vm() -> Result<Vm, ConstructionError> {
    vm_with_options(VmOptions::default())
}

pub fn vm_with_options(options: VmOptions) -> Result<Vm, ConstructionError> {
    Vm::with_options(&definition()?, &registry(), options)
}

#[cfg(test)]
mod stdlib_test;
