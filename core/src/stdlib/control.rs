//! Control flow: HALT, JUMP, JUMPI.
//!
//! Jump targets are instruction indexes. The runner advances the program
//! counter before dispatching, so a handler that does not jump falls through.

use crate::stdlib::operands;
use crate::vm::{ExecutionError, Registry, Vm};

fn halt(vm: &mut Vm, _params: &[u8]) -> Result<(), ExecutionError> {
    vm.halt();
    Ok(())
}

fn jump(vm: &mut Vm, params: &[u8]) -> Result<(), ExecutionError> {
    let target = operands::address(params)?;
    vm.jump(target);
    Ok(())
}

/// Pops a Bool and jumps when it is true.
fn jump_if(vm: &mut Vm, params: &[u8]) -> Result<(), ExecutionError> {
    let target = operands::address(params)?;
    let condition = match vm.stack().peek() {
        Some(value) => value.as_bool()?,
        None => false,
    };
    vm.stack_mut().pop()?;
    if condition {
        vm.jump(target);
    }
    Ok(())
}

pub(super) fn register(registry: &mut Registry) {
    registry
        .register_execute("halt", halt)
        .register_execute("jump", jump)
        .register_execute("jumpIf", jump_if);
}
