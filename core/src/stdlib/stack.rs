//! Stack manipulation: PUSH, PUSHB, POP, DUP, SWAP.

use crate::stdlib::operands;
use crate::vm::{ExecutionError, Registry, Value, Vm};

fn push(vm: &mut Vm, params: &[u8]) -> Result<(), ExecutionError> {
    let value = operands::int(params)?;
    vm.stack_mut().push(Value::Int(value))?;
    Ok(())
}

fn push_bytes(vm: &mut Vm, params: &[u8]) -> Result<(), ExecutionError> {
    vm.stack_mut().push(Value::Bytes(params.into()))?;
    Ok(())
}

fn pop(vm: &mut Vm, _params: &[u8]) -> Result<(), ExecutionError> {
    vm.stack_mut().pop()?;
    Ok(())
}

fn dup(vm: &mut Vm, _params: &[u8]) -> Result<(), ExecutionError> {
    vm.stack_mut().dup()?;
    Ok(())
}

fn swap(vm: &mut Vm, _params: &[u8]) -> Result<(), ExecutionError> {
    vm.stack_mut().swap()?;
    Ok(())
}

/// One unit, plus one per started 32-byte word of payload.
fn push_bytes_cost(_vm: &Vm, params: &[u8]) -> u64 {
    1 + params.len().div_ceil(32) as u64
}

pub(super) fn register(registry: &mut Registry) {
    registry
        .register_execute("push", push)
        .register_execute("pushBytes", push_bytes)
        .register_execute("pop", pop)
        .register_execute("dup", dup)
        .register_execute("swap", swap)
        .register_fuel("pushBytesCost", push_bytes_cost);
}
