//! Memory access: LOAD, STORE, GROW, COPY.

use crate::stdlib::operands;
use crate::vm::{ExecutionError, Registry, Vm};

fn load(vm: &mut Vm, params: &[u8]) -> Result<(), ExecutionError> {
    let address = operands::address(params)?;
    let value = vm.memory().load(address)?.clone();
    vm.stack_mut().push(value)?;
    Ok(())
}

fn store(vm: &mut Vm, params: &[u8]) -> Result<(), ExecutionError> {
    let address = operands::address(params)?;
    let value = vm.stack_mut().pop()?;
    vm.memory_mut().store(address, value)?;
    Ok(())
}

fn grow(vm: &mut Vm, params: &[u8]) -> Result<(), ExecutionError> {
    let [slots] = operands::u16s::<1>(params)?;
    let size = vm.memory_mut().grow(slots as usize)?;
    tracing::debug!(slots, size, "Memory grown");
    Ok(())
}

/// Operand: source, destination and length, each a u16.
fn copy(vm: &mut Vm, params: &[u8]) -> Result<(), ExecutionError> {
    let [src, dst, len] = operands::u16s::<3>(params)?;
    vm.memory_mut()
        .copy_within(src as usize, dst as usize, len as usize)?;
    Ok(())
}

// Fuel functions only see malformed operands when the handler has already
// failed, and a failed dispatch is never charged.

fn grow_cost(_vm: &Vm, params: &[u8]) -> u64 {
    1 + 2 * operands::u16_at(params, 0).unwrap_or_default() as u64
}

fn copy_cost(_vm: &Vm, params: &[u8]) -> u64 {
    2 + operands::u16_at(params, 2).unwrap_or_default() as u64
}

pub(super) fn register(registry: &mut Registry) {
    registry
        .register_execute("load", load)
        .register_execute("store", store)
        .register_execute("grow", grow)
        .register_execute("copy", copy)
        .register_fuel("growCost", grow_cost)
        .register_fuel("copyCost", copy_cost);
}
