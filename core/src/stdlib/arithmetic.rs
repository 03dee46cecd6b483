//! Integer arithmetic, comparison and logic.
//!
//! Binary operators read the two topmost values (`a` below `b`) and replace
//! them with `a op b`. On a handler error the operands stay on the stack.

use crate::vm::{ExecutionError, HandlerError, Registry, Value, Vm};

fn binary<F>(vm: &mut Vm, op: F) -> Result<(), ExecutionError>
where
    F: FnOnce(&Value, &Value) -> Result<Value, HandlerError>,
{
    let operands = vm.stack().top_n(2)?;
    let result = op(&operands[0], &operands[1])?;
    vm.stack_mut().pop_n(2)?;
    vm.stack_mut().push(result)?;
    Ok(())
}

fn checked<F>(vm: &mut Vm, op: F) -> Result<(), ExecutionError>
where
    F: FnOnce(i64, i64) -> Result<i64, HandlerError>,
{
    binary(vm, |a, b| op(a.as_int()?, b.as_int()?).map(Value::Int))
}

fn add(vm: &mut Vm, _params: &[u8]) -> Result<(), ExecutionError> {
    checked(vm, |a, b| a.checked_add(b).ok_or(HandlerError::Overflow))
}

fn sub(vm: &mut Vm, _params: &[u8]) -> Result<(), ExecutionError> {
    checked(vm, |a, b| a.checked_sub(b).ok_or(HandlerError::Overflow))
}

fn mul(vm: &mut Vm, _params: &[u8]) -> Result<(), ExecutionError> {
    checked(vm, |a, b| a.checked_mul(b).ok_or(HandlerError::Overflow))
}

fn div(vm: &mut Vm, _params: &[u8]) -> Result<(), ExecutionError> {
    checked(vm, |a, b| {
        if b == 0 {
            return Err(HandlerError::DivisionByZero);
        }
        a.checked_div(b).ok_or(HandlerError::Overflow)
    })
}

fn rem(vm: &mut Vm, _params: &[u8]) -> Result<(), ExecutionError> {
    checked(vm, |a, b| {
        if b == 0 {
            return Err(HandlerError::DivisionByZero);
        }
        a.checked_rem(b).ok_or(HandlerError::Overflow)
    })
}

// Any two values compare; different types are never equal.
fn eq(vm: &mut Vm, _params: &[u8]) -> Result<(), ExecutionError> {
    binary(vm, |a, b| Ok(Value::Bool(a == b)))
}

fn lt(vm: &mut Vm, _params: &[u8]) -> Result<(), ExecutionError> {
    binary(vm, |a, b| Ok(Value::Bool(a.as_int()? < b.as_int()?)))
}

fn not(vm: &mut Vm, _params: &[u8]) -> Result<(), ExecutionError> {
    let value = match vm.stack().peek() {
        Some(value) => !value.as_bool()?,
        None => {
            return Err(crate::vm::MemoryFaultError::StackUnderflow {
                needed: 1,
                available: 0,
            }
            .into());
        }
    };
    if let Some(top) = vm.stack_mut().peek_mut() {
        *top = Value::Bool(value);
    }
    Ok(())
}

pub(super) fn register(registry: &mut Registry) {
    registry
        .register_execute("add", add)
        .register_execute("sub", sub)
        .register_execute("mul", mul)
        .register_execute("div", div)
        .register_execute("mod", rem)
        .register_execute("eq", eq)
        .register_execute("lt", lt)
        .register_execute("not", not);
}
