use pretty_assertions::assert_eq;

use super::operands::encode_int;
use super::*;
use crate::program::Program;
use crate::vm::{
    DispatchError, HandlerError, MemoryFaultError, RunError, RunOptions, Value, VmState,
};
use crate::{Vec, vec};

fn addr(value: u16) -> Vec<u8> {
    value.to_be_bytes().into()
}

fn run(instructions: &[(&str, Vec<u8>)]) -> Vm {
    let mut vm = vm_with_options(VmOptions {
        initial_memory_size: 8,
        ..VmOptions::default()
    })
    .unwrap();
    let mut program = Program::new();
    for (opcode, params) in instructions {
        program.push(*opcode, params.clone()).unwrap();
    }
    vm.run(&program, &RunOptions::default()).unwrap();
    vm
}

fn stack(vm: &Vm) -> Vec<Value> {
    vm.stack().iter().cloned().collect()
}

#[test]
fn test_definition_is_complete() {
    let definition = definition().unwrap();
    let opcodes: Vec<_> = definition
        .instructions
        .iter()
        .map(|i| i.opcode.as_str())
        .collect();
    assert_eq!(
        opcodes,
        [
            "HALT", "PUSH", "PUSHB", "POP", "DUP", "SWAP", "ADD", "SUB", "MUL", "DIV", "MOD",
            "EQ", "LT", "NOT", "JUMP", "JUMPI", "LOAD", "STORE", "GROW", "COPY"
        ]
    );
    let vm = vm().unwrap();
    assert_eq!(vm.name(), "vmgen standard machine");
    assert_eq!(vm.table().len(), 20);
}

#[test]
fn test_add_scenario() {
    let mut vm = vm().unwrap();
    vm.stack_mut().push(Value::Int(2)).unwrap();
    vm.stack_mut().push(Value::Int(5)).unwrap();

    vm.dispatch("ADD", &[]).unwrap();

    assert_eq!(stack(&vm), [Value::Int(7)]);
    assert_eq!(vm.stats().operations(), 1);
    assert_eq!(vm.stats().fuel(), 3);
}

#[test]
fn test_arithmetic() {
    let vm = run(&[
        ("PUSH", encode_int(20)),
        ("PUSH", encode_int(-3)),
        ("SUB", vec![]),
        ("PUSH", encode_int(2)),
        ("MUL", vec![]),
        ("PUSH", encode_int(7)),
        ("DIV", vec![]),
        ("PUSH", encode_int(4)),
        ("MOD", vec![]),
    ]);
    // ((20 - -3) * 2 / 7) % 4 = 6 % 4
    assert_eq!(stack(&vm), [Value::Int(2)]);
}

#[test]
fn test_comparisons() {
    let vm = run(&[
        ("PUSH", encode_int(1)),
        ("PUSH", encode_int(2)),
        ("LT", vec![]),
        ("PUSH", encode_int(3)),
        ("PUSH", encode_int(3)),
        ("EQ", vec![]),
        ("PUSHB", vec![1, 2]),
        ("PUSH", encode_int(1)),
        ("EQ", vec![]),
        ("NOT", vec![]),
    ]);
    assert_eq!(
        stack(&vm),
        [Value::Bool(true), Value::Bool(true), Value::Bool(true)]
    );
}

#[test]
fn test_stack_ops() {
    let vm = run(&[
        ("PUSH", encode_int(1)),
        ("PUSH", encode_int(2)),
        ("SWAP", vec![]),
        ("DUP", vec![]),
        ("PUSHB", vec![0xaa]),
        ("POP", vec![]),
    ]);
    assert_eq!(stack(&vm), [Value::Int(2), Value::Int(1), Value::Int(1)]);
}

#[test]
fn test_division_by_zero_keeps_operands() {
    let mut vm = vm().unwrap();
    vm.dispatch("PUSH", &[9]).unwrap();
    vm.dispatch("PUSH", &[0]).unwrap();

    assert_eq!(
        vm.dispatch("DIV", &[]),
        Err(DispatchError::Handler(HandlerError::DivisionByZero))
    );
    assert_eq!(stack(&vm), [Value::Int(9), Value::Int(0)]);
    assert_eq!(vm.state(), VmState::Running);
}

#[test]
fn test_overflow() {
    let mut vm = vm().unwrap();
    vm.dispatch("PUSH", &encode_int(i64::MAX)).unwrap();
    vm.dispatch("PUSH", &[1]).unwrap();
    assert_eq!(
        vm.dispatch("ADD", &[]),
        Err(DispatchError::Handler(HandlerError::Overflow))
    );
}

#[test]
fn test_type_mismatch() {
    let mut vm = vm().unwrap();
    vm.dispatch("PUSHB", &[1]).unwrap();
    vm.dispatch("PUSH", &[1]).unwrap();
    assert_eq!(
        vm.dispatch("ADD", &[]),
        Err(DispatchError::Handler(HandlerError::TypeMismatch {
            expected: "Int",
            found: "Bytes"
        }))
    );
}

#[test]
fn test_push_operand_errors() {
    let mut vm = vm().unwrap();
    assert!(matches!(
        vm.dispatch("PUSH", &[]),
        Err(DispatchError::Handler(HandlerError::InvalidOperand { found: 0, .. }))
    ));
    assert!(matches!(
        vm.dispatch("JUMP", &[1]),
        Err(DispatchError::Handler(HandlerError::InvalidOperand { found: 1, .. }))
    ));
    assert_eq!(vm.stats().operations(), 0);
}

#[test]
fn test_countdown_loop() {
    // counter = 3; while counter != 0 { counter -= 1 }
    let vm = run(&[
        ("PUSH", encode_int(3)),     // 0
        ("DUP", vec![]),             // 1
        ("PUSH", encode_int(0)),     // 2
        ("EQ", vec![]),              // 3
        ("JUMPI", addr(8)),          // 4
        ("PUSH", encode_int(1)),     // 5
        ("SUB", vec![]),             // 6
        ("JUMP", addr(1)),           // 7
        ("HALT", vec![]),            // 8
        ("PUSH", encode_int(99)),    // 9, never reached
    ]);
    assert_eq!(stack(&vm), [Value::Int(0)]);
    assert!(vm.is_halted());
    assert_eq!(vm.executions("SUB"), 3);
    assert_eq!(vm.executions("JUMPI"), 4);
}

#[test]
fn test_memory_ops() {
    let vm = run(&[
        ("PUSH", encode_int(42)),
        ("STORE", addr(1)),
        ("GROW", addr(4)),
        ("COPY", [addr(0), addr(10), addr(2)].concat()),
        ("LOAD", addr(11)),
        ("LOAD", addr(0)),
    ]);
    assert_eq!(vm.memory().len(), 12);
    assert_eq!(stack(&vm), [Value::Int(42), Value::Nil]);
}

#[test]
fn test_out_of_bounds_faults() {
    let mut vm = vm().unwrap();
    assert_eq!(
        vm.dispatch("LOAD", &addr(0)),
        Err(DispatchError::MemoryFault(MemoryFaultError::OutOfBounds {
            address: 0,
            size: 0
        }))
    );
    assert!(vm.is_faulted());
}

#[test]
fn test_grow_limit() {
    let mut vm = vm_with_options(VmOptions {
        max_memory_size: 4,
        ..VmOptions::default()
    })
    .unwrap();
    assert_eq!(
        vm.dispatch("GROW", &addr(5)),
        Err(DispatchError::MemoryFault(MemoryFaultError::MemoryLimit {
            requested: 5,
            max: 4
        }))
    );
}

#[test]
fn test_fuel_functions() {
    let mut vm = vm_with_options(VmOptions {
        initial_memory_size: 16,
        ..VmOptions::default()
    })
    .unwrap();

    vm.dispatch("PUSHB", &[0; 33]).unwrap();
    assert_eq!(vm.stats().fuel(), 3);

    vm.reset_stats();
    vm.dispatch("GROW", &addr(5)).unwrap();
    assert_eq!(vm.stats().fuel(), 11);

    vm.reset_stats();
    vm.dispatch("COPY", &[addr(0), addr(8), addr(5)].concat())
        .unwrap();
    assert_eq!(vm.stats().fuel(), 7);
}

#[test]
fn test_infinite_loop_is_bounded_by_fuel() {
    let mut vm = vm().unwrap();
    let program = Program::new().with("JUMP", addr(0)).unwrap();

    let err = vm
        .run(&program, &RunOptions::default().with_fuel_limit(100))
        .unwrap_err();

    assert_eq!(err, RunError::FuelExhausted { used: 104, limit: 100 });
}
