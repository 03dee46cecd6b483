#![allow(dead_code)]

use std::sync::Arc;

use once_cell::sync::Lazy;
use vmgen::{Metadata, OpcodeTable, Program, Vm, VmOptions, stdlib};

/// The standard opcode table, resolved once and shared by every test.
pub static STDLIB: Lazy<(Metadata, Arc<OpcodeTable>)> = Lazy::new(|| {
    let definition = stdlib::definition().unwrap();
    let table = OpcodeTable::shared(&definition, &stdlib::registry()).unwrap();
    (Metadata::from(&definition), table)
});

/// A fresh standard VM with 16 memory slots.
pub fn vm() -> Vm {
    let (metadata, table) = &*STDLIB;
    Vm::from_table(
        metadata.clone(),
        Arc::clone(table),
        VmOptions {
            initial_memory_size: 16,
            ..VmOptions::default()
        },
    )
}

pub fn int(value: i64) -> Vec<u8> {
    stdlib::operands::encode_int(value)
}

pub fn addr(value: u16) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

pub fn none() -> Vec<u8> {
    Vec::new()
}

pub fn program(instructions: &[(&str, Vec<u8>)]) -> Program {
    let mut program = Program::new();
    for (opcode, params) in instructions {
        program.push(*opcode, params.clone()).unwrap();
    }
    program
}

/// Run a program on a fresh standard VM and check either the final stack and
/// fuel, or the error it stops with.
macro_rules! program_case {
    (
        $name:ident,
        program: [$($op:expr),* $(,)?],
        stack: [$($value:expr),* $(,)?],
        fuel: $fuel:expr $(,)?
    ) => {
        #[test]
        fn $name() {
            let mut vm = cases::vm();
            let program = cases::program(&[$($op),*]);
            let outcome = vm
                .run(&program, &vmgen::RunOptions::default())
                .unwrap_or_else(|e| panic!("{} failed: {e}", stringify!($name)));
            let expected: Vec<vmgen::Value> = vec![$($value),*];
            pretty_assertions::assert_eq!(vm.stack().as_slice(), expected.as_slice());
            pretty_assertions::assert_eq!(outcome.fuel, $fuel);
        }
    };
    (
        $name:ident,
        program: [$($op:expr),* $(,)?],
        error: $error:pat $(,)?
    ) => {
        #[test]
        fn $name() {
            let mut vm = cases::vm();
            let program = cases::program(&[$($op),*]);
            let result = vm.run(&program, &vmgen::RunOptions::default());
            assert!(matches!(result, Err($error)), "unexpected result: {result:?}");
        }
    };
}
