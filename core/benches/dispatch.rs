//! Benchmarks for instruction dispatch.
//!
//! Run with: `cargo bench` in the core/ directory.
//!
//! Benchmark groups:
//! 1. dispatch: single `Vm::dispatch` calls, fixed cost vs fuel function
//! 2. run: a counting loop driven by `Vm::run`, by iteration count

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use vmgen_core::{Program, RunOptions, Value, VmOptions, stdlib};

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let mut vm = stdlib::vm_with_options(VmOptions {
        initial_memory_size: 64,
        ..VmOptions::default()
    })
    .unwrap();

    let one: &[u8] = &[1];
    let none: &[u8] = &[];
    group.bench_function("fixed_cost", |b| {
        b.iter(|| {
            vm.dispatch("PUSH", black_box(one)).unwrap();
            vm.dispatch("POP", black_box(none)).unwrap();
        })
    });

    let copy: &[u8] = &[0, 0, 0, 32, 0, 16];
    group.bench_function("fuel_function", |b| {
        b.iter(|| vm.dispatch("COPY", black_box(copy)).unwrap())
    });

    group.bench_function("unknown_opcode", |b| {
        b.iter(|| black_box(vm.dispatch("NOPE", none).is_err()))
    });

    group.finish();
}

/// counter = n; while counter != 0 { counter -= 1 }
fn countdown() -> Program {
    Program::new()
        .with("DUP", [])
        .and_then(|p| p.with("PUSH", [0]))
        .and_then(|p| p.with("EQ", []))
        .and_then(|p| p.with("JUMPI", [0, 7]))
        .and_then(|p| p.with("PUSH", [1]))
        .and_then(|p| p.with("SUB", []))
        .and_then(|p| p.with("JUMP", [0, 0]))
        .unwrap()
}

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");
    let program = countdown();

    for iterations in [10i64, 100, 1000] {
        // Seven instructions per iteration
        group.throughput(Throughput::Elements(iterations as u64 * 7));
        group.bench_with_input(
            BenchmarkId::from_parameter(iterations),
            &iterations,
            |b, &iterations| {
                let mut vm = stdlib::vm().unwrap();
                b.iter(|| {
                    vm.reset();
                    vm.stack_mut().push(Value::Int(iterations)).unwrap();
                    black_box(vm.run(&program, &RunOptions::default()).unwrap())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_run);
criterion_main!(benches);
