//! Benchmarks for the compiler and the bytecode VM.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrule::bytecode::{Chunk, Vm};
use ferrule::error::CollectingReporter;
use ferrule::output::CaptureSink;
use std::fs;

fn compile(source: &str) -> Chunk {
    ferrule::compile_source(source).expect("compile error")
}

/// A VM whose output goes nowhere observable.
fn quiet_vm() -> Vm {
    Vm::with_io(Box::new(CaptureSink::new()), Box::new(CollectingReporter::new()))
}

fn run_vm(chunk: &Chunk) {
    let mut vm = quiet_vm();
    vm.execute(chunk).expect("vm runtime error");
}

fn load_program(name: &str) -> String {
    let path = format!("benches/programs/{}.fe", name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("failed to read {}", path))
}

/// `while` loop summing 0..n with a block local per iteration.
fn counting_loop(n: usize) -> String {
    format!(
        "var i = 0; var sum = 0; while (i < {}) {{ var step = i * 2; sum = sum + step; i = i + 1; }}",
        n
    )
}

fn compile_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    for name in ["fib_iterative", "nested_loops"] {
        let source = load_program(name);
        group.bench_with_input(BenchmarkId::from_parameter(name), &source, |b, src| {
            b.iter(|| compile(black_box(src)))
        });
    }
    group.finish();
}

fn compile_and_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_and_run");
    for name in ["fib_iterative", "nested_loops"] {
        let source = load_program(name);
        group.bench_with_input(BenchmarkId::from_parameter(name), &source, |b, src| {
            b.iter(|| run_vm(&compile(black_box(src))))
        });
    }
    group.finish();
}

fn loop_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("while_loop");
    for n in [100, 1_000, 10_000] {
        let chunk = compile(&counting_loop(n));
        group.bench_with_input(BenchmarkId::new("run", n), &chunk, |b, chunk| {
            b.iter(|| run_vm(black_box(chunk)))
        });
    }
    group.finish();
}

criterion_group!(benches, compile_only, compile_and_run, loop_scaling);
criterion_main!(benches);
