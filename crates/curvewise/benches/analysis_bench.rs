//! Benchmarks for function analysis and its building blocks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use curvewise::prelude::*;

/// Functions of increasing symbolic weight.
const FUNCTIONS: [&str; 5] = [
    "x",
    "1/(x^2 - 1)",
    "(x^2 + 1)/x",
    "x*exp(-x)",
    "sqrt(x^2 - 1)/(x - 2)",
];

/// Builds `(x - 1)(x - 2)...(x - n)`.
fn product_text(n: usize) -> String {
    (1..=n).map(|r| format!("(x - {r})")).collect::<Vec<_>>().join("*")
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    for text in FUNCTIONS {
        group.bench_with_input(BenchmarkId::from_parameter(text), &text, |b, t| {
            b.iter(|| black_box(analyze(t)));
        });
    }
    group.finish();
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_real");
    for n in [2, 4, 8] {
        let f = parse(&product_text(n)).unwrap();
        group.bench_with_input(BenchmarkId::new("product", n), &n, |b, _| {
            b.iter(|| black_box(solve_real(&f)));
        });
    }
    group.finish();
}

fn bench_partition(c: &mut Criterion) {
    let backend = ExactBackend::default();
    let mut group = c.benchmark_group("partition");
    for n in [2, 4, 8] {
        let f = parse(&format!("1/({})", product_text(n))).unwrap();
        let domain = continuous_domain(&f).unwrap();
        group.bench_with_input(BenchmarkId::new("reciprocal", n), &n, |b, _| {
            b.iter(|| black_box(Partitioner::new(&backend, 1e-12).partition(&f, &domain)));
        });
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let texts: Vec<String> = (1..=16).map(|n| format!("1/({})", product_text(n % 4 + 1))).collect();
    c.bench_function("analyze_many_16", |b| b.iter(|| black_box(analyze_many(&texts))));
}

criterion_group!(
    analysis_benches,
    bench_analyze,
    bench_solve,
    bench_partition,
    bench_batch,
);

criterion_main!(analysis_benches);
