use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use machinelearne_vars::variable::{DiscreteVariable, FittedVariable, Variable};

fn fitted_with_labels(n: usize) -> machinelearne_vars::FittedDiscreteVariable {
    let mut var = DiscreteVariable::new("bench");
    for i in 0..n {
        var.compute_statistics(&format!("label_{}", i));
    }
    var.finalize()
}

fn bench_normalize(c: &mut Criterion) {
    // Test different catalogue sizes
    for size in [4, 64, 1024].iter() {
        c.bench_with_input(BenchmarkId::new("normalize", size), size, |b, &n| {
            let var = fitted_with_labels(n);
            let value = format!("label_{}", n / 2);
            let mut out = vec![0.0; n];

            b.iter(|| {
                let next = var.normalize(black_box(&value), &mut out, 0).unwrap();
                black_box(next);
            });
        });
    }
}

fn bench_decoded_value(c: &mut Criterion) {
    for size in [4, 64, 1024].iter() {
        c.bench_with_input(BenchmarkId::new("decoded_value", size), size, |b, &n| {
            let var = fitted_with_labels(n);
            let act: Vec<f64> = (0..n).map(|i| (i % 7) as f64 * 0.1).collect();

            b.iter(|| {
                let label = var.decoded_value(black_box(&act), 0).unwrap();
                black_box(label);
            });
        });
    }
}

fn bench_compute_statistics(c: &mut Criterion) {
    let values: Vec<String> = (0..10_000).map(|i| format!("v{}", i % 97)).collect();
    c.bench_function("compute_statistics_10k", |b| {
        b.iter(|| {
            let mut var = DiscreteVariable::new("bench");
            for v in &values {
                var.compute_statistics(black_box(v));
            }
            black_box(var.normalized_size());
        });
    });
}

criterion_group!(
    benches,
    bench_normalize,
    bench_decoded_value,
    bench_compute_statistics
);
criterion_main!(benches);
