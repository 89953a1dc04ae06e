//! Criterion benchmarks for the dense layer kernels.
//!
//! One group per layer size, one benchmark per kernel. The dataset and the
//! kernels are built once per size; only `compute` is timed.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dense_layer_bench::benchmarks::DEFAULT_SIZE_PAIRS;
use dense_layer_bench::{generate, KernelKind, LayerContext, SizeSpec, DEFAULT_SEED};

fn bench_dense_layer(c: &mut Criterion) {
    let context = LayerContext::cpu();

    for pair in DEFAULT_SIZE_PAIRS {
        let size: SizeSpec = pair.parse().expect("default size pairs are valid");
        let data = generate(DEFAULT_SEED, size);

        let mut group = c.benchmark_group(format!("dense_{}", size));
        // One multiply-add per weight.
        group.throughput(Throughput::Elements(size.weight_count() as u64));

        for kind in KernelKind::ALL {
            let mut kernel = kind
                .build(&data, &context)
                .expect("kernel construction should succeed");

            group.bench_function(BenchmarkId::from_parameter(kind.name()), |bench| {
                bench.iter(|| {
                    black_box(kernel.compute().expect("compute should succeed")[0]);
                });
            });
        }

        group.finish();
    }
}

criterion_group!(benches, bench_dense_layer);
criterion_main!(benches);
