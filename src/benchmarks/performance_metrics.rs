//! Performance measurement utilities for benchmarks.

use super::benchmark_errors::BenchmarkResult;
use super::benchmark_types::{DenseLayerBenchConfig, PerformanceResults};
use crate::data_generator::generate;
use crate::kernels::{KernelKind, LayerContext};
use crate::size_spec::SizeSpec;
use log::{debug, info};
use std::hint::black_box;
use std::time::{Duration, Instant};

/// Measures one kernel at one layer size.
///
/// Every iteration regenerates the dataset from the configured seed and builds
/// a fresh kernel, then times `executions_per_iteration` calls. Warmup
/// iterations run the same way but are not counted.
pub fn benchmark_kernel(
    kind: KernelKind,
    size: SizeSpec,
    config: &DenseLayerBenchConfig,
    context: &LayerContext,
) -> BenchmarkResult<PerformanceResults> {
    info!(
        "Benchmarking {} at {} ({} warmup + {} measured iterations x {} executions)...",
        kind,
        size,
        config.warmup_iterations,
        config.measurement_iterations,
        config.executions_per_iteration
    );

    let total_iterations = config.warmup_iterations + config.measurement_iterations;
    let mut measured = Duration::ZERO;
    let mut num_executions = 0u64;

    for iteration in 0..total_iterations {
        let data = generate(config.seed, size);
        let mut kernel = kind.build(&data, context)?;

        let start = Instant::now();
        for _ in 0..config.executions_per_iteration {
            black_box(kernel.compute()?);
        }
        let elapsed = start.elapsed();

        if iteration < config.warmup_iterations {
            debug!("  Warmup {}: {:?}", iteration + 1, elapsed);
        } else {
            measured += elapsed;
            num_executions += u64::from(config.executions_per_iteration);
            debug!(
                "  Iteration {}/{}: {:?}",
                iteration + 1 - config.warmup_iterations,
                config.measurement_iterations,
                elapsed
            );
        }
    }

    Ok(PerformanceResults::new(
        kind,
        size,
        measured.as_nanos(),
        num_executions,
    ))
}

/// Prints detailed performance analysis, one section per layer size
pub fn print_performance_analysis(results: &[PerformanceResults]) {
    if results.is_empty() {
        return;
    }

    let mut sizes: Vec<SizeSpec> = Vec::new();
    for result in results {
        if !sizes.contains(&result.size) {
            sizes.push(result.size);
        }
    }

    for size in sizes {
        let group: Vec<&PerformanceResults> =
            results.iter().filter(|r| r.size == size).collect();
        let baseline = group
            .iter()
            .find(|r| r.kernel == KernelKind::Scalar)
            .copied()
            .unwrap_or(group[0]);

        println!("\n{}", "=".repeat(80));
        println!(
            "Dense layer {} ({} inputs -> {} outputs)",
            size,
            size.input_size(),
            size.output_size()
        );
        println!("{}", "=".repeat(80));
        println!(
            "{:<18} {:>14} {:>16} {:>14}",
            "Kernel", "avg (us/op)", "throughput/us", "vs baseline"
        );

        for result in &group {
            println!(
                "{:<18} {:>14.3} {:>16.3} {:>13.2}x",
                result.kernel.name(),
                result.average_time_us,
                result.throughput_ops_per_us,
                result.overhead_ratio(baseline)
            );
        }

        println!("\n🚀 Speed Rankings (fastest to slowest):");
        let mut sorted_results = group.clone();
        sorted_results.sort_by(|a, b| a.average_time_ns.total_cmp(&b.average_time_ns));

        for (i, result) in sorted_results.iter().enumerate() {
            let rank_emoji = match i {
                0 => "🥇",
                1 => "🥈",
                2 => "🥉",
                _ => "  ",
            };
            println!(
                "   {} {}: {:.3} us ({:+.1}% vs {})",
                rank_emoji,
                result.kernel.label(),
                result.average_time_us,
                result.overhead_percentage(baseline),
                baseline.kernel.label()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benchmark_kernel_counts_only_measured_iterations() {
        let config = DenseLayerBenchConfig {
            warmup_iterations: 2,
            measurement_iterations: 3,
            executions_per_iteration: 4,
            ..DenseLayerBenchConfig::default()
        };
        let size = SizeSpec::new(16, 8).unwrap();

        let result =
            benchmark_kernel(KernelKind::Scalar, size, &config, &LayerContext::cpu()).unwrap();

        assert_eq!(result.kernel, KernelKind::Scalar);
        assert_eq!(result.size, size);
        assert_eq!(result.num_executions, 12);
    }
}
