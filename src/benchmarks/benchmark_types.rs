//! Benchmark type definitions and configuration structures.

use super::benchmark_errors::{BenchmarkError, BenchmarkResult};
use crate::data_generator::DEFAULT_SEED;
use crate::kernels::KernelKind;
use crate::size_spec::SizeSpec;
use serde::{Deserialize, Serialize};

/// Size pairs swept by default, smallest first.
pub const DEFAULT_SIZE_PAIRS: [&str; 5] = ["64x32", "128x64", "256x128", "512x256", "1024x512"];

/// Configuration for the dense layer benchmark
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DenseLayerBenchConfig {
    pub name: String,
    pub description: String,
    /// Layer sizes as `"<input_size>x<output_size>"`.
    pub size_pairs: Vec<String>,
    pub seed: u64,
    /// Iterations run and discarded before measuring.
    pub warmup_iterations: u32,
    pub measurement_iterations: u32,
    /// Kernel calls timed inside one iteration.
    pub executions_per_iteration: u32,
    /// Kernel names, see [`KernelKind::name`].
    pub kernels: Vec<String>,
}

impl Default for DenseLayerBenchConfig {
    fn default() -> Self {
        Self {
            name: "dense_layer".to_string(),
            description: "Dense layer forward pass: scalar, SIMD, SIMD+FMA, ndarray and candle"
                .to_string(),
            size_pairs: DEFAULT_SIZE_PAIRS.iter().map(|s| s.to_string()).collect(),
            seed: DEFAULT_SEED,
            warmup_iterations: 3,
            measurement_iterations: 5,
            executions_per_iteration: 1000,
            kernels: KernelKind::ALL
                .iter()
                .map(|kind| kind.name().to_string())
                .collect(),
        }
    }
}

impl DenseLayerBenchConfig {
    /// Validates the configuration
    pub fn validate(&self) -> BenchmarkResult<()> {
        if self.measurement_iterations == 0 {
            return Err(BenchmarkError::InvalidIterationCount {
                field: "measurement_iterations".to_string(),
                value: self.measurement_iterations,
            });
        }

        if self.executions_per_iteration == 0 {
            return Err(BenchmarkError::InvalidIterationCount {
                field: "executions_per_iteration".to_string(),
                value: self.executions_per_iteration,
            });
        }

        if self.size_pairs.is_empty() {
            return Err(BenchmarkError::ConfigValidationError {
                field: "size_pairs".to_string(),
                message: "At least one size pair is required".to_string(),
            });
        }

        if self.kernels.is_empty() {
            return Err(BenchmarkError::ConfigValidationError {
                field: "kernels".to_string(),
                message: "At least one kernel is required".to_string(),
            });
        }

        self.sizes()?;
        self.kernel_kinds()?;

        Ok(())
    }

    /// Parses every configured size pair.
    pub fn sizes(&self) -> BenchmarkResult<Vec<SizeSpec>> {
        self.size_pairs
            .iter()
            .map(|pair| {
                pair.parse::<SizeSpec>()
                    .map_err(|e| BenchmarkError::ConfigValidationError {
                        field: "size_pairs".to_string(),
                        message: e.to_string(),
                    })
            })
            .collect()
    }

    /// Resolves every configured kernel name.
    pub fn kernel_kinds(&self) -> BenchmarkResult<Vec<KernelKind>> {
        self.kernels
            .iter()
            .map(|name| {
                name.parse::<KernelKind>()
                    .map_err(|e| BenchmarkError::ConfigValidationError {
                        field: "kernels".to_string(),
                        message: e.to_string(),
                    })
            })
            .collect()
    }
}

/// Performance measurement structure
#[derive(Debug, Clone)]
pub struct PerformanceResults {
    pub kernel: KernelKind,
    pub size: SizeSpec,
    pub total_time_ns: u128,
    pub num_executions: u64,
    pub average_time_ns: f64,
    pub average_time_us: f64,
    /// Kernel calls per microsecond.
    pub throughput_ops_per_us: f64,
}

impl PerformanceResults {
    pub fn new(
        kernel: KernelKind,
        size: SizeSpec,
        total_time_ns: u128,
        num_executions: u64,
    ) -> Self {
        let average_time_ns = total_time_ns as f64 / num_executions.max(1) as f64;
        let average_time_us = average_time_ns / 1_000.0;
        let throughput_ops_per_us = if average_time_us > 0.0 {
            1.0 / average_time_us
        } else {
            f64::INFINITY
        };

        Self {
            kernel,
            size,
            total_time_ns,
            num_executions,
            average_time_ns,
            average_time_us,
            throughput_ops_per_us,
        }
    }

    pub fn overhead_ratio(&self, baseline: &PerformanceResults) -> f64 {
        self.average_time_ns / baseline.average_time_ns
    }

    pub fn overhead_percentage(&self, baseline: &PerformanceResults) -> f64 {
        (self.overhead_ratio(baseline) - 1.0) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DenseLayerBenchConfig::default();
        config.validate().unwrap();
        assert_eq!(config.sizes().unwrap().len(), 5);
        assert_eq!(config.kernel_kinds().unwrap(), KernelKind::ALL.to_vec());
        assert_eq!(config.seed, 123);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = DenseLayerBenchConfig {
            measurement_iterations: 0,
            ..DenseLayerBenchConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BenchmarkError::InvalidIterationCount { .. })
        ));

        let config = DenseLayerBenchConfig {
            size_pairs: vec!["64x32".to_string(), "64by32".to_string()],
            ..DenseLayerBenchConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BenchmarkError::ConfigValidationError { ref field, .. }) if field == "size_pairs"
        ));

        let config = DenseLayerBenchConfig {
            kernels: vec!["scalar".to_string(), "blas".to_string()],
            ..DenseLayerBenchConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BenchmarkError::ConfigValidationError { ref field, .. }) if field == "kernels"
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DenseLayerBenchConfig =
            serde_json::from_str(r#"{ "size_pairs": ["8x4"], "executions_per_iteration": 10 }"#)
                .unwrap();
        assert_eq!(config.size_pairs, vec!["8x4"]);
        assert_eq!(config.executions_per_iteration, 10);
        assert_eq!(config.measurement_iterations, 5);
    }

    #[test]
    fn test_performance_results() {
        let size = SizeSpec::new(64, 32).unwrap();
        let baseline = PerformanceResults::new(KernelKind::Scalar, size, 2_000_000, 1000);
        let fast = PerformanceResults::new(KernelKind::SimdFma, size, 500_000, 1000);

        assert_eq!(baseline.average_time_ns, 2000.0);
        assert_eq!(baseline.average_time_us, 2.0);
        assert_eq!(fast.throughput_ops_per_us, 2.0);
        assert_eq!(fast.overhead_ratio(&baseline), 0.25);
        assert_eq!(fast.overhead_percentage(&baseline), -75.0);
    }
}
