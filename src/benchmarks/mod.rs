//! Benchmark driver for the dense layer kernels.
//!
//! For every configured layer size the driver first checks that all kernels
//! agree, then times each kernel over warmup and measurement iterations,
//! regenerating the dataset at the start of every iteration.

pub mod benchmark_errors;
pub mod benchmark_runner;
pub mod benchmark_types;
pub mod performance_metrics;

pub use benchmark_errors::{BenchmarkError, BenchmarkResult};
pub use benchmark_runner::{BenchmarkRunner, ConfigLoader, DEFAULT_CONFIG_PATH};
pub use benchmark_types::{DenseLayerBenchConfig, PerformanceResults, DEFAULT_SIZE_PAIRS};
pub use performance_metrics::{benchmark_kernel, print_performance_analysis};
