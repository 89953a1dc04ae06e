//! Core benchmark execution logic.

use super::benchmark_errors::{BenchmarkError, BenchmarkResult};
use super::benchmark_types::{DenseLayerBenchConfig, PerformanceResults};
use super::performance_metrics::{benchmark_kernel, print_performance_analysis};
use crate::correctness::{CorrectnessHarness, CorrectnessReport};
use crate::data_generator::generate;
use crate::kernels::{KernelKind, LayerContext};
use crate::size_spec::SizeSpec;
use crate::utils::SimdLevel;
use log::{error, info, warn};
use std::fs;
use std::io;
use std::path::Path;

/// Default location of the benchmark configuration.
pub const DEFAULT_CONFIG_PATH: &str = "configs/dense_layer.json";

/// Configuration loader that handles JSON files with fallbacks
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a configuration file with fallback to defaults when it does not exist.
    ///
    /// Any other read failure (a directory, missing permissions) is an
    /// [`BenchmarkError::IoError`].
    pub fn load_config<T>(path: &Path, config_name: &str) -> BenchmarkResult<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        match fs::read_to_string(path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| BenchmarkError::ConfigParseError {
                    path: path.display().to_string(),
                    source: e,
                })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(
                    "Config file '{}' not found, using default configuration for {}",
                    path.display(),
                    config_name
                );
                Ok(T::default())
            }
            Err(e) => Err(BenchmarkError::from(e)),
        }
    }

    /// Load the dense layer benchmark configuration
    pub fn load_dense_layer_config(path: &Path) -> BenchmarkResult<DenseLayerBenchConfig> {
        Self::load_config(path, "dense_layer")
    }
}

/// Main benchmark runner
pub struct BenchmarkRunner;

impl BenchmarkRunner {
    /// Loads, validates and runs the configuration at `path`.
    pub fn run_from_file(path: &Path) -> BenchmarkResult<Vec<PerformanceResults>> {
        let config = ConfigLoader::load_dense_layer_config(path)?;
        Self::run(&config)
    }

    /// Runs the correctness check and then every configured kernel for every size.
    pub fn run(config: &DenseLayerBenchConfig) -> BenchmarkResult<Vec<PerformanceResults>> {
        config.validate()?;
        let sizes = config.sizes()?;
        let kernels = config.kernel_kinds()?;
        let context = LayerContext::cpu();

        info!("{}", "=".repeat(80));
        info!("{}: {}", config.name, config.description);
        info!("SIMD: {}", SimdLevel::detect());
        info!(
            "Sizes: {}",
            sizes
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        info!("{}", "=".repeat(80));

        let mut results = Vec::with_capacity(sizes.len() * kernels.len());
        for size in sizes {
            info!("Verifying output consistency for {}...", size);
            let report = Self::check_with_context(size, config.seed, &context)?;
            if !report.is_pass() {
                error!("❌ Outputs do not match - there may be an implementation bug");
                println!("{}", report);
            }
            report.into_result()?;
            info!("✅ Outputs match - implementations are consistent");

            for &kind in &kernels {
                results.push(benchmark_kernel(kind, size, config, &context)?);
            }
        }

        print_performance_analysis(&results);

        println!("\n{}", "=".repeat(80));
        println!("Benchmark Complete");
        println!("{}", "=".repeat(80));

        Ok(results)
    }

    /// Runs the correctness check for one size on freshly generated data.
    pub fn check(size: SizeSpec, seed: u64) -> BenchmarkResult<CorrectnessReport> {
        Self::check_with_context(size, seed, &LayerContext::cpu())
    }

    fn check_with_context(
        size: SizeSpec,
        seed: u64,
        context: &LayerContext,
    ) -> BenchmarkResult<CorrectnessReport> {
        let data = generate(seed, size);
        Ok(CorrectnessHarness::new(context.clone()).check(&data)?)
    }

    /// List available kernels
    pub fn list_kernels() {
        println!("Available kernels:");
        for kind in KernelKind::ALL {
            println!("  {:<16} - {}", kind.name(), kind.description());
        }
    }
}
