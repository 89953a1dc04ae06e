//! Dense layer benchmark CLI.
//!
//! - `check` - print every kernel's output side by side and verify agreement
//! - `run` - run the benchmark sweep from a JSON configuration
//! - `list` - list available kernels

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dense_layer_bench::benchmarks::{BenchmarkResult, BenchmarkRunner, DEFAULT_CONFIG_PATH};
use dense_layer_bench::{SizeSpec, DEFAULT_SEED};
use log::{error, info};

#[derive(Parser)]
#[command(name = "dense-bench")]
#[command(version, about = "Benchmark and cross-check dense layer kernels", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare every kernel against the scalar reference and print the outputs
    Check {
        /// Layer size as <input_size>x<output_size>
        #[arg(short, long, default_value = "64x32")]
        size: SizeSpec,

        /// Seed of the generated input, bias and weights
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Run the benchmark sweep
    Run {
        /// JSON configuration; defaults are used when the file does not exist
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
    /// List available kernels
    List,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        error!("Benchmark execution failed: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> BenchmarkResult<()> {
    match command {
        Commands::Check { size, seed } => {
            let report = BenchmarkRunner::check(size, seed)?;
            println!("{}", report);
            report.into_result()?;
            info!("All kernels agree for {}", size);
            Ok(())
        }
        Commands::Run { config } => {
            BenchmarkRunner::run_from_file(&config)?;
            Ok(())
        }
        Commands::List => {
            BenchmarkRunner::list_kernels();
            Ok(())
        }
    }
}
