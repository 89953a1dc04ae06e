//! Dense layer kernels and their cross-validation.
//!
//! This library computes the forward pass of a fully-connected layer,
//! `y = W·x + b`, with several interchangeable kernels: a scalar reference,
//! two SIMD variants (per-chunk reduction and fused multiply-add), an
//! `ndarray` adapter and a `candle` linear layer adapter. All of them are
//! driven from one deterministic dataset and checked against the scalar
//! reference within a fixed tolerance.

pub mod benchmarks;
pub mod correctness;
pub mod data_generator;
pub mod errors;
pub mod kernels;
pub mod size_spec;
pub mod utils;

pub use correctness::{CheckOutcome, CorrectnessHarness, CorrectnessReport, TOLERANCE};
pub use data_generator::{generate, DenseLayerData, DEFAULT_SEED};
pub use errors::{DenseLayerError, DenseLayerResult};
pub use kernels::{DenseKernel, KernelKind, LayerContext};
pub use size_spec::SizeSpec;
