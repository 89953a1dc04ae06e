//! Error types for dense layer data, kernels and correctness checks.

use thiserror::Error;

/// Errors that can occur while configuring, generating or running dense layer kernels.
#[derive(Error, Debug)]
pub enum DenseLayerError {
    #[error("Invalid size spec '{spec}': {reason}")]
    InvalidSizeSpec { spec: String, reason: String },

    #[error("The {name} must be greater than 0")]
    InvalidDimension { name: &'static str },

    #[error("Dimension mismatch for {buffer}: expected {expected} elements but got {actual}")]
    DimensionMismatch {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown kernel '{name}'")]
    UnknownKernel { name: String },

    #[error("Weight row {row} is out of bounds for a layer with {output_size} outputs")]
    RowOutOfBounds { row: usize, output_size: usize },

    #[error("Matrix library error: {0}")]
    MatrixLibrary(#[from] ndarray::ShapeError),

    #[error("Framework layer error: {0}")]
    FrameworkLayer(#[from] candle_core::Error),

    #[error(
        "Kernel '{kernel}' disagrees with the scalar reference at index {index}: expected {expected}, got {actual}, tolerance {tolerance}"
    )]
    ToleranceExceeded {
        kernel: &'static str,
        index: usize,
        expected: f32,
        actual: f32,
        tolerance: f32,
    },
}
