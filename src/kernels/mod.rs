//! Dense layer kernels.
//!
//! Every implementation of `y = W·x + b` is exposed through [`DenseKernel`]: it
//! binds one [`DenseLayerData`] at construction, owns its output buffer and
//! offers a single argument-free [`DenseKernel::compute`] that the benchmark
//! driver can time as an opaque unit. The output buffer is fully overwritten on
//! every call.

pub mod framework_layer;
pub mod matrix_library;
pub mod scalar;
pub mod vector;
pub mod vector_fma;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data_generator::DenseLayerData;
use crate::errors::{DenseLayerError, DenseLayerResult};

pub use framework_layer::{FrameworkLayerKernel, LayerContext};
pub use matrix_library::MatrixLibraryKernel;
pub use scalar::{dense_scalar, ScalarKernel};
pub use vector::{dense_simd, VectorKernel};
pub use vector_fma::{dense_simd_fma, VectorFmaKernel};

/// A dense layer forward pass bound to one dataset.
pub trait DenseKernel {
    /// Stable identifier of the implementation.
    fn name(&self) -> &'static str;

    /// Computes the layer output into the kernel's own buffer and returns it.
    fn compute(&mut self) -> DenseLayerResult<&[f32]>;
}

/// The available kernel implementations, in report column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelKind {
    Scalar,
    MatrixLibrary,
    Simd,
    SimdFma,
    FrameworkLayer,
}

impl KernelKind {
    pub const ALL: [KernelKind; 5] = [
        KernelKind::Scalar,
        KernelKind::MatrixLibrary,
        KernelKind::Simd,
        KernelKind::SimdFma,
        KernelKind::FrameworkLayer,
    ];

    /// Name used on the command line and in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            KernelKind::Scalar => "scalar",
            KernelKind::MatrixLibrary => "matrix_library",
            KernelKind::Simd => "simd",
            KernelKind::SimdFma => "simd_fma",
            KernelKind::FrameworkLayer => "framework_layer",
        }
    }

    /// Column header used by the correctness table.
    pub fn label(self) -> &'static str {
        match self {
            KernelKind::Scalar => "Scalar",
            KernelKind::MatrixLibrary => "ndarray",
            KernelKind::Simd => "SIMD",
            KernelKind::SimdFma => "SIMD+FMA",
            KernelKind::FrameworkLayer => "candle",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            KernelKind::Scalar => "Plain scalar loop, reference implementation",
            KernelKind::MatrixLibrary => "ndarray general_mat_vec_mul followed by bias +=",
            KernelKind::Simd => "SIMD multiply with a horizontal reduction per lane chunk",
            KernelKind::SimdFma => "SIMD fused multiply-add into one accumulator per row",
            KernelKind::FrameworkLayer => "candle_nn::Linear forward pass",
        }
    }

    /// Builds the kernel for `data`.
    pub fn build<'a>(
        self,
        data: &'a DenseLayerData,
        context: &LayerContext,
    ) -> DenseLayerResult<Box<dyn DenseKernel + 'a>> {
        Ok(match self {
            KernelKind::Scalar => Box::new(ScalarKernel::new(data)),
            KernelKind::MatrixLibrary => Box::new(MatrixLibraryKernel::new(data)?),
            KernelKind::Simd => Box::new(VectorKernel::new(data)),
            KernelKind::SimdFma => Box::new(VectorFmaKernel::new(data)),
            KernelKind::FrameworkLayer => Box::new(FrameworkLayerKernel::new(data, context)?),
        })
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelKind {
    type Err = DenseLayerError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        KernelKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| DenseLayerError::UnknownKernel {
                name: name.to_string(),
            })
    }
}

/// Panics unless the buffers describe an `output_size × input_size` layer.
pub(crate) fn assert_dense_shapes(
    input: &[f32],
    bias: &[f32],
    weights: &[f32],
    output: &[f32],
    output_size: usize,
    input_size: usize,
) {
    assert!(input_size > 0, "input size must be greater than 0");
    assert_eq!(input.len(), input_size, "input length");
    assert_eq!(bias.len(), output_size, "bias length");
    assert_eq!(weights.len(), output_size * input_size, "weights length");
    assert_eq!(output.len(), output_size, "output length");
}
