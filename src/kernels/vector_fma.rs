//! SIMD kernel with fused multiply-add.
//!
//! A single vector accumulator is carried across the full row and reduced once,
//! then added to the bias. The `input_size % L` tail is added afterwards with a
//! plain scalar loop.

use super::{assert_dense_shapes, DenseKernel};
use crate::data_generator::DenseLayerData;
use crate::errors::DenseLayerResult;
use crate::utils::simd::{dot_fma_accumulate, SimdLevel};

/// SIMD+FMA dense forward pass using the widest instruction set of the running CPU.
///
/// # Panics
///
/// Panics if the buffer lengths do not describe an `output_size × input_size` layer.
pub fn dense_simd_fma(
    input: &[f32],
    bias: &[f32],
    weights: &[f32],
    output_size: usize,
    input_size: usize,
    output: &mut [f32],
) {
    dense_simd_fma_at(
        SimdLevel::detect(),
        input,
        bias,
        weights,
        output_size,
        input_size,
        output,
    );
}

pub(crate) fn dense_simd_fma_at(
    level: SimdLevel,
    input: &[f32],
    bias: &[f32],
    weights: &[f32],
    output_size: usize,
    input_size: usize,
    output: &mut [f32],
) {
    assert_dense_shapes(input, bias, weights, output, output_size, input_size);

    for ((weights_row, &bias_value), out) in weights
        .chunks_exact(input_size)
        .zip(bias.iter())
        .zip(output.iter_mut())
    {
        *out = dot_fma_accumulate(level, bias_value, input, weights_row);
    }
}

pub struct VectorFmaKernel<'a> {
    data: &'a DenseLayerData,
    level: SimdLevel,
    output: Vec<f32>,
}

impl<'a> VectorFmaKernel<'a> {
    pub fn new(data: &'a DenseLayerData) -> Self {
        Self {
            data,
            level: SimdLevel::detect(),
            output: vec![0.0; data.output_size()],
        }
    }

    pub fn level(&self) -> SimdLevel {
        self.level
    }

    /// Mutable access to the output buffer, e.g. to poison it between calls.
    pub fn output_mut(&mut self) -> &mut [f32] {
        &mut self.output
    }
}

impl DenseKernel for VectorFmaKernel<'_> {
    fn name(&self) -> &'static str {
        "simd_fma"
    }

    fn compute(&mut self) -> DenseLayerResult<&[f32]> {
        dense_simd_fma_at(
            self.level,
            self.data.input(),
            self.data.bias(),
            self.data.weights(),
            self.data.output_size(),
            self.data.input_size(),
            &mut self.output,
        );
        Ok(&self.output)
    }
}
