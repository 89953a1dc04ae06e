//! SIMD kernel without fused multiply-add.
//!
//! Each `L`-wide chunk of a row is multiplied lane-wise and reduced to a scalar
//! right away, so a row costs `input_size / L` horizontal reductions. This is
//! the weak SIMD baseline the FMA kernel is compared against; its summation
//! order differs from both the scalar and the FMA kernel.

use super::{assert_dense_shapes, DenseKernel};
use crate::data_generator::DenseLayerData;
use crate::errors::DenseLayerResult;
use crate::utils::simd::{dot_chunk_reduce, SimdLevel};

/// SIMD dense forward pass using the widest instruction set of the running CPU.
///
/// # Panics
///
/// Panics if the buffer lengths do not describe an `output_size × input_size` layer.
pub fn dense_simd(
    input: &[f32],
    bias: &[f32],
    weights: &[f32],
    output_size: usize,
    input_size: usize,
    output: &mut [f32],
) {
    dense_simd_at(
        SimdLevel::detect(),
        input,
        bias,
        weights,
        output_size,
        input_size,
        output,
    );
}

pub(crate) fn dense_simd_at(
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
        *out = dot_chunk_reduce(level, bias_value, input, weights_row);
    }
}

pub struct VectorKernel<'a> {
    data: &'a DenseLayerData,
    level: SimdLevel,
    output: Vec<f32>,
}

impl<'a> VectorKernel<'a> {
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

impl DenseKernel for VectorKernel<'_> {
    fn name(&self) -> &'static str {
        "simd"
    }

    fn compute(&mut self) -> DenseLayerResult<&[f32]> {
        dense_simd_at(
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_generator::{generate, DEFAULT_SEED};
    use crate::kernels::scalar::dense_scalar;
    use crate::size_spec::SizeSpec;

    #[test]
    fn test_portable_and_detected_agree_with_scalar() {
        let data = generate(DEFAULT_SEED, SizeSpec::new(67, 13).unwrap());
        let mut expected = vec![0.0; 13];
        dense_scalar(data.input(), data.bias(), data.weights(), 13, 67, &mut expected);

        for level in [SimdLevel::Portable, SimdLevel::detect()] {
            let mut output = vec![f32::NAN; 13];
            dense_simd_at(level, data.input(), data.bias(), data.weights(), 13, 67, &mut output);
            for (i, (&e, &a)) in expected.iter().zip(output.iter()).enumerate() {
                assert!((e - a).abs() <= 1e-4, "{} row {}: {} vs {}", level, i, e, a);
            }
        }
    }

    #[test]
    fn test_input_shorter_than_lane_width() {
        let weights = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut output = [0.0; 2];
        dense_simd(&[1.0, 1.0, 1.0], &[0.0, 1.0], &weights, 2, 3, &mut output);
        assert_eq!(output, [6.0, 16.0]);
    }
}
