//! Reference scalar kernel.

use super::{assert_dense_shapes, DenseKernel};
use crate::data_generator::DenseLayerData;
use crate::errors::DenseLayerResult;

/// Computes `output[i] = bias[i] + Σ_j weights[i * input_size + j] * input[j]`.
///
/// Each row is accumulated left to right in plain `f32`, starting from the bias.
/// This is the ground truth every other kernel is checked against.
///
/// # Panics
///
/// Panics if the buffer lengths do not describe an `output_size × input_size` layer.
pub fn dense_scalar(
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
        let mut sum = bias_value;
        for (&weight, &x) in weights_row.iter().zip(input.iter()) {
            sum += weight * x;
        }
        *out = sum;
    }
}

pub struct ScalarKernel<'a> {
    data: &'a DenseLayerData,
    output: Vec<f32>,
}

impl<'a> ScalarKernel<'a> {
    pub fn new(data: &'a DenseLayerData) -> Self {
        Self {
            data,
            output: vec![0.0; data.output_size()],
        }
    }

    /// Mutable access to the output buffer, e.g. to poison it between calls.
    pub fn output_mut(&mut self) -> &mut [f32] {
        &mut self.output
    }
}

impl DenseKernel for ScalarKernel<'_> {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn compute(&mut self) -> DenseLayerResult<&[f32]> {
        dense_scalar(
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

    #[test]
    fn test_dense_scalar_known_values() {
        // W = [[1, 2, 3], [-1, 0, 0.5]], x = [1, 2, 3], b = [0.5, -1]
        let weights = [1.0, 2.0, 3.0, -1.0, 0.0, 0.5];
        let input = [1.0, 2.0, 3.0];
        let bias = [0.5, -1.0];
        let mut output = [f32::NAN; 2];

        dense_scalar(&input, &bias, &weights, 2, 3, &mut output);

        assert_eq!(output, [14.5, -0.5]);
    }

    #[test]
    #[should_panic(expected = "weights length")]
    fn test_dense_scalar_rejects_short_weights() {
        let mut output = [0.0; 2];
        dense_scalar(&[1.0, 2.0], &[0.0, 0.0], &[1.0, 2.0, 3.0], 2, 2, &mut output);
    }
}
