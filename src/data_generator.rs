//! Deterministic dense layer datasets.
//!
//! Every kernel is driven from the same [`DenseLayerData`]. The data is
//! regenerated at the start of each measurement iteration from a fixed seed, so
//! regenerated buffers are bit-identical across iterations and kernel families.

use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::errors::{DenseLayerError, DenseLayerResult};
use crate::size_spec::SizeSpec;

/// Seed used by the benchmark harness and the correctness check.
pub const DEFAULT_SEED: u64 = 123;

/// Lower bound (inclusive) of generated values.
pub const SAMPLE_LOW: f32 = -0.5;
/// Upper bound (exclusive) of generated values.
pub const SAMPLE_HIGH: f32 = 0.5;

/// Input vector, bias vector and row-major weight matrix of one dense layer.
///
/// Row `i` of the weight matrix occupies `weights[i * input_size..(i + 1) * input_size]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseLayerData {
    size: SizeSpec,
    input: Vec<f32>,
    bias: Vec<f32>,
    weights: Vec<f32>,
}

impl DenseLayerData {
    /// Builds a dataset from existing buffers, checking every length against `size`.
    pub fn from_parts(
        size: SizeSpec,
        input: Vec<f32>,
        bias: Vec<f32>,
        weights: Vec<f32>,
    ) -> DenseLayerResult<Self> {
        check_len("input", size.input_size(), input.len())?;
        check_len("bias", size.output_size(), bias.len())?;
        check_len("weights", size.weight_count(), weights.len())?;

        Ok(Self {
            size,
            input,
            bias,
            weights,
        })
    }

    pub fn size(&self) -> SizeSpec {
        self.size
    }

    pub fn input_size(&self) -> usize {
        self.size.input_size()
    }

    pub fn output_size(&self) -> usize {
        self.size.output_size()
    }

    pub fn input(&self) -> &[f32] {
        &self.input
    }

    pub fn bias(&self) -> &[f32] {
        &self.bias
    }

    /// Flattened row-major weights (`output_size * input_size`).
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weights of a single output neuron.
    pub fn weight_row(&self, row: usize) -> Option<&[f32]> {
        let input_size = self.input_size();
        let start = row.checked_mul(input_size)?;
        let end = start.checked_add(input_size)?;
        self.weights.get(start..end)
    }

    /// Sets every weight of `row` to zero, leaving that output equal to its bias.
    pub fn zero_weight_row(&mut self, row: usize) -> DenseLayerResult<()> {
        let output_size = self.output_size();
        if row >= output_size {
            return Err(DenseLayerError::RowOutOfBounds { row, output_size });
        }

        let input_size = self.input_size();
        self.weights[row * input_size..(row + 1) * input_size].fill(0.0);
        Ok(())
    }
}

/// Generates the dataset for `size` from `seed`.
///
/// Values are drawn uniformly from `[SAMPLE_LOW, SAMPLE_HIGH)` in a fixed order:
/// input, then bias, then the weight matrix row by row.
pub fn generate(seed: u64, size: SizeSpec) -> DenseLayerData {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let uniform = Uniform::new(SAMPLE_LOW, SAMPLE_HIGH);

    let input: Vec<f32> = (0..size.input_size())
        .map(|_| uniform.sample(&mut rng))
        .collect();
    let bias: Vec<f32> = (0..size.output_size())
        .map(|_| uniform.sample(&mut rng))
        .collect();
    let weights: Vec<f32> = (0..size.weight_count())
        .map(|_| uniform.sample(&mut rng))
        .collect();

    DenseLayerData {
        size,
        input,
        bias,
        weights,
    }
}

fn check_len(buffer: &'static str, expected: usize, actual: usize) -> DenseLayerResult<()> {
    if expected != actual {
        return Err(DenseLayerError::DimensionMismatch {
            buffer,
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(input: usize, output: usize) -> SizeSpec {
        SizeSpec::new(input, output).unwrap()
    }

    #[test]
    fn test_generate_shapes() {
        let data = generate(DEFAULT_SEED, size(64, 32));
        assert_eq!(data.input().len(), 64);
        assert_eq!(data.bias().len(), 32);
        assert_eq!(data.weights().len(), 64 * 32);
    }

    #[test]
    fn test_generate_is_bit_identical_for_same_seed() {
        let first = generate(DEFAULT_SEED, size(67, 13));
        let second = generate(DEFAULT_SEED, size(67, 13));

        let bits = |values: &[f32]| values.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(first.input()), bits(second.input()));
        assert_eq!(bits(first.bias()), bits(second.bias()));
        assert_eq!(bits(first.weights()), bits(second.weights()));
    }

    #[test]
    fn test_different_seeds_differ() {
        let first = generate(1, size(16, 4));
        let second = generate(2, size(16, 4));
        assert_ne!(first.weights(), second.weights());
    }

    #[test]
    fn test_values_are_within_sample_range() {
        let data = generate(DEFAULT_SEED, size(128, 64));
        for &value in data.input().iter().chain(data.bias()).chain(data.weights()) {
            assert!((SAMPLE_LOW..SAMPLE_HIGH).contains(&value));
        }
    }

    #[test]
    fn test_from_parts_rejects_mismatched_lengths() {
        let result =
            DenseLayerData::from_parts(size(3, 2), vec![0.0; 3], vec![0.0; 2], vec![0.0; 5]);
        assert!(matches!(
            result,
            Err(DenseLayerError::DimensionMismatch {
                buffer: "weights",
                expected: 6,
                actual: 5
            })
        ));

        let result =
            DenseLayerData::from_parts(size(3, 2), vec![0.0; 4], vec![0.0; 2], vec![0.0; 6]);
        assert!(matches!(
            result,
            Err(DenseLayerError::DimensionMismatch { buffer: "input", .. })
        ));
    }

    #[test]
    fn test_weight_row_out_of_range_is_none() {
        let data = generate(DEFAULT_SEED, size(8, 4));
        assert_eq!(data.weight_row(3).unwrap().len(), 8);
        assert!(data.weight_row(4).is_none());
        assert!(data.weight_row(usize::MAX).is_none());
        assert!(data.weight_row(usize::MAX / 8 + 1).is_none());
    }

    #[test]
    fn test_zero_weight_row() {
        let mut data = generate(DEFAULT_SEED, size(8, 4));
        data.zero_weight_row(2).unwrap();

        assert!(data.weight_row(2).unwrap().iter().all(|&w| w == 0.0));
        assert!(data.weight_row(1).unwrap().iter().any(|&w| w != 0.0));
        assert!(data.weight_row(4).is_none());
        assert!(matches!(
            data.zero_weight_row(4),
            Err(DenseLayerError::RowOutOfBounds {
                row: 4,
                output_size: 4
            })
        ));
    }
}
