//! Adapter over the `ndarray` dense linear-algebra primitives.
//!
//! The views are built once per dataset and borrow the same buffers the other
//! kernels read. Each call runs `y = 1·W·x + 0·y` with
//! [`general_mat_vec_mul`] and then adds the bias in place. With `beta == 0`
//! ndarray ignores whatever the output view held before, so stale values from
//! a previous call never leak into the result.

use ndarray::linalg::general_mat_vec_mul;
use ndarray::{ArrayView1, ArrayView2, ArrayViewMut1};

use super::DenseKernel;
use crate::data_generator::DenseLayerData;
use crate::errors::DenseLayerResult;

pub struct MatrixLibraryKernel<'a> {
    weights: ArrayView2<'a, f32>,
    input: ArrayView1<'a, f32>,
    bias: ArrayView1<'a, f32>,
    output: Vec<f32>,
}

impl<'a> MatrixLibraryKernel<'a> {
    pub fn new(data: &'a DenseLayerData) -> DenseLayerResult<Self> {
        let weights =
            ArrayView2::from_shape((data.output_size(), data.input_size()), data.weights())?;
        let input = ArrayView1::from_shape(data.input_size(), data.input())?;
        let bias = ArrayView1::from_shape(data.output_size(), data.bias())?;

        Ok(Self {
            weights,
            input,
            bias,
            output: vec![0.0; data.output_size()],
        })
    }

    /// Mutable access to the output buffer, e.g. to poison it between calls.
    pub fn output_mut(&mut self) -> &mut [f32] {
        &mut self.output
    }
}

impl DenseKernel for MatrixLibraryKernel<'_> {
    fn name(&self) -> &'static str {
        "matrix_library"
    }

    fn compute(&mut self) -> DenseLayerResult<&[f32]> {
        let mut output = ArrayViewMut1::from(self.output.as_mut_slice());
        general_mat_vec_mul(1.0, &self.weights, &self.input, 0.0, &mut output);
        output += &self.bias;
        Ok(&self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::size_spec::SizeSpec;

    #[test]
    fn test_known_values_and_poisoned_output() {
        let data = DenseLayerData::from_parts(
            SizeSpec::new(3, 2).unwrap(),
            vec![1.0, 2.0, 3.0],
            vec![0.5, -1.0],
            vec![1.0, 2.0, 3.0, -1.0, 0.0, 0.5],
        )
        .unwrap();
        let mut kernel = MatrixLibraryKernel::new(&data).unwrap();

        kernel.output_mut().fill(f32::NAN);
        assert_eq!(kernel.compute().unwrap(), &[14.5, -0.5]);

        kernel.output_mut().fill(1.0e30);
        assert_eq!(kernel.compute().unwrap(), &[14.5, -0.5]);
    }
}
