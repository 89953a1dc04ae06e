//! Adapter over the `candle` neural-network framework's dense layer.
//!
//! The layer is configured once per dataset with identity activation (the
//! linear layer is used on its own) and its parameters are never touched
//! afterwards. Each call forwards the fixed `(1, input_size)` input through
//! [`Linear`] and copies the `(1, output_size)` result into the kernel's own
//! output buffer.

use candle_core::{Device, Module, Tensor};
use candle_nn::Linear;

use super::DenseKernel;
use crate::data_generator::DenseLayerData;
use crate::errors::{DenseLayerError, DenseLayerResult};

/// Execution context handed to the framework layer at construction.
///
/// Passed explicitly instead of living in shared global state.
#[derive(Debug, Clone)]
pub struct LayerContext {
    device: Device,
}

impl LayerContext {
    pub fn new(device: Device) -> Self {
        Self { device }
    }

    /// Host memory, no accelerator.
    pub fn cpu() -> Self {
        Self::new(Device::Cpu)
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

impl Default for LayerContext {
    fn default() -> Self {
        Self::cpu()
    }
}

pub struct FrameworkLayerKernel {
    layer: Linear,
    input: Tensor,
    output: Vec<f32>,
}

impl FrameworkLayerKernel {
    pub fn new(data: &DenseLayerData, context: &LayerContext) -> DenseLayerResult<Self> {
        let device = context.device();
        let (input_size, output_size) = (data.input_size(), data.output_size());

        // candle stores linear weights as (out_features, in_features), the same
        // orientation as our row-major buffer; forward() applies the transpose.
        let weight = Tensor::from_slice(data.weights(), (output_size, input_size), device)?;
        let bias = Tensor::from_slice(data.bias(), output_size, device)?;
        let input = Tensor::from_slice(data.input(), (1, input_size), device)?;

        Ok(Self {
            layer: Linear::new(weight, Some(bias)),
            input,
            output: vec![0.0; output_size],
        })
    }

    pub fn layer(&self) -> &Linear {
        &self.layer
    }

    /// Mutable access to the output buffer, e.g. to poison it between calls.
    pub fn output_mut(&mut self) -> &mut [f32] {
        &mut self.output
    }
}

impl DenseKernel for FrameworkLayerKernel {
    fn name(&self) -> &'static str {
        "framework_layer"
    }

    fn compute(&mut self) -> DenseLayerResult<&[f32]> {
        let result = self.layer.forward(&self.input)?;
        let values = result.flatten_all()?.to_vec1::<f32>()?;
        if values.len() != self.output.len() {
            return Err(DenseLayerError::DimensionMismatch {
                buffer: "framework layer output",
                expected: self.output.len(),
                actual: values.len(),
            });
        }

        self.output.copy_from_slice(&values);
        Ok(&self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_generator::{generate, DEFAULT_SEED};
    use crate::size_spec::SizeSpec;

    #[test]
    fn test_known_values() {
        let data = DenseLayerData::from_parts(
            SizeSpec::new(3, 2).unwrap(),
            vec![1.0, 2.0, 3.0],
            vec![0.5, -1.0],
            vec![1.0, 2.0, 3.0, -1.0, 0.0, 0.5],
        )
        .unwrap();
        let mut kernel = FrameworkLayerKernel::new(&data, &LayerContext::cpu()).unwrap();

        let output = kernel.compute().unwrap();
        assert!((output[0] - 14.5).abs() < 1e-6);
        assert!((output[1] + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_parameters_are_not_mutated_by_forward() {
        let data = generate(DEFAULT_SEED, SizeSpec::new(20, 6).unwrap());
        let mut kernel = FrameworkLayerKernel::new(&data, &LayerContext::default()).unwrap();

        for _ in 0..3 {
            kernel.compute().unwrap();
        }

        let weight = kernel.layer().weight().flatten_all().unwrap().to_vec1::<f32>().unwrap();
        let bias = kernel
            .layer()
            .bias()
            .unwrap()
            .to_vec1::<f32>()
            .unwrap();
        assert_eq!(weight, data.weights());
        assert_eq!(bias, data.bias());
    }
}
