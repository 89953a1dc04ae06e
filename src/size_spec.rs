//! Layer size descriptors.
//!
//! A size pair is written as `"<input_size>x<output_size>"`, e.g. `"64x32"` for a
//! layer with 64 inputs and 32 outputs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{DenseLayerError, DenseLayerResult};

/// Input/output dimensions of a dense layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SizeSpec {
    input_size: usize,
    output_size: usize,
}

impl SizeSpec {
    /// Creates a size spec, rejecting zero-sized dimensions and weight
    /// matrices whose element count does not fit in `usize`.
    pub fn new(input_size: usize, output_size: usize) -> DenseLayerResult<Self> {
        if input_size == 0 {
            return Err(DenseLayerError::InvalidDimension { name: "input size" });
        }
        if output_size == 0 {
            return Err(DenseLayerError::InvalidDimension {
                name: "output size",
            });
        }
        if input_size.checked_mul(output_size).is_none() {
            return Err(DenseLayerError::InvalidSizeSpec {
                spec: format!("{}x{}", input_size, output_size),
                reason: "weight count overflows usize".to_string(),
            });
        }

        Ok(Self {
            input_size,
            output_size,
        })
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Number of elements in the flattened row-major weight matrix.
    ///
    /// Never overflows: [`SizeSpec::new`] rejects sizes whose product does not fit.
    pub fn weight_count(&self) -> usize {
        self.input_size * self.output_size
    }
}

impl FromStr for SizeSpec {
    type Err = DenseLayerError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DenseLayerError::InvalidSizeSpec {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        let (input, output) = spec
            .trim()
            .split_once('x')
            .ok_or_else(|| invalid("expected the form <input_size>x<output_size>"))?;

        let input_size = input
            .parse::<usize>()
            .map_err(|e| invalid(&format!("input size '{}': {}", input, e)))?;
        let output_size = output
            .parse::<usize>()
            .map_err(|e| invalid(&format!("output size '{}': {}", output, e)))?;

        Self::new(input_size, output_size)
    }
}

impl TryFrom<String> for SizeSpec {
    type Error = DenseLayerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SizeSpec> for String {
    fn from(spec: SizeSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.input_size, self.output_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_pairs() {
        let spec: SizeSpec = "64x32".parse().unwrap();
        assert_eq!(spec.input_size(), 64);
        assert_eq!(spec.output_size(), 32);
        assert_eq!(spec.weight_count(), 2048);

        let spec: SizeSpec = "1024x512".parse().unwrap();
        assert_eq!((spec.input_size(), spec.output_size()), (1024, 512));
    }

    #[test]
    fn test_display_is_canonical() {
        let spec = SizeSpec::new(128, 64).unwrap();
        assert_eq!(spec.to_string(), "128x64");
        assert_eq!(spec.to_string().parse::<SizeSpec>().unwrap(), spec);
    }

    #[test]
    fn test_malformed_pairs_are_rejected() {
        for spec in ["", "64", "64-32", "x32", "64x", "ax32", "64xb", "64x32x2", "-1x4"] {
            let result = spec.parse::<SizeSpec>();
            assert!(
                matches!(result, Err(DenseLayerError::InvalidSizeSpec { .. })),
                "expected '{}' to be rejected, got {:?}",
                spec,
                result
            );
        }
    }

    #[test]
    fn test_zero_dimensions_are_rejected() {
        assert!(matches!(
            "0x32".parse::<SizeSpec>(),
            Err(DenseLayerError::InvalidDimension { name: "input size" })
        ));
        assert!(matches!(
            "64x0".parse::<SizeSpec>(),
            Err(DenseLayerError::InvalidDimension { name: "output size" })
        ));
    }

    #[test]
    fn test_overflowing_weight_count_is_rejected() {
        assert!(matches!(
            "4294967296x4294967297".parse::<SizeSpec>(),
            Err(DenseLayerError::InvalidSizeSpec { .. })
        ));

        let error = SizeSpec::new(usize::MAX, 2).unwrap_err();
        assert!(error.to_string().contains("weight count overflows"));
        let largest = SizeSpec::new(usize::MAX, 1).unwrap();
        assert_eq!(largest.weight_count(), usize::MAX);
    }

    #[test]
    fn test_serde_uses_string_form() {
        let spec: SizeSpec = serde_json::from_str("\"256x128\"").unwrap();
        assert_eq!(spec, SizeSpec::new(256, 128).unwrap());
        assert_eq!(serde_json::to_string(&spec).unwrap(), "\"256x128\"");
        assert!(serde_json::from_str::<SizeSpec>("\"256by128\"").is_err());
    }
}
