//! Cross-kernel correctness check.
//!
//! Every kernel is run on the same dataset and compared elementwise against the
//! scalar reference. Kernels sum in different orders, so agreement is checked
//! against an absolute [`TOLERANCE`] rather than bit equality.

use std::fmt;

use log::{debug, warn};

use crate::data_generator::DenseLayerData;
use crate::errors::{DenseLayerError, DenseLayerResult};
use crate::kernels::{KernelKind, LayerContext};
use crate::size_spec::SizeSpec;

/// Maximum absolute per-element difference between two kernels considered equal.
pub const TOLERANCE: f32 = 1e-4;

/// Result of comparing every candidate kernel against the scalar reference.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Pass,
    /// First element found outside the tolerance.
    Mismatch {
        kernel: KernelKind,
        index: usize,
        expected: f32,
        actual: f32,
    },
}

/// Output of one kernel on the checked dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelOutput {
    pub kind: KernelKind,
    pub values: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct CorrectnessReport {
    size: SizeSpec,
    outputs: Vec<KernelOutput>,
    outcome: CheckOutcome,
}

impl CorrectnessReport {
    pub fn size(&self) -> SizeSpec {
        self.size
    }

    pub fn outcome(&self) -> &CheckOutcome {
        &self.outcome
    }

    pub fn is_pass(&self) -> bool {
        self.outcome == CheckOutcome::Pass
    }

    /// Outputs of every kernel, scalar reference first.
    pub fn outputs(&self) -> &[KernelOutput] {
        &self.outputs
    }

    pub fn output(&self, kind: KernelKind) -> Option<&[f32]> {
        self.outputs
            .iter()
            .find(|output| output.kind == kind)
            .map(|output| output.values.as_slice())
    }

    /// Largest absolute difference between `kind` and the scalar reference.
    pub fn max_abs_diff(&self, kind: KernelKind) -> Option<f32> {
        let reference = self.output(KernelKind::Scalar)?;
        let candidate = self.output(kind)?;
        Some(
            reference
                .iter()
                .zip(candidate)
                .map(|(&r, &c)| (r - c).abs())
                .fold(0.0f32, f32::max),
        )
    }

    /// Turns a mismatch into [`DenseLayerError::ToleranceExceeded`].
    pub fn into_result(self) -> DenseLayerResult<Self> {
        match self.outcome {
            CheckOutcome::Pass => Ok(self),
            CheckOutcome::Mismatch {
                kernel,
                index,
                expected,
                actual,
            } => Err(DenseLayerError::ToleranceExceeded {
                kernel: kernel.name(),
                index,
                expected,
                actual,
                tolerance: TOLERANCE,
            }),
        }
    }
}

impl fmt::Display for CorrectnessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>8}", "Index")?;
        for output in &self.outputs {
            write!(f, " {:>12}", output.kind.label())?;
        }
        writeln!(f)?;

        let rows = self.size.output_size();
        for index in 0..rows {
            write!(f, "{:>8}", index)?;
            for output in &self.outputs {
                match output.values.get(index) {
                    Some(value) => write!(f, " {:>12.6}", value)?,
                    None => write!(f, " {:>12}", "-")?,
                }
            }
            writeln!(f)?;
        }

        match &self.outcome {
            CheckOutcome::Pass => write!(
                f,
                "PASS: all kernels agree with {} within {:e}",
                KernelKind::Scalar.label(),
                TOLERANCE
            ),
            CheckOutcome::Mismatch {
                kernel,
                index,
                expected,
                actual,
            } => write!(
                f,
                "MISMATCH: {} at index {}: expected {}, got {}",
                kernel.label(),
                index,
                expected,
                actual
            ),
        }
    }
}

/// Runs every kernel on one dataset and compares them with the scalar reference.
#[derive(Debug, Clone, Default)]
pub struct CorrectnessHarness {
    context: LayerContext,
}

impl CorrectnessHarness {
    pub fn new(context: LayerContext) -> Self {
        Self { context }
    }

    /// Checks all kernels in [`KernelKind::ALL`] order.
    ///
    /// Every kernel runs to completion before any comparison is made; the
    /// comparison then stops at the first element outside [`TOLERANCE`].
    /// Construction or execution failures of a kernel are returned as errors.
    pub fn check(&self, data: &DenseLayerData) -> DenseLayerResult<CorrectnessReport> {
        let mut outputs = Vec::with_capacity(KernelKind::ALL.len());
        for kind in KernelKind::ALL {
            let mut kernel = kind.build(data, &self.context)?;
            let values = kernel.compute()?.to_vec();
            debug!("{} produced {} outputs", kind, values.len());
            outputs.push(KernelOutput { kind, values });
        }

        let outcome = compare_outputs(&outputs);
        if let CheckOutcome::Mismatch {
            kernel,
            index,
            expected,
            actual,
        } = &outcome
        {
            warn!(
                "{} kernel mismatch at index {} for {}: expected {}, got {}",
                kernel,
                index,
                data.size(),
                expected,
                actual
            );
        }

        Ok(CorrectnessReport {
            size: data.size(),
            outputs,
            outcome,
        })
    }
}

fn compare_outputs(outputs: &[KernelOutput]) -> CheckOutcome {
    let Some(reference) = outputs.iter().find(|o| o.kind == KernelKind::Scalar) else {
        return CheckOutcome::Pass;
    };

    for candidate in outputs.iter().filter(|o| o.kind != KernelKind::Scalar) {
        if let Some((index, expected, actual)) =
            first_mismatch(&reference.values, &candidate.values, TOLERANCE)
        {
            return CheckOutcome::Mismatch {
                kernel: candidate.kind,
                index,
                expected,
                actual,
            };
        }
    }

    CheckOutcome::Pass
}

/// Returns `(index, expected, actual)` of the first element outside `tolerance`.
///
/// A candidate of the wrong length fails at the first index present in only one
/// of the two slices; the missing side is reported as NaN. NaN never compares
/// within tolerance.
pub fn first_mismatch(
    reference: &[f32],
    candidate: &[f32],
    tolerance: f32,
) -> Option<(usize, f32, f32)> {
    for (index, (&expected, &actual)) in reference.iter().zip(candidate).enumerate() {
        let diff = (expected - actual).abs();
        if diff.is_nan() || diff > tolerance {
            return Some((index, expected, actual));
        }
    }

    if reference.len() != candidate.len() {
        let index = reference.len().min(candidate.len());
        let expected = reference.get(index).copied().unwrap_or(f32::NAN);
        let actual = candidate.get(index).copied().unwrap_or(f32::NAN);
        return Some((index, expected, actual));
    }

    None
}
