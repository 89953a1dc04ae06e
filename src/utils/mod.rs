//! Numeric helpers shared by the vector kernels.

pub mod simd;

pub use simd::SimdLevel;
