//! SIMD-aware row dot-product kernels.
//!
//! Two accumulation strategies are provided, both starting from an initial
//! scalar (the bias) and both finishing the `len % lanes` tail with a plain
//! scalar loop:
//!
//! - [`dot_chunk_reduce`]: every `lanes`-wide chunk is multiplied lane-wise and
//!   immediately reduced to a scalar that is added to the running sum.
//! - [`dot_fma_accumulate`]: one vector accumulator is carried across the whole
//!   row with fused multiply-add and reduced once at the end.
//!
//! The two strategies round differently, so their results agree with the scalar
//! reference only within a tolerance.

use std::fmt;

/// Lane width of the portable fallback.
const PORTABLE_LANES: usize = 8;

/// Instruction set used by the vector kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdLevel {
    /// Lane-wise arithmetic on fixed-size arrays, no target features required.
    Portable,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Avx2,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Avx512,
}

impl SimdLevel {
    /// Picks the widest instruction set supported by the running CPU.
    ///
    /// FMA support is required alongside AVX2/AVX-512 so both vector kernels
    /// always run with the same lane width.
    #[inline]
    pub fn detect() -> Self {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            if std::is_x86_feature_detected!("avx512f") && std::is_x86_feature_detected!("fma") {
                return SimdLevel::Avx512;
            }
            if std::is_x86_feature_detected!("avx2") && std::is_x86_feature_detected!("fma") {
                return SimdLevel::Avx2;
            }
        }

        SimdLevel::Portable
    }

    /// Number of `f32` lanes processed per chunk.
    pub fn lanes(self) -> usize {
        match self {
            SimdLevel::Portable => PORTABLE_LANES,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            SimdLevel::Avx2 => 8,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            SimdLevel::Avx512 => 16,
        }
    }
}

impl fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimdLevel::Portable => "portable",
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            SimdLevel::Avx2 => "avx2",
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            SimdLevel::Avx512 => "avx512",
        };
        write!(f, "{} ({} lanes)", name, self.lanes())
    }
}

/// `init + Σ a[j] * b[j]`, reducing every lane chunk as soon as it is multiplied.
///
/// `level` must come from [`SimdLevel::detect`] or be [`SimdLevel::Portable`].
#[inline]
pub(crate) fn dot_chunk_reduce(level: SimdLevel, init: f32, a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "dot operands must have the same length");

    match level {
        SimdLevel::Portable => chunk_reduce_portable(init, a, b),
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        SimdLevel::Avx2 => unsafe { x86::chunk_reduce_avx2(init, a, b) },
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        SimdLevel::Avx512 => unsafe { x86::chunk_reduce_avx512(init, a, b) },
    }
}

/// `init + Σ a[j] * b[j]`, accumulating full chunks in one vector register with FMA.
///
/// `level` must come from [`SimdLevel::detect`] or be [`SimdLevel::Portable`].
#[inline]
pub(crate) fn dot_fma_accumulate(level: SimdLevel, init: f32, a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "dot operands must have the same length");

    match level {
        SimdLevel::Portable => fma_accumulate_portable(init, a, b),
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        SimdLevel::Avx2 => unsafe { x86::fma_accumulate_avx2(init, a, b) },
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        SimdLevel::Avx512 => unsafe { x86::fma_accumulate_avx512(init, a, b) },
    }
}

fn chunk_reduce_portable(init: f32, a: &[f32], b: &[f32]) -> f32 {
    let a_chunks = a.chunks_exact(PORTABLE_LANES);
    let b_chunks = b.chunks_exact(PORTABLE_LANES);
    let (a_tail, b_tail) = (a_chunks.remainder(), b_chunks.remainder());

    let mut sum = init;
    for (va, vb) in a_chunks.zip(b_chunks) {
        let mut lanes = [0.0f32; PORTABLE_LANES];
        for (lane, (&x, &y)) in lanes.iter_mut().zip(va.iter().zip(vb)) {
            *lane = x * y;
        }
        sum += hsum(&lanes);
    }

    for (&x, &y) in a_tail.iter().zip(b_tail) {
        sum += x * y;
    }

    sum
}

fn fma_accumulate_portable(init: f32, a: &[f32], b: &[f32]) -> f32 {
    let a_chunks = a.chunks_exact(PORTABLE_LANES);
    let b_chunks = b.chunks_exact(PORTABLE_LANES);
    let (a_tail, b_tail) = (a_chunks.remainder(), b_chunks.remainder());

    let mut acc = [0.0f32; PORTABLE_LANES];
    for (va, vb) in a_chunks.zip(b_chunks) {
        for (lane, (&x, &y)) in acc.iter_mut().zip(va.iter().zip(vb)) {
            *lane = x.mul_add(y, *lane);
        }
    }

    let mut sum = init + hsum(&acc);
    for (&x, &y) in a_tail.iter().zip(b_tail) {
        sum += x * y;
    }

    sum
}

#[inline(always)]
fn hsum(lanes: &[f32]) -> f32 {
    lanes.iter().fold(0.0f32, |sum, &lane| sum + lane)
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86 {
    #[cfg(target_arch = "x86")]
    use core::arch::x86::*;
    #[cfg(target_arch = "x86_64")]
    use core::arch::x86_64::*;

    use super::hsum;

    const AVX2_LANES: usize = 8;
    const AVX512_LANES: usize = 16;

    #[inline]
    #[target_feature(enable = "avx")]
    unsafe fn hsum256(v: __m256) -> f32 {
        let mut tmp = [0.0f32; AVX2_LANES];
        unsafe { _mm256_storeu_ps(tmp.as_mut_ptr(), v) };
        hsum(&tmp)
    }

    #[inline]
    #[target_feature(enable = "avx512f")]
    unsafe fn hsum512(v: __m512) -> f32 {
        let mut tmp = [0.0f32; AVX512_LANES];
        unsafe { _mm512_storeu_ps(tmp.as_mut_ptr(), v) };
        hsum(&tmp)
    }

    #[target_feature(enable = "avx2")]
    pub(super) unsafe fn chunk_reduce_avx2(init: f32, a: &[f32], b: &[f32]) -> f32 {
        let len = a.len();
        let (pa, pb) = (a.as_ptr(), b.as_ptr());
        let mut sum = init;
        let mut i = 0usize;

        while i + AVX2_LANES <= len {
            let va = unsafe { _mm256_loadu_ps(pa.add(i)) };
            let vb = unsafe { _mm256_loadu_ps(pb.add(i)) };
            sum += unsafe { hsum256(_mm256_mul_ps(va, vb)) };
            i += AVX2_LANES;
        }

        while i < len {
            sum += a[i] * b[i];
            i += 1;
        }

        sum
    }

    #[target_feature(enable = "avx2,fma")]
    pub(super) unsafe fn fma_accumulate_avx2(init: f32, a: &[f32], b: &[f32]) -> f32 {
        let len = a.len();
        let (pa, pb) = (a.as_ptr(), b.as_ptr());
        let mut acc = _mm256_setzero_ps();
        let mut i = 0usize;

        while i + AVX2_LANES <= len {
            let va = unsafe { _mm256_loadu_ps(pa.add(i)) };
            let vb = unsafe { _mm256_loadu_ps(pb.add(i)) };
            acc = _mm256_fmadd_ps(va, vb, acc);
            i += AVX2_LANES;
        }

        let mut sum = init + unsafe { hsum256(acc) };
        while i < len {
            sum += a[i] * b[i];
            i += 1;
        }

        sum
    }

    #[target_feature(enable = "avx512f")]
    pub(super) unsafe fn chunk_reduce_avx512(init: f32, a: &[f32], b: &[f32]) -> f32 {
        let len = a.len();
        let (pa, pb) = (a.as_ptr(), b.as_ptr());
        let mut sum = init;
        let mut i = 0usize;

        while i + AVX512_LANES <= len {
            let va = unsafe { _mm512_loadu_ps(pa.add(i)) };
            let vb = unsafe { _mm512_loadu_ps(pb.add(i)) };
            sum += unsafe { hsum512(_mm512_mul_ps(va, vb)) };
            i += AVX512_LANES;
        }

        while i < len {
            sum += a[i] * b[i];
            i += 1;
        }

        sum
    }

    #[target_feature(enable = "avx512f,fma")]
    pub(super) unsafe fn fma_accumulate_avx512(init: f32, a: &[f32], b: &[f32]) -> f32 {
        let len = a.len();
        let (pa, pb) = (a.as_ptr(), b.as_ptr());
        let mut acc = _mm512_setzero_ps();
        let mut i = 0usize;

        while i + AVX512_LANES <= len {
            let va = unsafe { _mm512_loadu_ps(pa.add(i)) };
            let vb = unsafe { _mm512_loadu_ps(pb.add(i)) };
            acc = _mm512_fmadd_ps(va, vb, acc);
            i += AVX512_LANES;
        }

        let mut sum = init + unsafe { hsum512(acc) };
        while i < len {
            sum += a[i] * b[i];
            i += 1;
        }

        sum
    }
}
