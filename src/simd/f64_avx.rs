//! AVX-accelerated f64 lane kernels for x86_64.
//!
//! AVX provides 256-bit registers → 4×f64 lanes, so one register holds a
//! whole stage vector of a system with up to 4 equations.
//!
//! Compiled on every x86_64 build; the functions carry
//! `#[target_feature(enable = "avx")]` and must only be called after
//! [`Capability::detect`](super::Capability::detect) returned `Avx`.

use core::arch::x86_64::*;

/// `y + alpha * x` over 4 lanes.
///
/// # Safety
///
/// The CPU must support AVX.
#[inline]
#[target_feature(enable = "avx")]
pub unsafe fn axpy(y: &[f64; 4], alpha: f64, x: &[f64; 4]) -> [f64; 4] {
    let vx = _mm256_loadu_pd(x.as_ptr());
    let vy = _mm256_loadu_pd(y.as_ptr());
    let r = _mm256_add_pd(_mm256_mul_pd(_mm256_set1_pd(alpha), vx), vy);

    let mut out = [0.0; 4];
    _mm256_storeu_pd(out.as_mut_ptr(), r);
    out
}

/// `base + h * Σ coeffs[j] * ks[j]` over 4 lanes.
///
/// Multiply and add are issued separately (no FMA) so rounding matches the
/// scalar path.
///
/// # Safety
///
/// The CPU must support AVX.
#[inline]
#[target_feature(enable = "avx")]
pub unsafe fn combine(
    base: Option<&[f64; 4]>,
    h: f64,
    coeffs: &[f64],
    ks: &[[f64; 4]],
) -> [f64; 4] {
    debug_assert_eq!(coeffs.len(), ks.len());

    let mut acc = _mm256_mul_pd(_mm256_set1_pd(coeffs[0]), _mm256_loadu_pd(ks[0].as_ptr()));
    for j in 1..coeffs.len() {
        let term = _mm256_mul_pd(_mm256_set1_pd(coeffs[j]), _mm256_loadu_pd(ks[j].as_ptr()));
        acc = _mm256_add_pd(acc, term);
    }
    acc = _mm256_mul_pd(acc, _mm256_set1_pd(h));
    if let Some(b) = base {
        acc = _mm256_add_pd(acc, _mm256_loadu_pd(b.as_ptr()));
    }

    let mut out = [0.0; 4];
    _mm256_storeu_pd(out.as_mut_ptr(), acc);
    out
}
