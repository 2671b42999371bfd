//! NEON-accelerated f64 lane kernels for aarch64.
//!
//! NEON provides 128-bit registers → 2×f64 lanes; a 4-lane stage vector is
//! held in a low/high register pair.

use core::arch::aarch64::*;

/// `y + alpha * x` over 4 lanes.
#[inline]
pub fn axpy(y: &[f64; 4], alpha: f64, x: &[f64; 4]) -> [f64; 4] {
    let mut out = [0.0; 4];
    unsafe {
        let va = vdupq_n_f64(alpha);
        for off in [0, 2] {
            let vx = vld1q_f64(x.as_ptr().add(off));
            let vy = vld1q_f64(y.as_ptr().add(off));
            vst1q_f64(out.as_mut_ptr().add(off), vaddq_f64(vmulq_f64(va, vx), vy));
        }
    }
    out
}

/// `base + h * Σ coeffs[j] * ks[j]` over 4 lanes.
///
/// Uses `vmulq`/`vaddq` rather than `vfmaq` so rounding matches the scalar
/// path.
#[inline]
pub fn combine(base: Option<&[f64; 4]>, h: f64, coeffs: &[f64], ks: &[[f64; 4]]) -> [f64; 4] {
    debug_assert_eq!(coeffs.len(), ks.len());
    let mut out = [0.0; 4];
    unsafe {
        let vh = vdupq_n_f64(h);
        for off in [0, 2] {
            let mut acc = vmulq_f64(vdupq_n_f64(coeffs[0]), vld1q_f64(ks[0].as_ptr().add(off)));
            for j in 1..coeffs.len() {
                let term = vmulq_f64(vdupq_n_f64(coeffs[j]), vld1q_f64(ks[j].as_ptr().add(off)));
                acc = vaddq_f64(acc, term);
            }
            acc = vmulq_f64(acc, vh);
            if let Some(b) = base {
                acc = vaddq_f64(acc, vld1q_f64(b.as_ptr().add(off)));
            }
            vst1q_f64(out.as_mut_ptr().add(off), acc);
        }
    }
    out
}
