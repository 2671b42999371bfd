//! Portable lane implementations for SIMD-dispatched operations.
//!
//! Used for non-`f64` types and on targets without a vector unit. The
//! arithmetic order matches the hardware kernels exactly.

use super::{Lanes, LANES};
use crate::traits::FloatScalar;

/// `y + alpha * x` per lane.
#[inline]
pub fn axpy<T: FloatScalar>(y: &Lanes<T>, alpha: T, x: &Lanes<T>) -> Lanes<T> {
    let mut out = [T::zero(); LANES];
    for i in 0..LANES {
        out[i] = y[i] + alpha * x[i];
    }
    out
}

/// `base + h * Σ coeffs[j] * ks[j]` per lane.
#[inline]
pub fn combine<T: FloatScalar>(
    base: Option<&Lanes<T>>,
    h: T,
    coeffs: &[T],
    ks: &[Lanes<T>],
) -> Lanes<T> {
    debug_assert_eq!(coeffs.len(), ks.len());
    let mut out = [T::zero(); LANES];
    for i in 0..LANES {
        let mut sum = coeffs[0] * ks[0][i];
        for j in 1..coeffs.len() {
            sum = sum + coeffs[j] * ks[j][i];
        }
        out[i] = match base {
            Some(b) => b[i] + h * sum,
            None => h * sum,
        };
    }
    out
}
