//! SIMD-accelerated 4-lane kernels with runtime capability dispatch.
//!
//! Private module providing the lane arithmetic behind
//! [`ParallelKernel`](crate::ode::ParallelKernel). Only [`Capability`] and
//! [`LANES`] are re-exported through [`crate::ode`].
//!
//! ## Dispatch strategy
//!
//! Two levels. The caller passes the [`Capability`] it detected once per
//! controller invocation; within that, `TypeId` dispatch at monomorphization
//! time routes `f64` to the hardware kernels and everything else to the
//! portable [`scalar`] lanes.
//!
//! Every kernel evaluates the same multiply/add sequence in the same order
//! (no fused multiply-add), so all paths agree bit-for-bit with each other
//! and with the scalar step kernel.
//!
//! ## Architecture support
//!
//! | Arch      | ISA     | f64 lanes per op | Detection |
//! |-----------|---------|------------------|-----------|
//! | `x86_64`  | AVX     | 4                | runtime with `std`, `target_feature` otherwise |
//! | `aarch64` | NEON    | 2 × 2            | baseline |
//! | other     | scalar  | 4                | —         |

pub(crate) mod scalar;

#[cfg(target_arch = "x86_64")]
pub(crate) mod f64_avx;

#[cfg(target_arch = "aarch64")]
pub(crate) mod f64_neon;

use core::any::TypeId;

use crate::traits::FloatScalar;

/// Number of lanes processed together by the data-parallel kernel.
///
/// Also the largest system size the parallel step kernel accepts.
pub const LANES: usize = 4;

/// One value per lane. Unused lanes are kept at zero.
pub(crate) type Lanes<T> = [T; LANES];

/// Hardware support for parallel floating-point lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// No usable vector unit; lane kernels run as plain loops.
    None,
    /// x86_64 AVX: 256-bit registers, 4×f64.
    Avx,
    /// aarch64 NEON: 128-bit registers, 2×f64.
    Neon,
}

impl Capability {
    /// Detect the vector unit of the running CPU.
    ///
    /// With `std` on x86_64 this queries CPUID (cached by the standard
    /// library); without `std` it falls back to the build configuration
    /// (`-C target-feature=+avx` or `-C target-cpu=native`).
    #[allow(unreachable_code)]
    pub fn detect() -> Self {
        #[cfg(all(target_arch = "x86_64", feature = "std"))]
        {
            if std::is_x86_feature_detected!("avx") {
                return Self::Avx;
            }
        }
        #[cfg(all(target_arch = "x86_64", not(feature = "std")))]
        {
            if cfg!(target_feature = "avx") {
                return Self::Avx;
            }
        }
        #[cfg(target_arch = "aarch64")]
        {
            return Self::Neon;
        }
        Self::None
    }

    /// Whether a hardware vector unit is available.
    #[inline]
    pub fn has_parallel_fp(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Load up to [`LANES`] values into a zero-padded lane array.
#[inline]
pub(crate) fn load<T: FloatScalar>(src: &[T]) -> Lanes<T> {
    debug_assert!(src.len() <= LANES);
    let mut lanes = [T::zero(); LANES];
    lanes[..src.len()].copy_from_slice(src);
    lanes
}

/// Dispatch `y + alpha * x` to SIMD or scalar lanes.
#[inline]
pub(crate) fn axpy_dispatch<T: FloatScalar>(
    cap: Capability,
    y: &Lanes<T>,
    alpha: T,
    x: &Lanes<T>,
) -> Lanes<T> {
    if TypeId::of::<T>() == TypeId::of::<f64>() {
        let y = unsafe { &*(y as *const Lanes<T> as *const Lanes<f64>) };
        let x = unsafe { &*(x as *const Lanes<T> as *const Lanes<f64>) };
        let a = unsafe { *(&alpha as *const T as *const f64) };
        match cap {
            #[cfg(target_arch = "x86_64")]
            Capability::Avx => {
                // Capability::Avx is only produced by `detect` on a CPU with AVX.
                let result = unsafe { f64_avx::axpy(y, a, x) };
                return unsafe { *(&result as *const Lanes<f64> as *const Lanes<T>) };
            }
            #[cfg(target_arch = "aarch64")]
            Capability::Neon => {
                let result = f64_neon::axpy(y, a, x);
                return unsafe { *(&result as *const Lanes<f64> as *const Lanes<T>) };
            }
            _ => {}
        }
    }
    scalar::axpy(y, alpha, x)
}

/// Dispatch `base + h * Σ coeffs[j] * ks[j]` to SIMD or scalar lanes.
///
/// The sum runs left to right and is scaled by `h` before `base` is added.
/// With `base = None` the result is just the scaled sum.
#[inline]
pub(crate) fn combine_dispatch<T: FloatScalar>(
    cap: Capability,
    base: Option<&Lanes<T>>,
    h: T,
    coeffs: &[T],
    ks: &[Lanes<T>],
) -> Lanes<T> {
    debug_assert_eq!(coeffs.len(), ks.len());
    debug_assert!(!coeffs.is_empty());
    if TypeId::of::<T>() == TypeId::of::<f64>() {
        let base = base.map(|b| unsafe { &*(b as *const Lanes<T> as *const Lanes<f64>) });
        let hf = unsafe { *(&h as *const T as *const f64) };
        let coeffs = unsafe { &*(coeffs as *const [T] as *const [f64]) };
        let ks = unsafe { &*(ks as *const [Lanes<T>] as *const [Lanes<f64>]) };
        match cap {
            #[cfg(target_arch = "x86_64")]
            Capability::Avx => {
                let result = unsafe { f64_avx::combine(base, hf, coeffs, ks) };
                return unsafe { *(&result as *const Lanes<f64> as *const Lanes<T>) };
            }
            #[cfg(target_arch = "aarch64")]
            Capability::Neon => {
                let result = f64_neon::combine(base, hf, coeffs, ks);
                return unsafe { *(&result as *const Lanes<f64> as *const Lanes<T>) };
            }
            _ => {}
        }
    }
    scalar::combine(base, h, coeffs, ks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(seed: f64) -> Lanes<f64> {
        [seed, -0.5 * seed + 1.0, 3.25 - seed, seed * seed - 0.125]
    }

    #[test]
    fn detect_is_consistent() {
        let cap = Capability::detect();
        assert_eq!(cap, Capability::detect());
        #[cfg(target_arch = "aarch64")]
        assert_eq!(cap, Capability::Neon);
        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        assert_eq!(cap, Capability::None);
    }

    #[test]
    fn has_parallel_fp() {
        assert!(!Capability::None.has_parallel_fp());
        assert!(Capability::Avx.has_parallel_fp());
        assert!(Capability::Neon.has_parallel_fp());
    }

    #[test]
    fn load_pads_with_zeros() {
        for n in 0..=LANES {
            let src: Vec<f64> = (0..n).map(|i| (i + 1) as f64).collect();
            let lanes = load(&src);
            for i in 0..LANES {
                let expected = if i < n { (i + 1) as f64 } else { 0.0 };
                assert_eq!(lanes[i], expected, "n={n} lane={i}");
            }
        }
    }

    // ── Hardware lanes vs. portable lanes ──────────────────────────

    #[test]
    fn axpy_f64_matches_scalar() {
        let cap = Capability::detect();
        for &alpha in &[0.0, 1.0, -0.2, 1.0e-3, 7.5e4] {
            let y = sample(1.5);
            let x = sample(-2.25);
            let got = axpy_dispatch(cap, &y, alpha, &x);
            let expected = scalar::axpy(&y, alpha, &x);
            assert_eq!(got, expected, "alpha={alpha}");
        }
    }

    #[test]
    fn combine_f64_matches_scalar() {
        let cap = Capability::detect();
        let ks = [sample(0.3), sample(-1.7), sample(2.9), sample(0.01), sample(5.5)];
        let coeffs = [-11.0 / 54.0, 5.0 / 2.0, -70.0 / 27.0, 35.0 / 27.0, 0.125];
        let base = sample(4.0);
        for len in 1..=ks.len() {
            let got = combine_dispatch(cap, Some(&base), 0.37, &coeffs[..len], &ks[..len]);
            let expected = scalar::combine(Some(&base), 0.37, &coeffs[..len], &ks[..len]);
            assert_eq!(got, expected, "len={len}");

            let got = combine_dispatch(cap, None, -0.05, &coeffs[..len], &ks[..len]);
            let expected = scalar::combine(None, -0.05, &coeffs[..len], &ks[..len]);
            assert_eq!(got, expected, "len={len} no base");
        }
    }

    #[test]
    fn combine_matches_hand_computation() {
        let ks = [[1.0, 2.0, 3.0, 4.0], [10.0, 20.0, 30.0, 40.0]];
        let base = [100.0, 200.0, 300.0, 400.0];
        let out = combine_dispatch(Capability::detect(), Some(&base), 0.5, &[2.0, 0.25], &ks);
        // 100 + 0.5 * (2*1 + 0.25*10) = 102.25
        assert_eq!(out, [102.25, 204.5, 306.75, 409.0]);
    }

    #[test]
    fn f32_uses_portable_lanes() {
        let y: Lanes<f32> = [1.0, 2.0, 3.0, 4.0];
        let x: Lanes<f32> = [0.5, 0.25, 0.125, 0.0625];
        let out = axpy_dispatch(Capability::detect(), &y, 2.0_f32, &x);
        assert_eq!(out, [2.0, 2.5, 3.25, 4.125]);

        let ks: [Lanes<f32>; 1] = [x];
        let out = combine_dispatch(Capability::detect(), None, 4.0_f32, &[1.0], &ks);
        assert_eq!(out, [2.0, 1.0, 0.5, 0.25]);
    }
}
