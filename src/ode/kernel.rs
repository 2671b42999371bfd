use alloc::vec;
use alloc::vec::Vec;

use super::tableau::Tableau;
use super::OdeError;
use crate::simd::{self, Capability, Lanes, LANES};
use crate::traits::FloatScalar;

/// One embedded Cash-Karp step: 4th-order update plus error estimate.
///
/// Given `u`, its slope `dudt = f(t, u)` (used as the first stage), `t` and
/// a signed step `h`, an implementation evaluates the five remaining stages
/// through `f` and writes
///
/// ```text
/// u_out = u + h (b1 k1 + b3 k3 + b4 k4 + b6 k6)
/// u_err = h (d1 k1 + d3 k3 + d4 k4 + d5 k5 + d6 k6)
/// ```
///
/// All slices have the system length `n`. Implementations call `f` exactly
/// five times, in stage order.
pub trait StepKernel<T: FloatScalar> {
    /// Run one step, writing into `u_out` and `u_err`.
    fn step<F>(
        &self,
        u: &[T],
        dudt: &[T],
        t: T,
        h: T,
        f: &mut F,
        u_out: &mut [T],
        u_err: &mut [T],
    ) where
        F: FnMut(T, &[T], &mut [T]);
}

/// Which step kernel a controller call runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelKind {
    /// [`ScalarKernel`]: component-by-component loops, any system size.
    Scalar,
    /// [`ParallelKernel`]: all components of a stage at once, `n ≤ 4`.
    Parallel,
}

/// Kernel selection policy (configuration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelChoice {
    /// Use [`select_kernel`] on the system size and detected hardware.
    #[default]
    Auto,
    /// Always use [`ScalarKernel`].
    Scalar,
    /// Always use [`ParallelKernel`], on portable lanes if the CPU has no
    /// vector unit. Fails for systems larger than [`LANES`].
    Parallel,
}

impl KernelChoice {
    /// Resolve the policy for a system of `n` equations.
    ///
    /// # Errors
    ///
    /// Returns [`OdeError::TooManyEquations`] for `Parallel` with `n > LANES`.
    pub fn resolve(self, n: usize, cap: Capability) -> Result<KernelKind, OdeError> {
        match self {
            Self::Auto => Ok(select_kernel(n, cap)),
            Self::Scalar => Ok(KernelKind::Scalar),
            Self::Parallel if n <= LANES => Ok(KernelKind::Parallel),
            Self::Parallel => Err(OdeError::TooManyEquations { n }),
        }
    }
}

/// Pick the step kernel for `n` equations on hardware `cap`.
///
/// The parallel kernel is chosen iff `n ≤ LANES` and the CPU has a vector
/// unit; it is numerically equivalent to the scalar kernel either way.
///
/// ```
/// use cashkarp::ode::{select_kernel, Capability, KernelKind};
///
/// assert_eq!(select_kernel(3, Capability::Avx), KernelKind::Parallel);
/// assert_eq!(select_kernel(5, Capability::Avx), KernelKind::Scalar);
/// assert_eq!(select_kernel(3, Capability::None), KernelKind::Scalar);
/// ```
#[inline]
pub fn select_kernel(n: usize, cap: Capability) -> KernelKind {
    if n <= LANES && cap.has_parallel_fp() {
        KernelKind::Parallel
    } else {
        KernelKind::Scalar
    }
}

/// Generic step kernel: one loop over the components per stage.
///
/// Stage vectors `k2..k6` are heap-allocated per call; the tableau is cast
/// to `T` once, in [`ScalarKernel::new`].
#[derive(Debug, Clone, Copy)]
pub struct ScalarKernel<T> {
    tab: Tableau<T>,
}

impl<T: FloatScalar> ScalarKernel<T> {
    pub fn new() -> Self {
        Self { tab: Tableau::new() }
    }
}

impl<T: FloatScalar> Default for ScalarKernel<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Stage `j` (0-based): `k1 = dudt`, then the computed stages.
#[inline]
fn stage<'a, T>(dudt: &'a [T], ks: &'a [Vec<T>], j: usize) -> &'a [T] {
    if j == 0 {
        dudt
    } else {
        &ks[j - 1]
    }
}

impl<T: FloatScalar> StepKernel<T> for ScalarKernel<T> {
    fn step<F>(
        &self,
        u: &[T],
        dudt: &[T],
        t: T,
        h: T,
        f: &mut F,
        u_out: &mut [T],
        u_err: &mut [T],
    ) where
        F: FnMut(T, &[T], &mut [T]),
    {
        let n = u.len();
        debug_assert_eq!(dudt.len(), n);
        debug_assert_eq!(u_out.len(), n);
        debug_assert_eq!(u_err.len(), n);

        let tab = &self.tab;
        let zero = T::zero();
        let mut ks: Vec<Vec<T>> = vec![vec![zero; n]; 5];
        let mut trial = vec![zero; n];

        for s in 1..6 {
            if s == 1 {
                let a21h = tab.a[1][0] * h;
                for i in 0..n {
                    trial[i] = u[i] + a21h * dudt[i];
                }
            } else {
                for i in 0..n {
                    let mut sum = tab.a[s][0] * dudt[i];
                    for j in 1..s {
                        sum = sum + tab.a[s][j] * stage(dudt, &ks, j)[i];
                    }
                    trial[i] = u[i] + h * sum;
                }
            }
            f(t + tab.c[s] * h, &trial, &mut ks[s - 1]);
        }

        for i in 0..n {
            let mut sum = tab.b[0] * dudt[i];
            let mut err = tab.d[0] * dudt[i];
            for j in 1..6 {
                let kj = stage(dudt, &ks, j)[i];
                if tab.b[j] != zero {
                    sum = sum + tab.b[j] * kj;
                }
                if tab.d[j] != zero {
                    err = err + tab.d[j] * kj;
                }
            }
            u_out[i] = u[i] + h * sum;
            u_err[i] = h * err;
        }
    }
}

/// Data-parallel step kernel for systems of at most [`LANES`] equations.
///
/// Each stage is one lane-wide multiply/add sequence over stack-local,
/// zero-padded `[T; 4]` buffers; nothing is shared between calls. Produces
/// the same values as [`ScalarKernel`]. Larger systems are handed to the
/// scalar loops.
#[derive(Debug, Clone, Copy)]
pub struct ParallelKernel<T> {
    cap: Capability,
    tab: Tableau<T>,
}

impl<T: FloatScalar> ParallelKernel<T> {
    /// Use the vector unit of the running CPU, if any.
    pub fn new() -> Self {
        Self {
            cap: Capability::detect(),
            tab: Tableau::new(),
        }
    }

    /// Portable lanes only (no intrinsics).
    pub fn portable() -> Self {
        Self {
            cap: Capability::None,
            tab: Tableau::new(),
        }
    }

    /// Hardware the lane arithmetic runs on.
    pub fn capability(&self) -> Capability {
        self.cap
    }
}

impl<T: FloatScalar> Default for ParallelKernel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatScalar> StepKernel<T> for ParallelKernel<T> {
    fn step<F>(
        &self,
        u: &[T],
        dudt: &[T],
        t: T,
        h: T,
        f: &mut F,
        u_out: &mut [T],
        u_err: &mut [T],
    ) where
        F: FnMut(T, &[T], &mut [T]),
    {
        let n = u.len();
        debug_assert_eq!(dudt.len(), n);
        if n > LANES {
            let scalar = ScalarKernel { tab: self.tab };
            scalar.step(u, dudt, t, h, f, u_out, u_err);
            return;
        }

        let tab = &self.tab;
        let cap = self.cap;
        let zero = T::zero();

        let u_l = simd::load(u);
        let mut ks: [Lanes<T>; 6] = [[zero; LANES]; 6];
        ks[0] = simd::load(dudt);

        for s in 1..6 {
            let trial = if s == 1 {
                simd::axpy_dispatch(cap, &u_l, tab.a[1][0] * h, &ks[0])
            } else {
                simd::combine_dispatch(cap, Some(&u_l), h, &tab.a[s][..s], &ks[..s])
            };
            let mut k = [zero; LANES];
            f(t + tab.c[s] * h, &trial[..n], &mut k[..n]);
            ks[s] = k;
        }

        let out = simd::combine_dispatch(
            cap,
            Some(&u_l),
            h,
            &[tab.b[0], tab.b[2], tab.b[3], tab.b[5]],
            &[ks[0], ks[2], ks[3], ks[5]],
        );
        let err = simd::combine_dispatch(
            cap,
            None,
            h,
            &[tab.d[0], tab.d[2], tab.d[3], tab.d[4], tab.d[5]],
            &[ks[0], ks[2], ks[3], ks[4], ks[5]],
        );

        u_out[..n].copy_from_slice(&out[..n]);
        u_err[..n].copy_from_slice(&err[..n]);
    }
}
