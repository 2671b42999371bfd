use alloc::vec;

use super::kernel::{KernelKind, ParallelKernel, ScalarKernel, StepKernel};
use super::tableau::CashKarp;
use super::{IntegrateSettings, OdeError};
use crate::simd::Capability;
use crate::traits::FloatScalar;

/// Result of one accepted adaptive step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome<T> {
    /// Independent variable after the step: `t + h_used`.
    pub t: T,
    /// Step size actually taken (same sign as the trial step).
    pub h_used: T,
    /// Step size to try next.
    pub h_next: T,
    /// Normalized error of the accepted step (`≤ 1`).
    pub max_err: T,
    /// Trial steps rejected before acceptance.
    pub rejected: usize,
    /// Derivative evaluations spent (5 per trial).
    pub evals: usize,
    /// Kernel that ran the trials.
    pub kernel: KernelKind,
}

/// Take one error-controlled Cash-Karp step from `(t, u)`.
///
/// Starting from `h_try`, the step kernel is run and its error estimate
/// normalized per component by `u_scaled` and the tolerance:
///
/// ```text
/// e_i = |u_err_i / u_scaled_i|      (|u_err_i / u_out_i| if e_i > 1e16)
/// max_err = max_i e_i / tolerance
/// ```
///
/// A trial with `max_err ≤ 1` is accepted. Otherwise the step shrinks to
/// `0.9 h max_err^(-1/4)`, but never below a tenth of its magnitude, and is
/// retried. After acceptance the next step is `0.9 h max_err^(-1/5)`, capped
/// at 5× growth.
///
/// On success `u` holds the new state. The kernel is chosen from
/// `settings.kernel`, the system size and the detected CPU, once per call.
///
/// # Errors
///
/// - [`OdeError::StepUnderflow`] when the shrunken step no longer changes `t`.
/// - [`OdeError::StepBelowMinimum`] when `settings.min_step > 0` and the
///   shrunken step falls below it.
/// - [`OdeError::TooManyEquations`] when `KernelChoice::Parallel` is forced
///   on a system larger than [`LANES`](super::LANES).
///
/// # Example
///
/// ```
/// use cashkarp::ode::quality_step;
/// use cashkarp::IntegrateSettings;
///
/// let mut f = |_t: f64, u: &[f64], dudt: &mut [f64]| dudt[0] = -u[0];
/// let mut u = [1.0_f64];
/// let dudt = [-1.0];
/// let u_scaled = [1.0 + 0.1 + 1e-30];
/// let settings = IntegrateSettings { tolerance: 1e-8, ..IntegrateSettings::default() };
///
/// let step = quality_step(&mut u, &dudt, &u_scaled, 0.0, 0.1, &settings, &mut f).unwrap();
/// assert!(step.max_err <= 1.0);
/// assert!((u[0] - (-step.t).exp()).abs() < 1e-7);
/// ```
pub fn quality_step<T, F>(
    u: &mut [T],
    dudt: &[T],
    u_scaled: &[T],
    t: T,
    h_try: T,
    settings: &IntegrateSettings<T>,
    f: &mut F,
) -> Result<StepOutcome<T>, OdeError>
where
    T: FloatScalar,
    F: FnMut(T, &[T], &mut [T]),
{
    let cap = Capability::detect();
    match settings.kernel.resolve(u.len(), cap)? {
        KernelKind::Scalar => {
            let kernel = ScalarKernel::new();
            adapt(&kernel, KernelKind::Scalar, u, dudt, u_scaled, t, h_try, settings, f)
        }
        KernelKind::Parallel => {
            let kernel = ParallelKernel::new();
            adapt(&kernel, KernelKind::Parallel, u, dudt, u_scaled, t, h_try, settings, f)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn adapt<T, K, F>(
    kernel: &K,
    kind: KernelKind,
    u: &mut [T],
    dudt: &[T],
    u_scaled: &[T],
    t: T,
    h_try: T,
    settings: &IntegrateSettings<T>,
    f: &mut F,
) -> Result<StepOutcome<T>, OdeError>
where
    T: FloatScalar,
    K: StepKernel<T>,
    F: FnMut(T, &[T], &mut [T]),
{
    let n = u.len();
    debug_assert_eq!(u_scaled.len(), n);

    let zero = T::zero();
    let one = T::one();
    let safety = T::from(0.9).unwrap();
    let order = CashKarp::ORDER as f64;
    let shrink_pow = T::from(-1.0 / order).unwrap();
    let grow_pow = T::from(-1.0 / (order + 1.0)).unwrap();
    let shrink_limit = T::from(0.1).unwrap();
    let grow_limit = T::from(5.0).unwrap();
    let scale_guard = T::from(1.0e16).unwrap();
    // Below this error the power law would grow h by more than 5×.
    let err_con = (grow_limit / safety).powf(one / grow_pow);

    let mut u_out = vec![zero; n];
    let mut u_err = vec![zero; n];
    let mut h = h_try;
    let mut rejected = 0usize;
    let mut evals = 0usize;

    let max_err = loop {
        kernel.step(u, dudt, t, h, f, &mut u_out, &mut u_err);
        evals += 5;

        let mut err_max = zero;
        for i in 0..n {
            let mut e = (u_err[i] / u_scaled[i]).abs();
            if e > scale_guard {
                e = (u_err[i] / u_out[i]).abs();
            }
            err_max = err_max.max(e);
        }
        let err = err_max / settings.tolerance;
        if err <= one {
            break err;
        }

        rejected += 1;
        let h_trial = safety * h * err.powf(shrink_pow);
        h = if h >= zero {
            h_trial.max(shrink_limit * h)
        } else {
            h_trial.min(shrink_limit * h)
        };
        log::trace!("cash-karp: rejected step at t={t:?}, err={err:?}, retry h={h:?}");

        if t + h == t {
            return Err(OdeError::StepUnderflow {
                t: t.to_f64().unwrap_or(f64::NAN),
                h: h.to_f64().unwrap_or(f64::NAN),
            });
        }
        if settings.min_step > zero && h.abs() < settings.min_step {
            return Err(OdeError::StepBelowMinimum {
                t: t.to_f64().unwrap_or(f64::NAN),
                h: h.to_f64().unwrap_or(f64::NAN),
            });
        }
    };

    let h_next = if max_err > err_con {
        safety * h * max_err.powf(grow_pow)
    } else {
        grow_limit * h
    };

    u.copy_from_slice(&u_out);

    Ok(StepOutcome {
        t: t + h,
        h_used: h,
        h_next,
        max_err,
        rejected,
        evals,
        kernel: kind,
    })
}
