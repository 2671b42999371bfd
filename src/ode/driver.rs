use alloc::vec;

use super::controller::quality_step;
use super::kernel::KernelChoice;
use super::{OdeError, Trajectory};
use crate::simd::Capability;
use crate::traits::FloatScalar;

/// Settings for an adaptive Cash-Karp integration.
#[derive(Debug, Clone, Copy)]
pub struct IntegrateSettings<T> {
    /// Tolerance on the normalized per-component error (default: 1e-6).
    pub tolerance: T,
    /// Magnitude of the first trial step; the sign is taken from the
    /// direction of the span (default: 1e-2).
    pub initial_step: T,
    /// Minimum step magnitude. When positive, a rejected step shrinking
    /// below it aborts with [`OdeError::StepBelowMinimum`]; zero disables
    /// the check (default: 0).
    pub min_step: T,
    /// Step budget. The driver takes at most `max_steps + 1` steps and then
    /// returns what it has (default: 100_000).
    pub max_steps: usize,
    /// Step kernel selection (default: [`KernelChoice::Auto`]).
    pub kernel: KernelChoice,
}

impl Default for IntegrateSettings<f64> {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            initial_step: 1e-2,
            min_step: 0.0,
            max_steps: 100_000,
            kernel: KernelChoice::Auto,
        }
    }
}

impl Default for IntegrateSettings<f32> {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            initial_step: 1e-2,
            min_step: 0.0,
            max_steps: 100_000,
            kernel: KernelChoice::Auto,
        }
    }
}

/// Integrate `du/dt = f(t, u)` over `t_span` from `u0`.
///
/// `t_span = (t_start, t_end)` may run in either direction. The step starts
/// at `|initial_step|`, signed toward `t_end`. `min_step = 0` disables the
/// minimum-step abort. Uses [`KernelChoice::Auto`]; see [`integrate_with`]
/// for the full settings.
///
/// # Errors
///
/// [`OdeError::StepUnderflow`] or [`OdeError::StepBelowMinimum`] when a
/// step cannot meet the tolerance. Exhausting `max_steps` is not an error:
/// check [`Trajectory::reached`].
///
/// # Example
///
/// ```
/// use cashkarp::integrate;
///
/// // Backward: du/dt = u from t = 1 to t = 0, u(1) = e
/// let traj = integrate(
///     &[core::f64::consts::E], (1.0, 0.0), 1e-10, 0.1, 0.0, 10_000,
///     |_t, u, dudt| dudt[0] = u[0],
/// ).unwrap();
/// let (t, u) = traj.last().unwrap();
/// assert_eq!(t, 0.0);
/// assert!((u[0] - 1.0).abs() < 1e-8);
/// ```
pub fn integrate<T, F>(
    u0: &[T],
    t_span: (T, T),
    tolerance: T,
    initial_step: T,
    min_step: T,
    max_steps: usize,
    f: F,
) -> Result<Trajectory<T>, OdeError>
where
    T: FloatScalar,
    F: FnMut(T, &[T], &mut [T]),
{
    let settings = IntegrateSettings {
        tolerance,
        initial_step,
        min_step,
        max_steps,
        kernel: KernelChoice::Auto,
    };
    integrate_with(u0, t_span, &settings, f)
}

/// Integrate `du/dt = f(t, u)` over `t_span` from `u0` with explicit settings.
///
/// Each iteration evaluates the slope at the current point, builds the
/// error scale `|u| + |h du/dt| + 1e-30`, clamps `h` so the step does not
/// pass `t_end`, takes one [`quality_step`], and records the new point.
///
/// # Errors
///
/// As [`integrate`], plus [`OdeError::TooManyEquations`] when
/// `settings.kernel` forces the parallel kernel on more than
/// [`LANES`](super::LANES) equations.
pub fn integrate_with<T, F>(
    u0: &[T],
    t_span: (T, T),
    settings: &IntegrateSettings<T>,
    mut f: F,
) -> Result<Trajectory<T>, OdeError>
where
    T: FloatScalar,
    F: FnMut(T, &[T], &mut [T]),
{
    let (t_start, t_end) = t_span;
    let n = u0.len();
    let zero = T::zero();
    let tiny = T::from(1.0e-30).unwrap();

    let kernel = settings.kernel.resolve(n, Capability::detect())?;
    log::debug!(
        "cash-karp: n={n}, span=({t_start:?}, {t_end:?}), tol={:?}, kernel={kernel:?}",
        settings.tolerance
    );

    let mut traj = Trajectory::new(kernel);
    let mut t = t_start;
    let mut u = u0.to_vec();
    let mut dudt = vec![zero; n];
    let mut u_scaled = vec![zero; n];
    traj.push(t, &u);

    let mut h = if t_end - t_start >= zero {
        settings.initial_step.abs()
    } else {
        -settings.initial_step.abs()
    };

    for _ in 0..=settings.max_steps {
        f(t, &u, &mut dudt);
        traj.evals += 1;

        for i in 0..n {
            u_scaled[i] = u[i].abs() + (dudt[i] * h).abs() + tiny;
        }

        let t_next = t + h;
        if (t_next - t_end) * (t_next - t_start) > zero {
            h = t_end - t;
        }

        let step = match quality_step(&mut u, &dudt, &u_scaled, t, h, settings, &mut f) {
            Ok(step) => step,
            Err(e) => {
                log::warn!("cash-karp: integration aborted after {} steps: {e}", traj.accepted);
                return Err(e);
            }
        };
        t = step.t;
        traj.accepted += 1;
        traj.rejected += step.rejected;
        traj.evals += step.evals;
        traj.push(t, &u);

        if (t - t_end) * (t_end - t_start) >= zero {
            log::debug!(
                "cash-karp: reached t={t:?} in {} steps ({} rejected, {} evals)",
                traj.accepted,
                traj.rejected,
                traj.evals
            );
            return Ok(traj);
        }

        h = step.h_next;
    }

    log::warn!(
        "cash-karp: step limit {} reached at t={t:?} before t_end={t_end:?}",
        settings.max_steps
    );
    Ok(traj)
}
