//! ODE integration with the adaptive Cash-Karp 5(4) Runge-Kutta method.
//!
//! # Layers
//!
//! | Layer      | Entry point                      | Role |
//! |------------|----------------------------------|------|
//! | Kernel     | [`StepKernel::step`]             | One embedded step: 4th-order update + error estimate |
//! | Controller | [`quality_step`]                 | Retry with shrinking `h` until the normalized error is `≤ 1`, propose the next `h` |
//! | Driver     | [`integrate`], [`integrate_with`] | Time loop over the span, scaling, end clamping, trajectory |
//!
//! The derivative callback has the shape `f(t, u, dudt)`: it writes `du/dt`
//! at `(t, u)` into `dudt`, which has the same length as `u`. It is called
//! once per accepted step by the driver and five times per trial step by the
//! kernel, never concurrently.
//!
//! # Kernels
//!
//! | Kernel             | System size | Stage arithmetic |
//! |--------------------|-------------|------------------|
//! | [`ScalarKernel`]   | any         | per-component loops |
//! | [`ParallelKernel`] | `n ≤ 4`     | 4 lanes at once (AVX / NEON / portable); larger systems fall back to scalar loops |
//!
//! Both evaluate the Cash-Karp tableau ([`CashKarp`]) in the same order and
//! agree to the last bit. [`select_kernel`] picks the parallel kernel when
//! the system fits and the CPU has a vector unit; [`KernelChoice`] overrides.
//!
//! # Error control
//!
//! Each component's error is measured against
//! `u_scaled_i = |u_i| + |h du_i/dt| + 1e-30`, so large components neither
//! swamp nor starve small ones. A single scalar tolerance applies to every
//! normalized component. The step sign follows the direction of integration
//! and never flips.
//!
//! # Example
//!
//! ```
//! use cashkarp::ode::{integrate_with, IntegrateSettings};
//!
//! // Harmonic oscillator: y'' = -y  →  [y, y'] with dy/dt = [y', -y]
//! let tau = 2.0 * std::f64::consts::PI;
//! let settings = IntegrateSettings {
//!     tolerance: 1e-10,
//!     ..IntegrateSettings::default()
//! };
//! let traj = integrate_with(
//!     &[1.0_f64, 0.0], (0.0, tau), &settings,
//!     |_t, y, dy| { dy[0] = y[1]; dy[1] = -y[0]; },
//! ).unwrap();
//! assert!(traj.reached(tau));
//! let (_, y) = traj.last().unwrap();
//! assert!((y[0] - 1.0).abs() < 1e-6); // cos(2π) ≈ 1
//! assert!(y[1].abs() < 1e-6);         // sin(2π) ≈ 0
//! ```

mod controller;
mod driver;
mod kernel;
mod tableau;

use alloc::vec::Vec;
use core::fmt;

use crate::traits::FloatScalar;


pub use crate::simd::{Capability, LANES};
pub use controller::{quality_step, StepOutcome};
pub use driver::{integrate, integrate_with, IntegrateSettings};
pub use kernel::{select_kernel, KernelChoice, KernelKind, ParallelKernel, ScalarKernel, StepKernel};
pub use tableau::CashKarp;

/// Errors from ODE integration.
///
/// All are fatal: the integration is abandoned and no trajectory is returned.
/// Running out of steps is not an error; see [`Trajectory::reached`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OdeError {
    /// The step size shrank until `t + h == t`: the tolerance cannot be met
    /// (stiff system or tolerance too tight for the method).
    StepUnderflow { t: f64, h: f64 },
    /// The step size shrank below the configured minimum step.
    StepBelowMinimum { t: f64, h: f64 },
    /// The parallel kernel was requested for more than [`LANES`] equations.
    TooManyEquations { n: usize },
}

impl fmt::Display for OdeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StepUnderflow { t, h } => {
                write!(f, "step size underflow at t = {t}: h = {h} no longer changes t")
            }
            Self::StepBelowMinimum { t, h } => {
                write!(f, "step size {h} at t = {t} is below the minimum step")
            }
            Self::TooManyEquations { n } => {
                write!(f, "parallel kernel supports at most {LANES} equations, got {n}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OdeError {}

/// Result of an integration run: index-aligned times and states.
///
/// `u[i]` is the state at `t[i]`. The first entry is the initial condition;
/// each accepted step appends one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory<T> {
    /// Independent variable at each recorded point.
    pub t: Vec<T>,
    /// State vector at each recorded point.
    pub u: Vec<Vec<T>>,
    /// Total derivative evaluations.
    pub evals: usize,
    /// Accepted steps.
    pub accepted: usize,
    /// Rejected trial steps.
    pub rejected: usize,
    /// Kernel selected for the run.
    pub kernel: KernelKind,
}

impl<T: FloatScalar> Trajectory<T> {
    pub(crate) fn new(kernel: KernelKind) -> Self {
        Self {
            t: Vec::new(),
            u: Vec::new(),
            evals: 0,
            accepted: 0,
            rejected: 0,
            kernel,
        }
    }

    pub(crate) fn push(&mut self, t: T, u: &[T]) {
        self.t.push(t);
        self.u.push(u.to_vec());
    }

    /// Number of recorded points.
    #[inline]
    pub fn len(&self) -> usize {
        self.t.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Last recorded `(t, u)`.
    pub fn last(&self) -> Option<(T, &[T])> {
        let t = *self.t.last()?;
        let u = self.u.last()?;
        Some((t, u.as_slice()))
    }

    /// Whether the last recorded point reached or passed `t_end`, in the
    /// direction of integration.
    ///
    /// `false` means the run stopped at the step limit before covering the
    /// span.
    pub fn reached(&self, t_end: T) -> bool {
        match (self.t.first(), self.t.last()) {
            (Some(&t0), Some(&t1)) => (t1 - t_end) * (t_end - t0) >= T::zero(),
            _ => false,
        }
    }

    /// Iterate over recorded `(t, u)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (T, &[T])> + '_ {
        self.t.iter().copied().zip(self.u.iter().map(|u| u.as_slice()))
    }
}
