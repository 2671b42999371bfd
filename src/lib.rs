//! # cashkarp
//!
//! Adaptive Cash-Karp Runge-Kutta integration for systems of first-order
//! ODEs, no-std compatible (requires `alloc`). Deterministic and
//! single-threaded, suitable for simulation kernels and control-system models.
//!
//! ## Quick start
//!
//! ```
//! use cashkarp::integrate;
//!
//! // du/dt = -u, u(0) = 1  →  u(t) = e^{-t}
//! let traj = integrate(
//!     &[1.0_f64],
//!     (0.0, 2.0),
//!     1e-10,       // tolerance
//!     0.1,         // initial step
//!     0.0,         // minimum step (0 disables the check)
//!     10_000,      // max steps
//!     |_t, u, dudt| dudt[0] = -u[0],
//! ).unwrap();
//!
//! let (t, u) = traj.last().unwrap();
//! assert_eq!(t, 2.0);
//! assert!((u[0] - (-2.0_f64).exp()).abs() < 1e-8);
//! ```
//!
//! ## Modules
//!
//! - [`ode`] — The Cash-Karp 5(4) embedded step kernel in scalar and
//!   data-parallel forms ([`ode::ScalarKernel`], [`ode::ParallelKernel`]),
//!   the adaptive step controller ([`ode::quality_step`]), and the
//!   integration driver ([`integrate`], [`integrate_with`]).
//!
//! - [`optim`] — Secant-method scalar root finding. Requires `optim` feature.
//!
//! - [`traits`] — Element trait hierarchy:
//!   - [`Scalar`] — numeric elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`] — real floats (`Scalar + Float`), used by every solver
//!
//! ## SIMD
//!
//! For systems of at most 4 equations the step kernel can evaluate all
//! components of a stage at once: AVX on x86_64 (detected at runtime with
//! `std`, from `target_feature` otherwise) and NEON on aarch64. Selection is
//! automatic per controller call; see [`ode::select_kernel`] and
//! [`ode::KernelChoice`].
//!
//! ## Cargo features
//!
//! | Feature   | Default  | Description |
//! |-----------|----------|-------------|
//! | `std`     | yes      | Hardware FPU via system libm, runtime CPU feature detection |
//! | `optim`   | no       | Secant root finder |
//! | `all`     | no       | All features: `std` + `optim` |
//!
//! Without `std`, float functions come from the pure-Rust `libm` backend of
//! `num-traits`, which is always enabled.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod ode;
#[cfg(feature = "optim")]
pub mod optim;
mod simd;
pub mod traits;

pub use ode::{integrate, integrate_with, IntegrateSettings, OdeError, Trajectory};
pub use traits::{FloatScalar, Scalar};
