//! Scalar root finding.
//!
//! No-alloc; requires the [`FloatScalar`](crate::FloatScalar) bound
//! (real-valued only).
//!
//! - [`secant`] — secant method from two starting guesses, no bracket or
//!   derivative required

mod secant;


pub use secant::{secant, SecantSettings};

/// Errors from root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptimError {
    /// Maximum number of iterations exceeded.
    MaxIterations,
    /// The two starting guesses are equal.
    DegenerateGuess,
    /// `f` took the same value at both iterates, so the secant is flat.
    Stalled,
}

impl core::fmt::Display for OptimError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OptimError::MaxIterations => write!(f, "maximum iterations exceeded"),
            OptimError::DegenerateGuess => write!(f, "starting guesses must differ"),
            OptimError::Stalled => write!(f, "secant is flat: f(x0) == f(x1)"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OptimError {}

/// Result of a scalar root-finding algorithm.
#[derive(Debug, Clone, Copy)]
pub struct RootResult<T> {
    /// Approximate root.
    pub x: T,
    /// Function value at the last evaluated iterate.
    pub fx: T,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Number of function evaluations.
    pub evals: usize,
}
