use crate::traits::FloatScalar;

use super::{OptimError, RootResult};

/// Settings for the secant method.
#[derive(Debug, Clone, Copy)]
pub struct SecantSettings<T> {
    /// Relative convergence tolerance on the update: `|x_new - x| ≤ tol·|x|`.
    pub tol: T,
    /// Maximum number of iterations.
    pub max_iter: usize,
}

impl Default for SecantSettings<f64> {
    fn default() -> Self {
        Self {
            tol: 1e-10,
            max_iter: 100,
        }
    }
}

impl Default for SecantSettings<f32> {
    fn default() -> Self {
        Self {
            tol: 1e-5,
            max_iter: 100,
        }
    }
}

/// Secant method for scalar root finding.
///
/// Iterates `x = x1 - f(x1) (x1 - x0) / (f(x1) - f(x0))`, keeping the two
/// most recent points. No bracket is required, so convergence is not
/// guaranteed, but near a simple root it is superlinear.
///
/// # Arguments
///
/// * `f` — function whose root is sought
/// * `x0`, `x1` — two distinct starting guesses
/// * `settings` — relative tolerance and iteration limit
///
/// # Errors
///
/// Returns [`OptimError::DegenerateGuess`] if `x0 == x1`.
/// Returns [`OptimError::Stalled`] if `f` is equal at both iterates.
/// Returns [`OptimError::MaxIterations`] if convergence is not achieved.
///
/// # Example
///
/// ```
/// use cashkarp::optim::{secant, SecantSettings};
///
/// // Find √2 as root of x² - 2
/// let r = secant(|x| x * x - 2.0, 1.0, 2.0, &SecantSettings::default()).unwrap();
/// assert!((r.x - core::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn secant<T: FloatScalar>(
    mut f: impl FnMut(T) -> T,
    x0: T,
    x1: T,
    settings: &SecantSettings<T>,
) -> Result<RootResult<T>, OptimError> {
    if x0 == x1 {
        return Err(OptimError::DegenerateGuess);
    }

    let zero = T::zero();
    let mut x0 = x0;
    let mut x1 = x1;

    let mut f0 = f(x0);
    if f0 == zero {
        return Ok(RootResult {
            x: x0,
            fx: f0,
            iterations: 0,
            evals: 1,
        });
    }
    let mut f1 = f(x1);
    let mut evals = 2usize;
    if f1 == zero {
        return Ok(RootResult {
            x: x1,
            fx: f1,
            iterations: 0,
            evals,
        });
    }

    // Keep |f(x1)| <= |f(x0)| so x1 is the best approximation
    if f1.abs() > f0.abs() {
        core::mem::swap(&mut x0, &mut x1);
        core::mem::swap(&mut f0, &mut f1);
    }

    for iter in 0..settings.max_iter {
        if f1 == f0 {
            return Err(OptimError::Stalled);
        }

        let x = x1 - f1 * (x1 - x0) / (f1 - f0);
        let fx = f(x);
        evals += 1;

        if fx == zero || (x - x1).abs() <= settings.tol * x1.abs() {
            return Ok(RootResult {
                x,
                fx,
                iterations: iter + 1,
                evals,
            });
        }

        x0 = x1;
        f0 = f1;
        x1 = x;
        f1 = fx;
    }

    Err(OptimError::MaxIterations)
}
