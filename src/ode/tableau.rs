// Reference:
//   J. R. Cash & A. H. Karp, "A variable order Runge-Kutta method for initial
//   value problems with rapidly varying right-hand sides", ACM TOMS 16(3),
//   pp. 201–222, 1990. <https://doi.org/10.1145/79505.79507>

use crate::traits::FloatScalar;

/// Cash-Karp 5(4) embedded Runge-Kutta Butcher tableau.
///
/// Six stages; the 4th-order weights `B` advance the solution and the error
/// weights `D = B − B̂` give `y₄ − y₅` directly, so the 5th-order solution is
/// never formed. Stored as `f64` and cast to the working type once per kernel.
pub struct CashKarp;

impl CashKarp {
    /// Nodes (abscissae).
    pub const C: [f64; 6] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 3.0 / 5.0, 1.0, 7.0 / 8.0];

    /// Stage coupling matrix, row `i` uses columns `0..i`.
    #[rustfmt::skip]
    pub const A: [[f64; 5]; 6] = [
        [0.0, 0.0, 0.0, 0.0, 0.0],
        [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0],
        [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0],
        [3.0 / 10.0, -9.0 / 10.0, 6.0 / 5.0, 0.0, 0.0],
        [-11.0 / 54.0, 5.0 / 2.0, -70.0 / 27.0, 35.0 / 27.0, 0.0],
        [1631.0 / 55296.0, 175.0 / 512.0, 575.0 / 13824.0, 44275.0 / 110592.0, 253.0 / 4096.0],
    ];

    /// 4th-order solution weights. `B[1]` and `B[4]` are zero.
    pub const B: [f64; 6] = [37.0 / 378.0, 0.0, 250.0 / 621.0, 125.0 / 594.0, 0.0, 512.0 / 1771.0];

    /// Error weights. `D[1]` is zero.
    #[rustfmt::skip]
    pub const D: [f64; 6] = [
        -0.0042937748015873,
        0.0,
        0.0186685860938579,
        -0.0341550268308081,
        -0.0193219866071429,
        0.0391022021456804,
    ];

    /// Order of the propagated solution.
    pub const ORDER: usize = 4;

    /// Number of stages.
    pub const STAGES: usize = 6;
}

/// Tableau coefficients converted to the working float type.
///
/// Built once per kernel value.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Tableau<T> {
    pub c: [T; 6],
    pub a: [[T; 5]; 6],
    pub b: [T; 6],
    pub d: [T; 6],
}

impl<T: FloatScalar> Tableau<T> {
    pub fn new() -> Self {
        let cast = |x: f64| T::from(x).unwrap();
        Self {
            c: CashKarp::C.map(cast),
            a: CashKarp::A.map(|row| row.map(cast)),
            b: CashKarp::B.map(cast),
            d: CashKarp::D.map(cast),
        }
    }
}
