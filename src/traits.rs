use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

/// Trait for numeric element types.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for floating-point state elements.
///
/// Required by the integrator and root finder (`abs`, `powf`, `max`, ...).
/// The `'static` bound lets the SIMD layer pick `f64` lane kernels by
/// `TypeId` at monomorphization time.
pub trait FloatScalar: Scalar + Float + 'static {}

impl<T: Scalar + Float + 'static> FloatScalar for T {}
