//! Scalar trait and dense aliases.
//!
//! Every algorithm in the workspace is generic over [`Scalar`], which is
//! implemented for `f32` and `f64`.

use nalgebra::{Dyn, OMatrix, OVector, RealField, Scalar as NalgebraScalar};
use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};

/// Floating-point type accepted by the line searches and direction strategies.
pub trait Scalar:
    NalgebraScalar
    + RealField
    + Float
    + FromPrimitive
    + Display
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Machine epsilon.
    const EPSILON: Self;

    /// Smallest step a backtracking search may try before giving up.
    const MIN_STEP_SIZE: Self;

    /// Converts a literal.
    ///
    /// # Panics
    ///
    /// Panics if `v` cannot be represented, which never happens for the
    /// finite literals used internally.
    fn from_f64(v: f64) -> Self {
        <Self as FromPrimitive>::from_f64(v).expect("f64 literal not representable")
    }

    /// Widens to `f64` for diagnostics, or `None` when the cast fails.
    fn try_to_f64(self) -> Option<f64> {
        num_traits::cast(self)
    }
}

impl Scalar for f32 {
    const EPSILON: Self = f32::EPSILON;
    const MIN_STEP_SIZE: Self = 1e-10;
}

impl Scalar for f64 {
    const EPSILON: Self = f64::EPSILON;
    const MIN_STEP_SIZE: Self = 1e-16;
}

/// Dynamically-sized matrix.
pub type DMatrix<T> = OMatrix<T, Dyn, Dyn>;

/// Dynamically-sized vector.
pub type DVector<T> = OVector<T, Dyn>;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_min_step_is_above_epsilon_squared() {
        assert!(<f32 as Scalar>::MIN_STEP_SIZE > 0.0);
        assert!(<f64 as Scalar>::MIN_STEP_SIZE > <f64 as Scalar>::EPSILON * <f64 as Scalar>::EPSILON);
        assert_eq!(<f64 as Scalar>::EPSILON, f64::EPSILON);
    }

    #[test]
    fn test_scalar_conversions() {
        let val_f32 = <f32 as Scalar>::from_f64(3.14159);
        assert_relative_eq!(val_f32 as f64, 3.14159, epsilon = 1e-6);
        assert_eq!(Scalar::try_to_f64(val_f32), Some(val_f32 as f64));
        assert!(Scalar::try_to_f64(f64::NAN).is_some_and(f64::is_nan));
    }
}
