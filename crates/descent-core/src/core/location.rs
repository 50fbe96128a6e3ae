//! The iterate state exchanged between a driver and a direction strategy.

use crate::{
    error::{DirectionError, DirectionResult},
    linalg::SymmetricMatrix,
    types::{DVector, Scalar},
};
use num_traits::Float;

/// A point together with the objective information evaluated there.
///
/// The driver owns and mutates the location; direction strategies only
/// borrow it and copy whatever they need to remember. Fields that have not
/// been evaluated are `None` (or NaN for the value).
#[derive(Debug, Clone, PartialEq)]
pub struct Location<T: Scalar> {
    /// Position.
    pub x: DVector<T>,
    /// Objective value at `x`.
    pub f: T,
    /// Gradient at `x`.
    pub gradient: Option<DVector<T>>,
    /// Hessian at `x`.
    pub hessian: Option<SymmetricMatrix<T>>,
}

impl<T: Scalar> Location<T> {
    /// Creates a location at `x` with nothing evaluated yet.
    pub fn new(x: DVector<T>) -> Self {
        Self {
            x,
            f: <T as Float>::nan(),
            gradient: None,
            hessian: None,
        }
    }

    /// Sets the objective value.
    pub fn with_value(mut self, f: T) -> Self {
        self.f = f;
        self
    }

    /// Sets the gradient.
    pub fn with_gradient(mut self, gradient: DVector<T>) -> Self {
        self.gradient = Some(gradient);
        self
    }

    /// Sets the Hessian.
    pub fn with_hessian(mut self, hessian: SymmetricMatrix<T>) -> Self {
        self.hessian = Some(hessian);
        self
    }

    /// Returns the problem dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.x.len()
    }

    /// Returns the gradient or `MissingGradient`.
    pub fn gradient(&self) -> DirectionResult<&DVector<T>> {
        self.gradient.as_ref().ok_or(DirectionError::MissingGradient)
    }

    /// Returns the Hessian or `MissingHessian`.
    pub fn hessian(&self) -> DirectionResult<&SymmetricMatrix<T>> {
        self.hessian.as_ref().ok_or(DirectionError::MissingHessian)
    }
}
