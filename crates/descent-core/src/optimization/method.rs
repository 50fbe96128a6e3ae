//! Reverse-communication interface between a method and its caller.
//!
//! A [`Method`] never evaluates the objective itself. Each call writes the
//! next point of interest into a caller-supplied buffer and returns an
//! [`EvaluationType`] saying what the caller must compute there, together
//! with an [`IterationType`] describing the point that was just processed.
//! Deciding when to stop is entirely up to the caller.

use crate::{
    direction::Needs,
    error::OptimizerResult,
    location::Location,
    types::{DVector, Scalar},
};
use std::{
    fmt::{self, Debug},
    ops::{BitOr, BitOrAssign},
};

/// Set of quantities the caller must evaluate at the next point.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EvaluationType(u8);

impl EvaluationType {
    /// Nothing needs to be evaluated.
    pub const NONE: Self = Self(0);
    /// The objective value.
    pub const FUNC: Self = Self(1);
    /// The gradient.
    pub const GRAD: Self = Self(1 << 1);
    /// The Hessian.
    pub const HESS: Self = Self(1 << 2);

    /// Returns `true` if every quantity in `other` is also in `self`.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no quantity is requested.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Returns the quantities in `self` that are not in `other`.
    #[inline]
    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Returns the derivative evaluations implied by `needs`.
    pub fn from_needs(needs: Needs) -> Self {
        let mut eval = Self::NONE;
        if needs.gradient {
            eval |= Self::GRAD;
        }
        if needs.hessian {
            eval |= Self::HESS;
        }
        eval
    }
}

impl BitOr for EvaluationType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for EvaluationType {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl Debug for EvaluationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return f.write_str("NONE");
        }
        let names = [(Self::FUNC, "FUNC"), (Self::GRAD, "GRAD"), (Self::HESS, "HESS")];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Kind of iteration just completed by a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IterationType {
    /// No iteration was completed.
    NoIteration,
    /// An intermediate trial point was produced (e.g. inside a line search).
    MinorIteration,
    /// The current location was accepted as a new iterate; the caller may
    /// check convergence before calling the method again.
    MajorIteration,
}

/// An optimization method driven by its caller.
pub trait Method<T: Scalar>: Debug {
    /// Starts a run at `loc`, which must hold every quantity listed by
    /// [`needs`](Self::needs) plus the objective value.
    ///
    /// Writes the first trial point into `x_next`.
    fn init(
        &mut self,
        loc: &Location<T>,
        x_next: &mut DVector<T>,
    ) -> OptimizerResult<(EvaluationType, IterationType)>;

    /// Continues the run. `loc` must hold the quantities requested by the
    /// previous call, evaluated at the point written to `x_next`.
    fn iterate(
        &mut self,
        loc: &Location<T>,
        x_next: &mut DVector<T>,
    ) -> OptimizerResult<(EvaluationType, IterationType)>;

    /// Derivative information required at accepted points.
    fn needs(&self) -> Needs;
}
