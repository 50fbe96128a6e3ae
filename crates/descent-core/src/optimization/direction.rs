//! Search-direction strategies.
//!
//! A direction strategy turns the current [`Location`] into a search
//! direction and an initial step-size scale. It is driven by a line-search
//! loop (see [`Linesearch`](crate::driver::Linesearch)) which calls
//! [`init_direction`](NextDirectioner::init_direction) once per run and
//! [`next_direction`](NextDirectioner::next_direction) after every accepted
//! step.

use crate::{
    error::DirectionResult,
    location::Location,
    types::{DVector, Scalar},
};
use std::fmt::Debug;

/// Derivative information a method requires at every accepted point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Needs {
    /// The gradient must be supplied.
    pub gradient: bool,
    /// The Hessian must be supplied.
    pub hessian: bool,
}

impl Needs {
    /// Gradient only.
    pub const GRADIENT: Self = Self {
        gradient: true,
        hessian: false,
    };

    /// Gradient and Hessian.
    pub const GRADIENT_AND_HESSIAN: Self = Self {
        gradient: true,
        hessian: true,
    };
}

/// A strategy that computes search directions for a line search.
///
/// Implementations keep internal scratch state between calls and are
/// therefore single-owner: one instance must not be shared between
/// concurrent optimization runs.
pub trait NextDirectioner<T: Scalar>: Debug {
    /// Returns the name of the strategy.
    fn name(&self) -> &str;

    /// Starts a new run at `loc`.
    ///
    /// (Re)initializes all internal state for the dimension of `loc`, writes
    /// the first search direction into `dir` and returns the scale of the
    /// first trial step.
    ///
    /// # Errors
    ///
    /// Returns a [`DirectionError`](crate::error::DirectionError) when `loc`
    /// is empty, lacks required derivatives, or `dir` has the wrong length.
    fn init_direction(&mut self, loc: &Location<T>, dir: &mut DVector<T>) -> DirectionResult<T>;

    /// Computes the direction for the next major iteration.
    ///
    /// `loc` is the point accepted by the last line search. Writes the new
    /// direction into `dir` and returns the scale of the first trial step.
    ///
    /// # Errors
    ///
    /// Returns a [`DirectionError`](crate::error::DirectionError) when the
    /// sizes of `loc` or `dir` differ from the dimension established by
    /// [`init_direction`](Self::init_direction).
    fn next_direction(&mut self, loc: &Location<T>, dir: &mut DVector<T>) -> DirectionResult<T>;

    /// Declares which derivatives the strategy reads from a location.
    fn needs(&self) -> Needs;
}

impl<T: Scalar, D: NextDirectioner<T> + ?Sized> NextDirectioner<T> for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn init_direction(&mut self, loc: &Location<T>, dir: &mut DVector<T>) -> DirectionResult<T> {
        (**self).init_direction(loc, dir)
    }

    fn next_direction(&mut self, loc: &Location<T>, dir: &mut DVector<T>) -> DirectionResult<T> {
        (**self).next_direction(loc, dir)
    }

    fn needs(&self) -> Needs {
        (**self).needs()
    }
}
