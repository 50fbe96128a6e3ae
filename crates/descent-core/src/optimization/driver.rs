//! Line-search method built from a direction strategy and a step search.
//!
//! [`Linesearch`] turns any [`NextDirectioner`] into a [`Method`]. Each major
//! iteration asks the strategy for a direction `d` and a step scale, then
//! hands the one-dimensional search along `x + α d` to a [`Linesearcher`].
//! Accepted points are reported as [`IterationType::MajorIteration`]; trial
//! points inside the search are reported as minor iterations.

use crate::{
    direction::{Needs, NextDirectioner},
    error::{DirectionError, OptimizerError, OptimizerResult},
    line_search::{Bisection, LinesearchStep, Linesearcher},
    linalg::add_scaled_to,
    location::Location,
    memory::Reusable,
    method::{EvaluationType, IterationType, Method},
    types::{DVector, Scalar},
};
use num_traits::Float;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Uninitialized,
    /// A line search is in progress.
    Searching,
    /// A step was accepted; waiting for derivatives the strategy needs.
    Completing,
    /// A step was accepted and reported; the next call starts a new search.
    Accepted,
}

/// A [`Method`] that searches along directions produced by `D` using the
/// step search `L`.
///
/// The method keeps a copy of the point each search starts from and the
/// current direction. Both are resized in [`Method::init`] and reused for the
/// rest of the run.
#[derive(Debug, Clone)]
pub struct Linesearch<T: Scalar, D, L = Bisection<T>> {
    directioner: D,
    linesearcher: L,
    x: DVector<T>,
    dir: DVector<T>,
    requested: EvaluationType,
    state: State,
}

impl<T, D, L> Linesearch<T, D, L>
where
    T: Scalar,
    D: NextDirectioner<T>,
    L: Linesearcher<T>,
{
    /// Create a method from a direction strategy and a step search.
    pub fn with_linesearcher(directioner: D, linesearcher: L) -> Self {
        Self {
            directioner,
            linesearcher,
            x: DVector::zeros(0),
            dir: DVector::zeros(0),
            requested: EvaluationType::NONE,
            state: State::Uninitialized,
        }
    }

    /// Returns the direction strategy.
    pub fn directioner(&self) -> &D {
        &self.directioner
    }

    /// Returns the direction strategy mutably.
    pub fn directioner_mut(&mut self) -> &mut D {
        &mut self.directioner
    }

    /// Returns the step search.
    pub fn linesearcher(&self) -> &L {
        &self.linesearcher
    }

    /// Returns the current search direction.
    pub fn direction(&self) -> &DVector<T> {
        &self.dir
    }

    /// Consumes the method and returns the direction strategy.
    pub fn into_directioner(self) -> D {
        self.directioner
    }

    fn start_search(
        &mut self,
        loc: &Location<T>,
        x_next: &mut DVector<T>,
        step: T,
    ) -> OptimizerResult<(EvaluationType, IterationType)> {
        self.x.copy_from(&loc.x);
        let projected = loc.gradient()?.dot(&self.dir);
        if !(projected < T::zero()) {
            return Err(OptimizerError::NonDescentDirection {
                projected_gradient: projected.try_to_f64().unwrap_or(f64::NAN),
            });
        }

        let evaluation = self.linesearcher.init(loc.f, projected, step)?;
        self.take_step(x_next, step)?;
        self.requested = evaluation;
        self.state = State::Searching;
        Ok((evaluation, IterationType::MinorIteration))
    }

    fn take_step(&self, x_next: &mut DVector<T>, step: T) -> OptimizerResult<()> {
        add_scaled_to(x_next, &self.x, step, &self.dir);
        if *x_next == self.x {
            return Err(OptimizerError::NoProgress);
        }
        Ok(())
    }
}

impl<T, D, L> Linesearch<T, D, L>
where
    T: Scalar,
    D: NextDirectioner<T>,
    L: Linesearcher<T> + Default,
{
    /// Create a method using the default-configured step search `L`.
    pub fn new(directioner: D) -> Self {
        Self::with_linesearcher(directioner, L::default())
    }
}

impl<T, D, L> Method<T> for Linesearch<T, D, L>
where
    T: Scalar,
    D: NextDirectioner<T>,
    L: Linesearcher<T>,
{
    fn init(
        &mut self,
        loc: &Location<T>,
        x_next: &mut DVector<T>,
    ) -> OptimizerResult<(EvaluationType, IterationType)> {
        let n = loc.dim();
        DirectionError::check_len("next position", n, x_next.len())?;
        self.state = State::Uninitialized;
        self.x.reuse_as(n);
        self.dir.reuse_as(n);

        let step = self.directioner.init_direction(loc, &mut self.dir)?;
        log::debug!(
            "{}: starting line search in dimension {} with step scale {}",
            self.directioner.name(),
            n,
            step
        );
        self.start_search(loc, x_next, step)
    }

    fn iterate(
        &mut self,
        loc: &Location<T>,
        x_next: &mut DVector<T>,
    ) -> OptimizerResult<(EvaluationType, IterationType)> {
        match self.state {
            State::Uninitialized => Err(DirectionError::NotInitialized.into()),
            State::Completing => {
                self.state = State::Accepted;
                Ok((EvaluationType::NONE, IterationType::MajorIteration))
            }
            State::Accepted => {
                let step = self.directioner.next_direction(loc, &mut self.dir)?;
                self.start_search(loc, x_next, step)
            }
            State::Searching => {
                let projected = if self.requested.contains(EvaluationType::GRAD) {
                    loc.gradient()?.dot(&self.dir)
                } else {
                    <T as Float>::nan()
                };

                let LinesearchStep {
                    step,
                    evaluation,
                    accepted,
                } = self.linesearcher.iterate(loc.f, projected)?;

                if accepted {
                    let missing =
                        EvaluationType::from_needs(self.directioner.needs()).difference(self.requested);
                    if missing.is_none() {
                        self.state = State::Accepted;
                        return Ok((EvaluationType::NONE, IterationType::MajorIteration));
                    }
                    x_next.copy_from(&loc.x);
                    self.requested = missing;
                    self.state = State::Completing;
                    return Ok((missing, IterationType::NoIteration));
                }

                self.take_step(x_next, step)?;
                self.requested = evaluation;
                Ok((evaluation, IterationType::MinorIteration))
            }
        }
    }

    fn needs(&self) -> Needs {
        self.directioner.needs()
    }
}
