//! Modified Newton search directions.
//!
//! The Newton direction solves `H d = -g`. Far from a minimizer the Hessian
//! may be indefinite, in which case that direction need not point downhill.
//! This strategy instead solves with `H + τ I`, choosing the smallest shift
//! `τ ≥ 0` from a geometric sequence for which a Cholesky factorization
//! succeeds.
//!
//! # Regularization
//!
//! For each direction:
//!
//! ```text
//! if min(diag H) > 0:  τ = 0
//! elif τ == 0:         τ = -min(diag H) + initial_shift
//! repeat up to max_modifications times:
//!     if Cholesky(H + τ I) succeeds: return d = -(H + τ I)⁻¹ g
//!     τ = max(increase · τ, initial_shift)
//! return d = -g
//! ```
//!
//! A non-zero `τ` is carried over to the next direction, so a run that needed
//! regularization once starts the next search from the shift that worked.
//! The shift is always added to the diagonal of the supplied Hessian, never
//! to a previously shifted copy.
//!
//! # References
//!
//! - Nocedal & Wright, "Numerical Optimization", 2nd ed., §3.4

use descent_core::{
    direction::{Needs, NextDirectioner},
    driver::Linesearch,
    error::{DirectionError, DirectionResult, OptimizerError, OptimizerResult},
    line_search::Linesearcher,
    linalg::{neg_to, CholeskyFactor, SymmetricMatrix},
    location::Location,
    types::{DVector, Scalar},
};
use num_traits::Float;

/// Configuration for the modified Newton strategy
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewtonConfig<T: Scalar> {
    /// Growth factor of the diagonal shift after a failed factorization
    pub increase: T,
    /// Maximum number of factorization attempts per direction
    pub max_modifications: usize,
    /// Smallest non-zero diagonal shift
    pub initial_shift: T,
}

impl<T: Scalar> Default for NewtonConfig<T> {
    fn default() -> Self {
        Self {
            increase: <T as Scalar>::from_f64(5.0),
            max_modifications: 20,
            initial_shift: <T as Scalar>::from_f64(1e-3),
        }
    }
}

impl<T: Scalar> NewtonConfig<T> {
    /// Create a new Newton configuration with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shift growth factor
    pub fn with_increase(mut self, increase: T) -> Self {
        self.increase = increase;
        self
    }

    /// Set the maximum number of factorization attempts
    pub fn with_max_modifications(mut self, max_modifications: usize) -> Self {
        self.max_modifications = max_modifications;
        self
    }

    /// Set the smallest non-zero shift
    pub fn with_initial_shift(mut self, shift: T) -> Self {
        self.initial_shift = shift;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `OptimizerError::InvalidConfiguration` if:
    /// - `increase` is not a finite value greater than one
    /// - `max_modifications` is zero
    /// - `initial_shift` is not positive
    pub fn validate(&self) -> OptimizerResult<()> {
        if !(self.increase > T::one()) || !Float::is_finite(self.increase) {
            return Err(OptimizerError::invalid_configuration(
                "increase must be a finite value greater than 1",
                "increase",
                self.increase.to_string(),
            ));
        }
        if self.max_modifications == 0 {
            return Err(OptimizerError::invalid_configuration(
                "at least one factorization attempt is required",
                "max_modifications",
                "0",
            ));
        }
        if !(self.initial_shift > T::zero()) || !Float::is_finite(self.initial_shift) {
            return Err(OptimizerError::invalid_configuration(
                "initial shift must be positive",
                "initial_shift",
                self.initial_shift.to_string(),
            ));
        }
        Ok(())
    }
}

/// Modified Newton direction strategy.
#[derive(Debug, Clone)]
pub struct Newton<T: Scalar> {
    config: NewtonConfig<T>,
    dim: usize,
    initialized: bool,
    /// Working copy of the Hessian with a shifted diagonal
    hess: SymmetricMatrix<T>,
    chol: CholeskyFactor<T>,
    tau: T,
    fallback_count: usize,
}

impl<T: Scalar> Newton<T> {
    /// Create a Newton strategy with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `OptimizerError::InvalidConfiguration` if the configuration
    /// fails [`NewtonConfig::validate`].
    pub fn new(config: NewtonConfig<T>) -> OptimizerResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &NewtonConfig<T> {
        &self.config
    }

    /// Returns the diagonal shift used for the last direction.
    pub fn tau(&self) -> T {
        self.tau
    }

    /// Number of directions that fell back to steepest descent since the
    /// last initialization.
    pub fn fallback_count(&self) -> usize {
        self.fallback_count
    }

    /// Wraps the strategy in a line-search method using bisection.
    pub fn into_method(self) -> NewtonMethod<T> {
        Linesearch::new(self)
    }

    /// Wraps the strategy in a line-search method using `linesearcher`.
    pub fn into_method_with<L: Linesearcher<T>>(self, linesearcher: L) -> Linesearch<T, Self, L> {
        Linesearch::with_linesearcher(self, linesearcher)
    }
}

impl<T: Scalar> Default for Newton<T> {
    fn default() -> Self {
        Self {
            config: NewtonConfig::default(),
            dim: 0,
            initialized: false,
            hess: SymmetricMatrix::zeros(0),
            chol: CholeskyFactor::new(0),
            tau: T::zero(),
            fallback_count: 0,
        }
    }
}

impl<T: Scalar> NextDirectioner<T> for Newton<T> {
    fn name(&self) -> &str {
        "Newton"
    }

    fn init_direction(&mut self, loc: &Location<T>, dir: &mut DVector<T>) -> DirectionResult<T> {
        let n = loc.dim();
        if n == 0 {
            return Err(DirectionError::EmptyProblem);
        }
        self.dim = n;
        self.hess.reuse_as(n);
        self.chol.reuse_as(n);
        self.tau = T::zero();
        self.fallback_count = 0;
        self.initialized = true;
        self.next_direction(loc, dir)
    }

    fn next_direction(&mut self, loc: &Location<T>, dir: &mut DVector<T>) -> DirectionResult<T> {
        if !self.initialized {
            return Err(DirectionError::NotInitialized);
        }
        let n = self.dim;
        let g = loc.gradient()?;
        let h = loc.hessian()?;
        DirectionError::check_len("position", n, loc.x.len())?;
        DirectionError::check_len("gradient", n, g.len())?;
        DirectionError::check_len("hessian", n, h.dim())?;
        DirectionError::check_len("direction", n, dir.len())?;

        self.hess.copy_sym(h)?;

        let min_diag = h.min_diagonal().unwrap_or_else(T::zero);
        if min_diag > T::zero() {
            self.tau = T::zero();
        } else if self.tau == T::zero() {
            self.tau = -min_diag + self.config.initial_shift;
            log::debug!(
                "Newton: smallest Hessian diagonal {} is not positive, starting shift at {}",
                min_diag,
                self.tau
            );
        }

        for attempt in 0..self.config.max_modifications {
            if self.tau != T::zero() {
                self.hess.set_shifted_diagonal(h, self.tau);
            }
            if self.chol.factorize(&self.hess) && self.chol.solve_to(dir, g) {
                dir.neg_mut();
                if attempt > 0 {
                    log::debug!("Newton: factorized after {} shifts, tau = {}", attempt, self.tau);
                }
                return Ok(T::one());
            }
            self.tau = Float::max(self.config.increase * self.tau, self.config.initial_shift);
        }

        self.fallback_count += 1;
        log::warn!(
            "Newton: no positive definite shift found in {} attempts (tau = {}), using steepest descent",
            self.config.max_modifications,
            self.tau
        );
        neg_to(dir, g);
        Ok(T::one())
    }

    fn needs(&self) -> Needs {
        Needs::GRADIENT_AND_HESSIAN
    }
}

/// Modified Newton directions with a bisection line search.
pub type NewtonMethod<T> = Linesearch<T, Newton<T>>;
