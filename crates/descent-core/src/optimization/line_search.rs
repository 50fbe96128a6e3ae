//! One-dimensional step-size searches along a fixed direction.
//!
//! A [`Linesearcher`] works on the restriction φ(α) = f(x + α d) of the
//! objective to a ray. It never sees `x` or `d`: the driver reports φ(α) and,
//! when requested, the projected gradient φ'(α) = ⟨∇f(x + α d), d⟩, and the
//! searcher answers with the next trial step.
//!
//! # Acceptance conditions
//!
//! With φ₀ = φ(0) and φ'₀ = φ'(0) < 0:
//!
//! - **Armijo (sufficient decrease)**: φ(α) ≤ φ₀ + c₁ α φ'₀
//! - **Strong Wolfe**: Armijo together with |φ'(α)| ≤ c₂ |φ'₀|
//!
//! [`Backtracking`] enforces Armijo and only needs function values.
//! [`Bisection`] enforces the strong Wolfe curvature condition with a zero
//! decrease constant measured against the best value seen so far, which is
//! the condition quasi-Newton updates rely on.
//!
//! # Example
//!
//! ```rust
//! use descent_core::line_search::{Backtracking, Linesearcher};
//!
//! // φ(α) = (α - 1)², φ(0) = 1, φ'(0) = -2
//! let mut search = Backtracking::<f64>::default();
//! search.init(1.0, -2.0, 4.0)?;
//! let trial = search.iterate(9.0, f64::NAN)?;
//! assert!(!trial.accepted);
//! assert_eq!(trial.step, 2.0);
//! # Ok::<(), descent_core::error::OptimizerError>(())
//! ```

use crate::{
    error::{OptimizerError, OptimizerResult},
    method::EvaluationType,
    types::Scalar,
};
use num_traits::Float;
use std::fmt::Debug;

/// Returns `true` if `f` satisfies the Armijo condition at `step`.
#[inline]
pub fn armijo_condition_met<T: Scalar>(f: T, f0: T, g0: T, step: T, decrease: T) -> bool {
    f <= f0 + decrease * step * g0
}

/// Returns `true` if `f` and `g` satisfy the strong Wolfe conditions at `step`.
#[inline]
pub fn strong_wolfe_conditions_met<T: Scalar>(
    f: T,
    g: T,
    f0: T,
    g0: T,
    step: T,
    decrease: T,
    curvature: T,
) -> bool {
    armijo_condition_met(f, f0, g0, step, decrease) && Float::abs(g) <= curvature * Float::abs(g0)
}

/// Outcome of one line-search iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinesearchStep<T: Scalar> {
    /// Accepted step if `accepted`, otherwise the next trial step.
    pub step: T,
    /// Quantities to evaluate at the next trial step. `NONE` when accepted.
    pub evaluation: EvaluationType,
    /// Whether the last reported trial step was accepted.
    pub accepted: bool,
}

impl<T: Scalar> LinesearchStep<T> {
    fn accept(step: T) -> Self {
        Self {
            step,
            evaluation: EvaluationType::NONE,
            accepted: true,
        }
    }

    fn trial(step: T, evaluation: EvaluationType) -> Self {
        Self {
            step,
            evaluation,
            accepted: false,
        }
    }
}

/// A step-size search driven by reported values along a ray.
pub trait Linesearcher<T: Scalar>: Debug {
    /// Starts a search from φ(0) = `value` with φ'(0) = `projected_gradient`,
    /// trying `initial_step` first.
    ///
    /// Returns the quantities to evaluate at the first trial step.
    ///
    /// # Errors
    ///
    /// Fails if `initial_step` is not positive, if `projected_gradient` is not
    /// negative, or if either value is NaN.
    fn init(&mut self, value: T, projected_gradient: T, initial_step: T)
        -> OptimizerResult<EvaluationType>;

    /// Reports φ and φ' at the current trial step.
    ///
    /// `projected_gradient` is NaN when the gradient was not requested.
    ///
    /// # Errors
    ///
    /// Returns `OptimizerError::LineSearchFailed` when no acceptable step can
    /// be found.
    fn iterate(&mut self, value: T, projected_gradient: T) -> OptimizerResult<LinesearchStep<T>>;
}

fn check_init<T: Scalar>(value: T, projected_gradient: T, initial_step: T) -> OptimizerResult<()> {
    if !(initial_step > T::zero()) {
        return Err(OptimizerError::line_search_failed(
            format!("initial step {} must be positive", initial_step),
            0,
            initial_step.try_to_f64().unwrap_or(f64::NAN),
        ));
    }
    if Float::is_nan(value) || Float::is_nan(projected_gradient) {
        return Err(OptimizerError::line_search_failed(
            "initial value or projected gradient is NaN",
            0,
            0.0,
        ));
    }
    if projected_gradient >= T::zero() {
        return Err(OptimizerError::NonDescentDirection {
            projected_gradient: projected_gradient.try_to_f64().unwrap_or(f64::NAN),
        });
    }
    Ok(())
}

/// Configuration for [`Bisection`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BisectionConfig<T: Scalar> {
    /// Constant c₂ ∈ (0, 1) of the strong Wolfe curvature condition.
    pub curvature_factor: T,
}

impl<T: Scalar> Default for BisectionConfig<T> {
    fn default() -> Self {
        Self {
            curvature_factor: <T as Scalar>::from_f64(0.9),
        }
    }
}

impl<T: Scalar> BisectionConfig<T> {
    /// Create a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the curvature factor.
    pub fn with_curvature_factor(mut self, factor: T) -> Self {
        self.curvature_factor = factor;
        self
    }

    /// Checks that the curvature factor lies in (0, 1).
    ///
    /// # Errors
    ///
    /// Returns `OptimizerError::InvalidConfiguration` otherwise.
    pub fn validate(&self) -> OptimizerResult<()> {
        let c = self.curvature_factor;
        if !(c > T::zero() && c < T::one()) {
            return Err(OptimizerError::invalid_configuration(
                "curvature factor must be in (0, 1)",
                "curvature_factor",
                c.to_string(),
            ));
        }
        Ok(())
    }
}

/// Bracketing line search that bisects until the strong Wolfe curvature
/// condition holds.
///
/// Until the minimizer along the ray is bracketed the step is doubled; after
/// that the bracket is halved. A step is accepted when its value is no larger
/// than the best value seen and its projected gradient satisfies
/// |φ'(α)| ≤ c₂ |φ'(0)|. Every trial requests both the value and the gradient.
#[derive(Debug, Clone)]
pub struct Bisection<T: Scalar> {
    config: BisectionConfig<T>,
    min_step: T,
    max_step: T,
    curr_step: T,
    init_f: T,
    min_f: T,
    max_f: T,
    init_grad: T,
    iterations: usize,
}

impl<T: Scalar> Bisection<T> {
    /// Create a bisection search with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `OptimizerError::InvalidConfiguration` for an invalid config.
    pub fn new(config: BisectionConfig<T>) -> OptimizerResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BisectionConfig<T> {
        &self.config
    }

    fn evaluation() -> EvaluationType {
        EvaluationType::FUNC | EvaluationType::GRAD
    }

    fn next_step(&mut self, step: T) -> OptimizerResult<LinesearchStep<T>> {
        if step == self.curr_step {
            return Err(OptimizerError::line_search_failed(
                "bisection step stopped changing",
                self.iterations,
                step.try_to_f64().unwrap_or(f64::NAN),
            ));
        }
        self.curr_step = step;
        log::trace!("bisection trial step {}", step);
        Ok(LinesearchStep::trial(step, Self::evaluation()))
    }

    /// Smallest of the initial value and the values at the bracket ends.
    /// NaN entries (unset bounds) are ignored.
    fn best_value(&self) -> T {
        let mut best = self.init_f;
        if self.max_f < best {
            best = self.max_f;
        }
        if self.min_f < best {
            best = self.min_f;
        }
        best
    }
}

impl<T: Scalar> Default for Bisection<T> {
    fn default() -> Self {
        Self {
            config: BisectionConfig::default(),
            min_step: T::zero(),
            max_step: <T as Float>::infinity(),
            curr_step: T::zero(),
            init_f: <T as Float>::nan(),
            min_f: <T as Float>::nan(),
            max_f: <T as Float>::nan(),
            init_grad: <T as Float>::nan(),
            iterations: 0,
        }
    }
}

impl<T: Scalar> Linesearcher<T> for Bisection<T> {
    fn init(
        &mut self,
        value: T,
        projected_gradient: T,
        initial_step: T,
    ) -> OptimizerResult<EvaluationType> {
        check_init(value, projected_gradient, initial_step)?;
        self.min_step = T::zero();
        self.max_step = <T as Float>::infinity();
        self.curr_step = initial_step;
        self.init_f = value;
        self.min_f = value;
        self.max_f = <T as Float>::nan();
        self.init_grad = projected_gradient;
        self.iterations = 0;
        Ok(Self::evaluation())
    }

    fn iterate(&mut self, value: T, projected_gradient: T) -> OptimizerResult<LinesearchStep<T>> {
        self.iterations += 1;
        let (f, g) = (value, projected_gradient);

        if strong_wolfe_conditions_met(
            f,
            g,
            self.best_value(),
            self.init_grad,
            self.curr_step,
            T::zero(),
            self.config.curvature_factor,
        ) {
            log::debug!(
                "bisection accepted step {} after {} trials",
                self.curr_step,
                self.iterations
            );
            return Ok(LinesearchStep::accept(self.curr_step));
        }

        let two = <T as Scalar>::from_f64(2.0);

        if Float::is_infinite(self.max_step) {
            // No upper bound yet.
            if g < T::zero() && f <= self.min_f {
                self.min_step = self.curr_step;
                self.min_f = f;
                return self.next_step(self.curr_step * two);
            }
            self.max_step = self.curr_step;
            self.max_f = f;
            return self.next_step((self.min_step + self.max_step) / two);
        }

        if g < T::zero() && f <= self.min_f {
            self.min_step = self.curr_step;
            self.min_f = f;
        } else {
            self.max_step = self.curr_step;
            self.max_f = f;
        }
        self.next_step((self.min_step + self.max_step) / two)
    }
}

/// Configuration for [`Backtracking`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BacktrackingConfig<T: Scalar> {
    /// Factor ρ ∈ (0, 1) applied to the step after each rejected trial.
    pub contraction: T,
    /// Armijo constant c₁ ∈ (0, 1).
    pub decrease: T,
}

impl<T: Scalar> Default for BacktrackingConfig<T> {
    fn default() -> Self {
        Self {
            contraction: <T as Scalar>::from_f64(0.5),
            decrease: <T as Scalar>::from_f64(1e-4),
        }
    }
}

impl<T: Scalar> BacktrackingConfig<T> {
    /// Create a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the contraction factor.
    pub fn with_contraction(mut self, contraction: T) -> Self {
        self.contraction = contraction;
        self
    }

    /// Set the Armijo constant.
    pub fn with_decrease(mut self, decrease: T) -> Self {
        self.decrease = decrease;
        self
    }

    /// Checks that both factors lie in (0, 1).
    ///
    /// # Errors
    ///
    /// Returns `OptimizerError::InvalidConfiguration` otherwise.
    pub fn validate(&self) -> OptimizerResult<()> {
        let in_unit = |v: T| v > T::zero() && v < T::one();
        if !in_unit(self.contraction) {
            return Err(OptimizerError::invalid_configuration(
                "contraction factor must be in (0, 1)",
                "contraction",
                self.contraction.to_string(),
            ));
        }
        if !in_unit(self.decrease) {
            return Err(OptimizerError::invalid_configuration(
                "decrease factor must be in (0, 1)",
                "decrease",
                self.decrease.to_string(),
            ));
        }
        Ok(())
    }
}

/// Backtracking search enforcing the Armijo condition.
///
/// Only function values are requested, so the driver has to ask for the
/// gradient separately once a step is accepted.
#[derive(Debug, Clone)]
pub struct Backtracking<T: Scalar> {
    config: BacktrackingConfig<T>,
    step: T,
    init_f: T,
    init_grad: T,
    iterations: usize,
}

impl<T: Scalar> Backtracking<T> {
    /// Create a backtracking search with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `OptimizerError::InvalidConfiguration` for an invalid config.
    pub fn new(config: BacktrackingConfig<T>) -> OptimizerResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BacktrackingConfig<T> {
        &self.config
    }
}

impl<T: Scalar> Default for Backtracking<T> {
    fn default() -> Self {
        Self {
            config: BacktrackingConfig::default(),
            step: T::zero(),
            init_f: <T as Float>::nan(),
            init_grad: <T as Float>::nan(),
            iterations: 0,
        }
    }
}

impl<T: Scalar> Linesearcher<T> for Backtracking<T> {
    fn init(
        &mut self,
        value: T,
        projected_gradient: T,
        initial_step: T,
    ) -> OptimizerResult<EvaluationType> {
        check_init(value, projected_gradient, initial_step)?;
        self.step = initial_step;
        self.init_f = value;
        self.init_grad = projected_gradient;
        self.iterations = 0;
        Ok(EvaluationType::FUNC)
    }

    fn iterate(&mut self, value: T, _projected_gradient: T) -> OptimizerResult<LinesearchStep<T>> {
        self.iterations += 1;
        if armijo_condition_met(
            value,
            self.init_f,
            self.init_grad,
            self.step,
            self.config.decrease,
        ) {
            log::debug!(
                "backtracking accepted step {} after {} trials",
                self.step,
                self.iterations
            );
            return Ok(LinesearchStep::accept(self.step));
        }

        self.step *= self.config.contraction;
        if self.step < T::MIN_STEP_SIZE {
            return Err(OptimizerError::line_search_failed(
                "step size fell below the minimum",
                self.iterations,
                self.step.try_to_f64().unwrap_or(f64::NAN),
            ));
        }
        log::trace!("backtracking trial step {}", self.step);
        Ok(LinesearchStep::trial(self.step, EvaluationType::FUNC))
    }
}
