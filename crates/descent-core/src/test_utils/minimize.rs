//! Reference driver loop for reverse-communication methods.

use super::functions::Function;
use crate::{
    error::{DirectionError, OptimizerResult},
    linalg::{inf_norm, SymmetricMatrix},
    location::Location,
    method::{EvaluationType, IterationType, Method},
    types::DVector,
};

/// Termination settings for [`minimize`].
#[derive(Debug, Clone)]
pub struct Settings {
    /// Stop when the infinity norm of the gradient at a major iteration
    /// drops below this value.
    pub gradient_threshold: f64,
    /// Maximum number of major iterations.
    pub major_iterations: usize,
    /// Maximum number of function evaluations.
    pub func_evaluations: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gradient_threshold: 1e-8,
            major_iterations: 1000,
            func_evaluations: 10_000,
        }
    }
}

impl Settings {
    /// Create settings with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gradient threshold.
    pub fn with_gradient_threshold(mut self, threshold: f64) -> Self {
        self.gradient_threshold = threshold;
        self
    }

    /// Set the major iteration limit.
    pub fn with_major_iterations(mut self, limit: usize) -> Self {
        self.major_iterations = limit;
        self
    }

    /// Set the function evaluation limit.
    pub fn with_func_evaluations(mut self, limit: usize) -> Self {
        self.func_evaluations = limit;
        self
    }
}

/// Why [`minimize`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The gradient threshold was reached.
    GradientThreshold,
    /// The major iteration limit was reached.
    IterationLimit,
    /// The function evaluation limit was reached.
    FunctionEvaluationLimit,
}

/// Outcome of [`minimize`].
#[derive(Debug, Clone)]
pub struct MinimizeResult {
    /// Final location.
    pub location: Location<f64>,
    /// Termination reason.
    pub status: Status,
    /// Number of major iterations.
    pub major_iterations: usize,
    /// Number of function evaluations.
    pub func_evaluations: usize,
    /// Number of gradient evaluations.
    pub grad_evaluations: usize,
    /// Number of Hessian evaluations.
    pub hess_evaluations: usize,
}

#[derive(Debug, Default)]
struct Counts {
    func: usize,
    grad: usize,
    hess: usize,
}

/// Evaluates the requested quantities at `loc.x`, leaving the others as they were.
fn evaluate<F: Function + ?Sized>(
    function: &F,
    loc: &mut Location<f64>,
    eval: EvaluationType,
    counts: &mut Counts,
) -> OptimizerResult<()> {
    let n = loc.dim();
    if eval.contains(EvaluationType::FUNC) {
        loc.f = function.value(&loc.x);
        counts.func += 1;
    }
    if eval.contains(EvaluationType::GRAD) {
        let grad = loc.gradient.get_or_insert_with(|| DVector::zeros(n));
        function.gradient(&loc.x, grad);
        counts.grad += 1;
    }
    if eval.contains(EvaluationType::HESS) {
        let hess = loc.hessian.get_or_insert_with(|| SymmetricMatrix::zeros(n));
        function.hessian(&loc.x, hess)?;
        counts.hess += 1;
    }
    Ok(())
}

/// Minimizes `function` from `x0` by driving `method` until one of the
/// limits in `settings` is met.
///
/// # Errors
///
/// Propagates every error returned by the method or by the function's
/// Hessian.
pub fn minimize<M, F>(
    method: &mut M,
    function: &F,
    x0: &DVector<f64>,
    settings: &Settings,
) -> OptimizerResult<MinimizeResult>
where
    M: Method<f64> + ?Sized,
    F: Function + ?Sized,
{
    let n = x0.len();
    DirectionError::check_len("initial point", function.dim(), n)?;

    let mut counts = Counts::default();
    let mut loc = Location::new(x0.clone());
    let initial = EvaluationType::FUNC | EvaluationType::from_needs(method.needs());
    evaluate(function, &mut loc, initial, &mut counts)?;

    let converged = |loc: &Location<f64>| {
        loc.gradient
            .as_ref()
            .is_some_and(|g| inf_norm(g) < settings.gradient_threshold)
    };
    let finish = |loc: Location<f64>, status: Status, major_iterations: usize, counts: Counts| {
        MinimizeResult {
            location: loc,
            status,
            major_iterations,
            func_evaluations: counts.func,
            grad_evaluations: counts.grad,
            hess_evaluations: counts.hess,
        }
    };

    if converged(&loc) {
        return Ok(finish(loc, Status::GradientThreshold, 0, counts));
    }

    let mut x_next = DVector::zeros(n);
    let (mut eval, _) = method.init(&loc, &mut x_next)?;
    let mut major_iterations = 0;

    loop {
        if !eval.is_none() {
            loc.x.copy_from(&x_next);
            evaluate(function, &mut loc, eval, &mut counts)?;
        }

        let (next_eval, iteration) = method.iterate(&loc, &mut x_next)?;
        if iteration == IterationType::MajorIteration {
            major_iterations += 1;
            log::debug!(
                "major iteration {}: f = {:e}, evaluations = {}",
                major_iterations,
                loc.f,
                counts.func
            );
            if converged(&loc) {
                return Ok(finish(loc, Status::GradientThreshold, major_iterations, counts));
            }
            if major_iterations >= settings.major_iterations {
                return Ok(finish(loc, Status::IterationLimit, major_iterations, counts));
            }
        }
        if counts.func >= settings.func_evaluations {
            return Ok(finish(loc, Status::FunctionEvaluationLimit, major_iterations, counts));
        }
        eval = next_eval;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        direction::{Needs, NextDirectioner},
        driver::Linesearch,
        error::DirectionResult,
        linalg::neg_to,
        test_utils::Quadratic,
    };
    use approx::assert_relative_eq;

    #[derive(Debug)]
    struct Steepest;

    impl NextDirectioner<f64> for Steepest {
        fn name(&self) -> &str {
            "steepest"
        }

        fn init_direction(&mut self, loc: &Location<f64>, dir: &mut DVector<f64>) -> DirectionResult<f64> {
            self.next_direction(loc, dir)
        }

        fn next_direction(&mut self, loc: &Location<f64>, dir: &mut DVector<f64>) -> DirectionResult<f64> {
            neg_to(dir, loc.gradient()?);
            Ok(1.0)
        }

        fn needs(&self) -> Needs {
            Needs::GRADIENT
        }
    }

    #[test]
    fn test_steepest_descent_on_diagonal_quadratic() {
        let q = Quadratic::diagonal(&[1.0, 2.0]);
        let mut method: Linesearch<f64, Steepest> = Linesearch::new(Steepest);
        let x0 = DVector::from_column_slice(&[1.0, 1.0]);

        let result = minimize(&mut method, &q, &x0, &Settings::default()).unwrap();
        assert_eq!(result.status, Status::GradientThreshold);
        assert_relative_eq!(result.location.x, DVector::zeros(2), epsilon = 1e-7);
        assert!(result.major_iterations > 1);
        assert_eq!(result.hess_evaluations, 0);
    }

    #[test]
    fn test_start_at_minimum() {
        let q = Quadratic::diagonal(&[1.0, 2.0]);
        let mut method: Linesearch<f64, Steepest> = Linesearch::new(Steepest);
        let result = minimize(&mut method, &q, &DVector::zeros(2), &Settings::default()).unwrap();
        assert_eq!(result.status, Status::GradientThreshold);
        assert_eq!(result.major_iterations, 0);
        assert_eq!(result.func_evaluations, 1);
    }

    #[test]
    fn test_iteration_limit() {
        let q = Quadratic::diagonal(&[1.0, 100.0]);
        let mut method: Linesearch<f64, Steepest> = Linesearch::new(Steepest);
        let settings = Settings::new().with_major_iterations(3);
        let x0 = DVector::from_column_slice(&[1.0, 1.0]);

        let result = minimize(&mut method, &q, &x0, &settings).unwrap();
        assert_eq!(result.status, Status::IterationLimit);
        assert_eq!(result.major_iterations, 3);
        assert!(result.location.f < q.value(&x0));
    }

    #[test]
    fn test_rejects_wrong_start_dimension() {
        let q = Quadratic::diagonal(&[1.0, 2.0]);
        let mut method: Linesearch<f64, Steepest> = Linesearch::new(Steepest);
        assert!(minimize(&mut method, &q, &DVector::zeros(3), &Settings::default()).is_err());
    }
}
