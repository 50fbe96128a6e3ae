//! Integration tests for the line-search driver and the test utilities.

use descent_core::{
    direction::{Needs, NextDirectioner},
    driver::Linesearch,
    error::{DirectionResult, OptimizerError},
    line_search::{Backtracking, BacktrackingConfig, Bisection, BisectionConfig},
    linalg::neg_to,
    location::Location,
    method::{EvaluationType, Method},
    test_utils::{
        check_gradient, check_hessian, minimize, BrownBadlyScaled, Function, Quadratic, Rosenbrock,
        Settings, Status,
    },
    types::DVector,
};

/// Steepest descent with a unit initial step.
#[derive(Debug, Default)]
struct SteepestDescent {
    calls: usize,
}

impl NextDirectioner<f64> for SteepestDescent {
    fn name(&self) -> &str {
        "steepest descent"
    }

    fn init_direction(&mut self, loc: &Location<f64>, dir: &mut DVector<f64>) -> DirectionResult<f64> {
        self.calls = 0;
        self.next_direction(loc, dir)
    }

    fn next_direction(&mut self, loc: &Location<f64>, dir: &mut DVector<f64>) -> DirectionResult<f64> {
        self.calls += 1;
        neg_to(dir, loc.gradient()?);
        Ok(1.0)
    }

    fn needs(&self) -> Needs {
        Needs::GRADIENT
    }
}

#[test]
fn test_bisection_and_backtracking_on_quadratic() {
    let q = Quadratic::diagonal(&[1.0, 3.0]);
    let x0 = DVector::from_column_slice(&[1.0, 1.0]);

    let mut bisection: Linesearch<f64, _, Bisection<f64>> = Linesearch::new(SteepestDescent::default());
    let result = minimize(&mut bisection, &q, &x0, &Settings::default()).unwrap();
    assert_eq!(result.status, Status::GradientThreshold);
    assert!(result.location.x.amax() < 1e-8);
    assert_eq!(bisection.directioner().calls, result.major_iterations);

    let backtracking = Backtracking::new(BacktrackingConfig::new().with_contraction(0.5)).unwrap();
    let mut method = Linesearch::with_linesearcher(SteepestDescent::default(), backtracking);
    let result = minimize(&mut method, &q, &x0, &Settings::default()).unwrap();
    assert_eq!(result.status, Status::GradientThreshold);
    assert!(result.location.x.amax() < 1e-8);
}

#[test]
fn test_backtracking_requests_only_values() {
    let loc = Location::new(DVector::from_column_slice(&[1.0, 1.0]))
        .with_value(2.0)
        .with_gradient(DVector::from_column_slice(&[1.0, 3.0]));
    let mut method = Linesearch::with_linesearcher(SteepestDescent::default(), Backtracking::default());
    let mut x_next = DVector::zeros(2);

    let (evaluation, _) = method.init(&loc, &mut x_next).unwrap();
    assert_eq!(evaluation, EvaluationType::FUNC);
    assert_eq!(x_next, DVector::from_column_slice(&[0.0, -2.0]));
}

#[test]
fn test_steepest_descent_stops_at_iteration_limit() {
    let f = Rosenbrock::new(2);
    let x0 = DVector::from_column_slice(&[-1.2, 1.0]);
    let settings = Settings::new().with_major_iterations(100);
    let mut method: Linesearch<f64, _> = Linesearch::new(SteepestDescent::default());

    let result = minimize(&mut method, &f, &x0, &settings).unwrap();

    assert_eq!(result.status, Status::IterationLimit);
    assert_eq!(result.major_iterations, 100);
    assert!(result.location.f < f.value(&x0));
    assert!(result.func_evaluations > result.major_iterations);
}

#[test]
fn test_function_evaluation_limit() {
    let f = Rosenbrock::new(2);
    let x0 = DVector::from_column_slice(&[-1.2, 1.0]);
    let settings = Settings::new().with_func_evaluations(20);
    let mut method: Linesearch<f64, _> = Linesearch::new(SteepestDescent::default());

    let result = minimize(&mut method, &f, &x0, &settings).unwrap();

    assert_eq!(result.status, Status::FunctionEvaluationLimit);
    assert_eq!(result.func_evaluations, 20);
}

#[test]
fn test_strategy_without_hessian_support() {
    // The reference loop asks for a Hessian the function cannot provide.
    #[derive(Debug)]
    struct NeedsHessian;

    impl NextDirectioner<f64> for NeedsHessian {
        fn name(&self) -> &str {
            "needs hessian"
        }

        fn init_direction(&mut self, loc: &Location<f64>, dir: &mut DVector<f64>) -> DirectionResult<f64> {
            self.next_direction(loc, dir)
        }

        fn next_direction(&mut self, loc: &Location<f64>, dir: &mut DVector<f64>) -> DirectionResult<f64> {
            loc.hessian()?;
            neg_to(dir, loc.gradient()?);
            Ok(1.0)
        }

        fn needs(&self) -> Needs {
            Needs::GRADIENT_AND_HESSIAN
        }
    }

    #[derive(Debug)]
    struct GradientOnly;

    impl Function for GradientOnly {
        fn name(&self) -> &str {
            "gradient only"
        }

        fn dim(&self) -> usize {
            1
        }

        fn value(&self, x: &DVector<f64>) -> f64 {
            x[0] * x[0]
        }

        fn gradient(&self, x: &DVector<f64>, grad: &mut DVector<f64>) {
            grad[0] = 2.0 * x[0];
        }
    }

    let mut method: Linesearch<f64, _> = Linesearch::new(NeedsHessian);
    let err = minimize(&mut method, &GradientOnly, &DVector::from_element(1, 1.0), &Settings::default())
        .unwrap_err();
    assert!(matches!(err, OptimizerError::Direction(_)));
}

#[test]
fn test_invalid_step_search_configuration() {
    assert!(Bisection::<f64>::new(BisectionConfig::new().with_curvature_factor(1.0)).is_err());
    assert!(Backtracking::<f64>::new(BacktrackingConfig::new().with_contraction(1.5)).is_err());
    assert!(Backtracking::<f64>::new(BacktrackingConfig::new().with_decrease(0.0)).is_err());
}

#[test]
fn test_reference_functions_have_consistent_derivatives() {
    let rosenbrock = Rosenbrock::new(3);
    let x = DVector::from_column_slice(&[0.3, -0.7, 1.1]);
    let (ok, err) = check_gradient(&rosenbrock, &x, 1e-6);
    assert!(ok, "gradient error {:e}", err);
    let (ok, err) = check_hessian(&rosenbrock, &x, 1e-6).unwrap();
    assert!(ok, "hessian error {:e}", err);

    let brown = BrownBadlyScaled;
    let minimum = brown.minimum().unwrap();
    assert_eq!(brown.value(&minimum.x), 0.0);
    let mut g = DVector::zeros(2);
    brown.gradient(&minimum.x, &mut g);
    assert_eq!(g.amax(), 0.0);
}
