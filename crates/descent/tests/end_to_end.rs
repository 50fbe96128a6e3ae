//! End-to-end use of the umbrella crate.

use approx::assert_relative_eq;
use descent::prelude::*;
use descent_core::test_utils::{minimize, Rosenbrock, Settings, Status};

#[test]
fn test_both_strategies_reach_rosenbrock_minimum() {
    let f = Rosenbrock::new(2);
    let x0 = DVector::from_column_slice(&[-1.2, 1.0]);
    let settings = Settings::default();

    let mut bfgs: BfgsMethod<f64> = Bfgs::new().into_method();
    let bfgs_result = minimize(&mut bfgs, &f, &x0, &settings).unwrap();

    let mut newton: NewtonMethod<f64> = Newton::default().into_method();
    let newton_result = minimize(&mut newton, &f, &x0, &settings).unwrap();

    for result in [&bfgs_result, &newton_result] {
        assert_eq!(result.status, Status::GradientThreshold);
        assert_relative_eq!(result.location.x, DVector::from_element(2, 1.0), epsilon = 1e-6);
    }
    assert_eq!(bfgs_result.hess_evaluations, 0);
    assert!(newton_result.hess_evaluations > 0);
}
