//! Finite-difference checks of analytic derivatives.
//!
//! Both checks use central differences with a step of `∛ε · max(1, |xᵢ|)` and
//! report the largest error relative to `max(1, |analytic|)`, so that badly
//! scaled functions can be validated with a single tolerance.

use super::functions::Function;
use crate::{error::DirectionResult, linalg::SymmetricMatrix, types::DVector};

fn fd_step(xi: f64) -> f64 {
    f64::EPSILON.cbrt() * xi.abs().max(1.0)
}

fn relative_error(analytic: f64, numeric: f64) -> f64 {
    (analytic - numeric).abs() / analytic.abs().max(1.0)
}

/// Compares the gradient of `function` at `x` against central differences
/// of its value.
///
/// Returns `(passes, max_error)`.
pub fn check_gradient<F: Function + ?Sized>(function: &F, x: &DVector<f64>, tol: f64) -> (bool, f64) {
    let n = x.len();
    let mut grad = DVector::zeros(n);
    function.gradient(x, &mut grad);

    let mut probe = x.clone();
    let mut max_error = 0.0_f64;
    for i in 0..n {
        let h = fd_step(x[i]);
        probe[i] = x[i] + h;
        let f_plus = function.value(&probe);
        let plus = probe[i];
        probe[i] = x[i] - h;
        let f_minus = function.value(&probe);
        let minus = probe[i];
        probe[i] = x[i];

        let numeric = (f_plus - f_minus) / (plus - minus);
        max_error = max_error.max(relative_error(grad[i], numeric));
    }
    (max_error < tol, max_error)
}

/// Compares the Hessian of `function` at `x` against central differences
/// of its gradient.
///
/// Returns `(passes, max_error)`.
///
/// # Errors
///
/// Propagates the error of [`Function::hessian`], e.g. `MissingHessian`.
pub fn check_hessian<F: Function + ?Sized>(
    function: &F,
    x: &DVector<f64>,
    tol: f64,
) -> DirectionResult<(bool, f64)> {
    let n = x.len();
    let mut hess = SymmetricMatrix::zeros(n);
    function.hessian(x, &mut hess)?;

    let mut probe = x.clone();
    let mut g_plus = DVector::zeros(n);
    let mut g_minus = DVector::zeros(n);
    let mut max_error = 0.0_f64;
    for j in 0..n {
        let h = fd_step(x[j]);
        probe[j] = x[j] + h;
        function.gradient(&probe, &mut g_plus);
        let plus = probe[j];
        probe[j] = x[j] - h;
        function.gradient(&probe, &mut g_minus);
        let minus = probe[j];
        probe[j] = x[j];

        for i in 0..n {
            let numeric = (g_plus[i] - g_minus[i]) / (plus - minus);
            max_error = max_error.max(relative_error(hess.at(i, j), numeric));
        }
    }
    Ok((max_error < tol, max_error))
}
