//! # Descent
//!
//! Quasi-Newton and modified Newton search directions for unconstrained
//! minimization, driven by reverse communication.
//!
//! This crate re-exports [`descent_core`], which holds the shared types, the
//! step-size searches and the line-search driver, and [`descent_optim`],
//! which holds the [`Bfgs`] and [`Newton`] direction strategies.
//!
//! A method never calls the objective itself. It writes the next trial
//! point, reports which quantities it needs there, and waits for the caller
//! to evaluate them:
//!
//! ```rust
//! use descent::prelude::*;
//!
//! // f(x, y) = (x - 1)² + 10 (y + 2)²
//! let value = |x: &DVector<f64>| (x[0] - 1.0).powi(2) + 10.0 * (x[1] + 2.0).powi(2);
//! let gradient =
//!     |x: &DVector<f64>| DVector::from_column_slice(&[2.0 * (x[0] - 1.0), 20.0 * (x[1] + 2.0)]);
//!
//! let mut loc = Location::new(DVector::zeros(2));
//! loc.f = value(&loc.x);
//! loc.gradient = Some(gradient(&loc.x));
//!
//! let mut method = Bfgs::new().into_method();
//! let mut x_next = DVector::zeros(2);
//! let (mut evaluation, _) = method.init(&loc, &mut x_next)?;
//!
//! for _ in 0..200 {
//!     if !evaluation.is_none() {
//!         loc.x.copy_from(&x_next);
//!         if evaluation.contains(EvaluationType::FUNC) {
//!             loc.f = value(&loc.x);
//!         }
//!         if evaluation.contains(EvaluationType::GRAD) {
//!             loc.gradient = Some(gradient(&loc.x));
//!         }
//!     }
//!     let (next, iteration) = method.iterate(&loc, &mut x_next)?;
//!     if iteration == IterationType::MajorIteration && loc.gradient()?.amax() < 1e-9 {
//!         break;
//!     }
//!     evaluation = next;
//! }
//!
//! assert!((loc.x[0] - 1.0).abs() < 1e-8);
//! assert!((loc.x[1] + 2.0).abs() < 1e-8);
//! # Ok::<(), descent::OptimizerError>(())
//! ```
//!
//! ## Features
//!
//! - `serde`: serialization of configurations and matrices
//! - `test-utils`: reference objective functions, derivative checks and a
//!   minimization loop

pub use descent_core;
pub use descent_optim;

// Re-export nalgebra for convenience
pub use nalgebra;

pub use descent_core::{
    error::{DirectionError, DirectionResult, OptimizerError, OptimizerResult},
    line_search::{Backtracking, BacktrackingConfig, Bisection, BisectionConfig},
    linalg::{CholeskyFactor, SymmetricMatrix},
    location::Location,
    types::Scalar,
    EvaluationType, IterationType, Linesearch, Linesearcher, Method, Needs, NextDirectioner,
};
pub use descent_optim::{
    Bfgs, BfgsConfig, BfgsMethod, CurvatureGuard, Newton, NewtonConfig, NewtonMethod,
};

#[cfg(feature = "test-utils")]
pub use descent_core::test_utils;

/// Prelude for convenient imports.
pub mod prelude {
    pub use descent_core::prelude::*;
    pub use descent_optim::{
        Bfgs, BfgsConfig, BfgsMethod, CurvatureGuard, Newton, NewtonConfig, NewtonMethod,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prelude_builds_both_methods() {
        let bfgs: BfgsMethod<f64> = Bfgs::new().into_method();
        assert_eq!(bfgs.needs(), Needs::GRADIENT);

        let newton: NewtonMethod<f64> = Newton::new(NewtonConfig::new().with_increase(3.0))
            .unwrap()
            .into_method();
        assert_eq!(newton.needs(), Needs::GRADIENT_AND_HESSIAN);
        assert_eq!(newton.directioner().config().increase, 3.0);
    }
}
