//! Descent Optimization - search-direction strategies for unconstrained minimization.
//!
//! This crate provides the direction strategies that plug into the
//! line-search driver of `descent-core`.
//!
//! # Available Strategies
//!
//! - **BFGS**: Dense quasi-Newton inverse-Hessian approximation
//! - **Newton**: Exact Hessian with adaptive diagonal regularization
//!
//! # Examples
//!
//! ```rust
//! use descent_core::{location::Location, method::Method, types::DVector};
//! use descent_optim::Bfgs;
//!
//! // f(x, y) = x² + 10y² at (1, 1)
//! let x = DVector::from_column_slice(&[1.0, 1.0]);
//! let loc = Location::new(x)
//!     .with_value(11.0)
//!     .with_gradient(DVector::from_column_slice(&[2.0, 20.0]));
//!
//! let mut method = Bfgs::new().into_method();
//! let mut x_next = DVector::zeros(2);
//! let (evaluation, _) = method.init(&loc, &mut x_next)?;
//!
//! // The caller evaluates the objective at `x_next` and calls `iterate`.
//! assert!(!evaluation.is_none());
//! # Ok::<(), descent_core::error::OptimizerError>(())
//! ```

pub mod bfgs;
pub mod newton;

// Re-export main strategies for convenience
pub use bfgs::{Bfgs, BfgsConfig, BfgsMethod, CurvatureGuard};
pub use newton::{Newton, NewtonConfig, NewtonMethod};
