//! Shared test utilities: objective functions, derivative checks and a
//! reference minimization loop.
//!
//! Available in unit tests and, for other crates, behind the `test-utils`
//! feature.

#![cfg(any(test, feature = "test-utils"))]

pub mod functions;
pub mod minimize;
pub mod validate;

pub use functions::{BrownBadlyScaled, Function, Minimum, Quadratic, Rosenbrock};
pub use minimize::{minimize, MinimizeResult, Settings, Status};
pub use validate::{check_gradient, check_hessian};
