//! Core traits and types for descent-direction optimization.
//!
//! This crate provides the pieces shared by every descent method: the scalar
//! trait, the iterate state exchanged between a driver and a direction
//! strategy, symmetric-matrix and Cholesky primitives that work in reusable
//! storage, step-size searches, and a reverse-communication line-search
//! driver that turns a direction strategy into a complete method.
//!
//! # Key Concepts
//!
//! - **Direction strategies** ([`NextDirectioner`]): compute a search
//!   direction and an initial step scale from the current [`Location`]
//! - **Step searches** ([`Linesearcher`]): pick a step length along a fixed
//!   direction from reported function values and projected gradients
//! - **Methods** ([`Method`]): reverse-communication optimizers; the caller
//!   evaluates the objective wherever the method asks
//!
//! # Modules
//!
//! - [`direction`]: Direction strategy trait and derivative requirements
//! - [`driver`]: Line-search method built on a direction strategy
//! - [`error`]: Error types for strategies and methods
//! - [`line_search`]: Bisection and backtracking step searches
//! - [`linalg`]: Symmetric matrices, Cholesky factors and vector helpers
//! - [`location`]: The iterate state
//! - [`memory`]: Buffer reuse between optimization runs
//! - [`method`]: Reverse-communication method interface
//! - [`types`]: Scalar trait and type aliases

pub mod core;
pub mod linalg;
pub mod memory;
pub mod optimization;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use crate::core::{error, location, types};
pub use crate::optimization::{direction, driver, line_search, method};

// Re-export commonly used items at the crate root
pub use error::{DirectionError, DirectionResult, OptimizerError, OptimizerResult};
pub use location::Location;
pub use optimization::{
    Backtracking, Bisection, EvaluationType, IterationType, Linesearch, Linesearcher, Method,
    Needs, NextDirectioner,
};
pub use types::Scalar;

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use descent_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::direction::{Needs, NextDirectioner};
    pub use crate::driver::Linesearch;
    pub use crate::error::{DirectionError, DirectionResult, OptimizerError, OptimizerResult};
    pub use crate::line_search::{
        Backtracking, BacktrackingConfig, Bisection, BisectionConfig, LinesearchStep,
        Linesearcher,
    };
    pub use crate::linalg::{CholeskyFactor, SymmetricMatrix};
    pub use crate::location::Location;
    pub use crate::memory::Reusable;
    pub use crate::method::{EvaluationType, IterationType, Method};
    pub use crate::types::{DMatrix, DVector, Scalar};
}
