//! Error types for direction strategies and line-search methods.
//!
//! Two families of errors exist. [`DirectionError`] signals that a caller
//! used a direction strategy incorrectly (wrong buffer sizes, missing
//! derivative information). [`OptimizerError`] covers invalid configuration
//! and failures of the line-search driver, and wraps direction errors.
//!
//! Numerical difficulties inside a strategy, such as an indefinite Hessian,
//! are handled by the strategy itself and never show up here.

use thiserror::Error;

/// Errors caused by incorrect use of a direction strategy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectionError {
    /// Dimension mismatch between a supplied vector or matrix and the
    /// dimension the strategy was initialized with.
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Which argument had the wrong size
        what: String,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// The location has zero dimension.
    #[error("Cannot compute a direction for an empty problem")]
    EmptyProblem,

    /// The strategy requires a gradient but the location has none.
    #[error("Location does not contain a gradient")]
    MissingGradient,

    /// The strategy requires a Hessian but the location has none.
    #[error("Location does not contain a Hessian")]
    MissingHessian,

    /// `next_direction` was called before `init_direction`.
    #[error("Direction strategy used before initialization")]
    NotInitialized,
}

impl DirectionError {
    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S: Into<String>>(what: S, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }

    /// Return `Ok(())` when `actual == expected`, a DimensionMismatch otherwise.
    pub fn check_len(what: &str, expected: usize, actual: usize) -> DirectionResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::dimension_mismatch(what, expected, actual))
        }
    }
}

/// Errors that can occur while configuring or driving an optimization method.
#[derive(Debug, Clone, Error)]
pub enum OptimizerError {
    /// Invalid optimizer configuration.
    ///
    /// This error occurs when a method is configured with invalid
    /// parameters (e.g., a regularization growth factor not above one).
    #[error("Invalid optimizer configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// Line search failed to find an acceptable step.
    #[error("Line search failed: {reason}")]
    LineSearchFailed {
        /// Description of why the line search failed
        reason: String,
        /// Number of trial steps attempted
        iterations: usize,
        /// Last step size tried
        last_step_size: f64,
    },

    /// The direction returned by the strategy is not a descent direction.
    #[error("Invalid search direction: projected gradient {projected_gradient} is not negative")]
    NonDescentDirection {
        /// Directional derivative along the proposed direction
        projected_gradient: f64,
    },

    /// The next trial point is identical to the current point.
    #[error("Line search made no progress: trial point equals the current point")]
    NoProgress,

    /// Propagated direction-strategy error.
    #[error("Direction strategy failed: {0}")]
    Direction(#[from] DirectionError),
}

impl OptimizerError {
    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    /// Create a LineSearchFailed error with detailed context.
    pub fn line_search_failed<S: Into<String>>(
        reason: S,
        iterations: usize,
        last_step_size: f64,
    ) -> Self {
        Self::LineSearchFailed {
            reason: reason.into(),
            iterations,
            last_step_size,
        }
    }
}

/// Result type alias for direction-strategy operations.
pub type DirectionResult<T> = std::result::Result<T, DirectionError>;

/// Result type alias for optimizer operations.
pub type OptimizerResult<T> = std::result::Result<T, OptimizerError>;
