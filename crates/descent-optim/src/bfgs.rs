//! BFGS quasi-Newton search directions.
//!
//! BFGS (Broyden-Fletcher-Goldfarb-Shanno) maintains a dense approximation
//! `H` of the inverse Hessian and uses `d = -H g` as the search direction.
//! After every accepted step the approximation is corrected so that it maps
//! the observed gradient change onto the observed position change.
//!
//! # Algorithm Overview
//!
//! With `s = x₊ - x`, `y = g₊ - g` and `ρ = 1 / sᵀy`, the inverse update is
//!
//! ```text
//! H₊ = (I - ρ s yᵀ) H (I - ρ y sᵀ) + ρ s sᵀ
//! ```
//!
//! which expands into one symmetric rank-two and one rank-one correction:
//!
//! ```text
//! H₊ = H - ρ (H y sᵀ + s yᵀ H) + ρ² (sᵀy + yᵀ H y) s sᵀ
//! ```
//!
//! Before the first update `H` is replaced by `(sᵀy / yᵀy) I`, which gives the
//! approximation the curvature scale of the problem. The very first direction
//! is steepest descent with a step scale of `1 / ‖g‖`, so that the first trial
//! step has unit length.
//!
//! # Curvature condition
//!
//! `H₊` stays positive definite only when `sᵀy > 0`, which a line search
//! satisfying the Wolfe conditions guarantees. When it does not hold the
//! update is applied anyway by default; [`CurvatureGuard::SkipUpdate`] keeps
//! the previous approximation instead.
//!
//! # References
//!
//! - Nocedal & Wright, "Numerical Optimization", 2nd ed., §6.1

use descent_core::{
    direction::{Needs, NextDirectioner},
    driver::Linesearch,
    error::{DirectionError, DirectionResult},
    line_search::Linesearcher,
    linalg::{neg_to, sub_to, SymmetricMatrix},
    location::Location,
    memory::Reusable,
    types::{DVector, Scalar},
};
use num_traits::Float;

/// What to do when an update pair violates the curvature condition `sᵀy > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurvatureGuard {
    /// Apply the update regardless. The approximation may lose positive
    /// definiteness.
    #[default]
    Unguarded,
    /// Skip the update and keep the previous approximation.
    SkipUpdate,
}

/// Configuration for the BFGS direction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BfgsConfig {
    /// Handling of update pairs with `sᵀy ≤ 0`
    pub curvature_guard: CurvatureGuard,
}

impl BfgsConfig {
    /// Create a new BFGS configuration with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the curvature guard
    pub fn with_curvature_guard(mut self, guard: CurvatureGuard) -> Self {
        self.curvature_guard = guard;
        self
    }
}

/// BFGS direction strategy.
///
/// All buffers are sized in [`init_direction`](NextDirectioner::init_direction)
/// and reused afterwards; computing subsequent directions does not allocate.
#[derive(Debug, Clone)]
pub struct Bfgs<T: Scalar> {
    config: BfgsConfig,
    dim: usize,
    initialized: bool,
    /// No update has been applied since the last initialization.
    first: bool,
    x: DVector<T>,
    grad: DVector<T>,
    y: DVector<T>,
    s: DVector<T>,
    tmp: DVector<T>,
    inv_hess: SymmetricMatrix<T>,
    curvature_violations: usize,
}

impl<T: Scalar> Default for Bfgs<T> {
    fn default() -> Self {
        Self::with_config(BfgsConfig::default())
    }
}

impl<T: Scalar> Bfgs<T> {
    /// Create a BFGS strategy with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a BFGS strategy with the given configuration.
    pub fn with_config(config: BfgsConfig) -> Self {
        Self {
            config,
            dim: 0,
            initialized: false,
            first: true,
            x: DVector::zeros(0),
            grad: DVector::zeros(0),
            y: DVector::zeros(0),
            s: DVector::zeros(0),
            tmp: DVector::zeros(0),
            inv_hess: SymmetricMatrix::zeros(0),
            curvature_violations: 0,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BfgsConfig {
        &self.config
    }

    /// Returns the current inverse Hessian approximation.
    pub fn inverse_hessian(&self) -> &SymmetricMatrix<T> {
        &self.inv_hess
    }

    /// Returns the problem dimension set by the last initialization.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of update pairs with `sᵀy ≤ 0` seen since the last initialization.
    pub fn curvature_violations(&self) -> usize {
        self.curvature_violations
    }

    /// Wraps the strategy in a line-search method using bisection.
    pub fn into_method(self) -> BfgsMethod<T> {
        Linesearch::new(self)
    }

    /// Wraps the strategy in a line-search method using `linesearcher`.
    pub fn into_method_with<L: Linesearcher<T>>(self, linesearcher: L) -> Linesearch<T, Self, L> {
        Linesearch::with_linesearcher(self, linesearcher)
    }
}

impl<T: Scalar> NextDirectioner<T> for Bfgs<T> {
    fn name(&self) -> &str {
        "BFGS"
    }

    fn init_direction(&mut self, loc: &Location<T>, dir: &mut DVector<T>) -> DirectionResult<T> {
        let n = loc.dim();
        if n == 0 {
            return Err(DirectionError::EmptyProblem);
        }
        let g = loc.gradient()?;
        DirectionError::check_len("gradient", n, g.len())?;
        DirectionError::check_len("direction", n, dir.len())?;

        self.dim = n;
        self.x.reuse_as(n);
        self.grad.reuse_as(n);
        self.y.reuse_as(n);
        self.s.reuse_as(n);
        self.tmp.reuse_as(n);
        self.inv_hess.reuse_as(n);
        self.inv_hess.fill_scaled_identity(T::one());

        self.x.copy_from(&loc.x);
        self.grad.copy_from(g);
        self.first = true;
        self.initialized = true;
        self.curvature_violations = 0;

        neg_to(dir, g);
        Ok(T::one() / dir.norm())
    }

    fn next_direction(&mut self, loc: &Location<T>, dir: &mut DVector<T>) -> DirectionResult<T> {
        if !self.initialized {
            return Err(DirectionError::NotInitialized);
        }
        let n = self.dim;
        DirectionError::check_len("position", n, loc.x.len())?;
        let g = loc.gradient()?;
        DirectionError::check_len("gradient", n, g.len())?;
        DirectionError::check_len("direction", n, dir.len())?;

        sub_to(&mut self.y, g, &self.grad);
        sub_to(&mut self.s, &loc.x, &self.x);
        let s_dot_y = self.s.dot(&self.y);

        let violated = !(s_dot_y > T::zero()) || !Float::is_finite(s_dot_y);
        if violated {
            self.curvature_violations += 1;
            log::debug!(
                "BFGS curvature condition violated: s·y = {} ({:?})",
                s_dot_y,
                self.config.curvature_guard
            );
        }

        if !(violated && self.config.curvature_guard == CurvatureGuard::SkipUpdate) {
            if self.first {
                let y_dot_y = self.y.dot(&self.y);
                self.inv_hess.fill_scaled_identity(s_dot_y / y_dot_y);
                self.first = false;
            }

            let y_by = self.inv_hess.inner(&self.y, &self.y);
            let c = (s_dot_y + y_by) / (s_dot_y * s_dot_y);
            self.inv_hess.mul_vec_to(&mut self.tmp, &self.y);
            self.inv_hess.rank_two(-T::one() / s_dot_y, &self.tmp, &self.s);
            self.inv_hess.rank_one(c, &self.s);
        }

        self.x.copy_from(&loc.x);
        self.grad.copy_from(g);

        self.inv_hess.mul_vec_to(dir, g);
        dir.neg_mut();
        Ok(T::one())
    }

    fn needs(&self) -> Needs {
        Needs::GRADIENT
    }
}

/// BFGS directions with a bisection line search.
pub type BfgsMethod<T> = Linesearch<T, Bfgs<T>>;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use descent_core::types::DMatrix;

    fn loc(x: &[f64], g: &[f64]) -> Location<f64> {
        Location::new(DVector::from_column_slice(x)).with_gradient(DVector::from_column_slice(g))
    }

    /// Textbook form of the inverse update.
    fn dense_update(h: &DMatrix<f64>, s: &DVector<f64>, y: &DVector<f64>) -> DMatrix<f64> {
        let n = s.len();
        let rho = 1.0 / s.dot(y);
        let i = DMatrix::<f64>::identity(n, n);
        let left = &i - s * y.transpose() * rho;
        let right = &i - y * s.transpose() * rho;
        left * h * right + s * s.transpose() * rho
    }

    #[test]
    fn test_bfgs_config() {
        let config = BfgsConfig::new().with_curvature_guard(CurvatureGuard::SkipUpdate);
        assert_eq!(config.curvature_guard, CurvatureGuard::SkipUpdate);
        assert_eq!(BfgsConfig::default().curvature_guard, CurvatureGuard::Unguarded);

        let bfgs = Bfgs::<f64>::with_config(config);
        assert_eq!(bfgs.name(), "BFGS");
        assert_eq!(bfgs.needs(), Needs::GRADIENT);
    }

    #[test]
    fn test_first_direction_is_steepest_descent() {
        let mut bfgs = Bfgs::new();
        let mut dir = DVector::zeros(2);

        let scale = bfgs.init_direction(&loc(&[1.0, 1.0], &[1.0, 1.0]), &mut dir).unwrap();
        assert_eq!(dir.as_slice(), &[-1.0, -1.0]);
        assert_relative_eq!(scale, 1.0 / 2.0_f64.sqrt());

        let scale = bfgs.init_direction(&loc(&[1.0, 1.0], &[2.0, 20.0]), &mut dir).unwrap();
        assert_eq!(dir.as_slice(), &[-2.0, -20.0]);
        assert_relative_eq!(scale, 1.0 / 404.0_f64.sqrt());
    }

    #[test]
    fn test_update_matches_textbook_formula() {
        let mut bfgs = Bfgs::new();
        let mut dir = DVector::zeros(3);
        bfgs.init_direction(&loc(&[0.0, 0.0, 0.0], &[1.0, -2.0, 0.5]), &mut dir)
            .unwrap();

        let s = DVector::from_column_slice(&[0.5, 0.25, -0.1]);
        let y = DVector::from_column_slice(&[1.0, 0.3, -0.4]);
        let g = DVector::from_column_slice(&[1.0, -2.0, 0.5]) + &y;
        let step = bfgs.next_direction(&loc(s.as_slice(), g.as_slice()), &mut dir).unwrap();
        assert_eq!(step, 1.0);

        let h0 = DMatrix::<f64>::identity(3, 3) * (s.dot(&y) / y.dot(&y));
        let expected = dense_update(&h0, &s, &y);
        assert_relative_eq!(bfgs.inverse_hessian().to_matrix(), expected, epsilon = 1e-12);
        assert_relative_eq!(dir, -(&expected * &g), epsilon = 1e-12);
        assert!(bfgs.inverse_hessian().is_exactly_symmetric());
        assert_eq!(bfgs.curvature_violations(), 0);
    }

    #[test]
    fn test_secant_equation_holds() {
        let mut bfgs = Bfgs::new();
        let mut dir = DVector::zeros(2);
        bfgs.init_direction(&loc(&[1.0, 1.0], &[2.0, 20.0]), &mut dir).unwrap();
        bfgs.next_direction(&loc(&[0.9, 0.0], &[1.8, 0.0]), &mut dir).unwrap();

        let s = DVector::from_column_slice(&[-0.1, -1.0]);
        let y = DVector::from_column_slice(&[-0.2, -20.0]);
        let mut hy = DVector::zeros(2);
        bfgs.inverse_hessian().mul_vec_to(&mut hy, &y);
        assert_relative_eq!(hy, s, epsilon = 1e-12);
    }

    #[test]
    fn test_dimension_checks() {
        let mut bfgs = Bfgs::<f64>::new();
        let mut dir = DVector::zeros(2);

        assert_eq!(
            bfgs.next_direction(&loc(&[1.0, 1.0], &[1.0, 1.0]), &mut dir),
            Err(DirectionError::NotInitialized)
        );
        assert_eq!(
            bfgs.init_direction(&loc(&[], &[]), &mut DVector::zeros(0)),
            Err(DirectionError::EmptyProblem)
        );
        assert_eq!(
            bfgs.init_direction(&Location::new(DVector::zeros(2)), &mut dir),
            Err(DirectionError::MissingGradient)
        );

        bfgs.init_direction(&loc(&[1.0, 1.0], &[1.0, 1.0]), &mut dir).unwrap();
        // Position is checked before the gradient and the direction.
        assert_eq!(
            bfgs.next_direction(&loc(&[1.0, 1.0, 1.0], &[1.0]), &mut DVector::zeros(1)),
            Err(DirectionError::dimension_mismatch("position", 2, 3))
        );
        assert_eq!(
            bfgs.next_direction(&loc(&[1.0, 1.0], &[1.0]), &mut DVector::zeros(1)),
            Err(DirectionError::dimension_mismatch("gradient", 2, 1))
        );
        assert_eq!(
            bfgs.next_direction(&loc(&[1.0, 1.0], &[1.0, 1.0]), &mut DVector::zeros(3)),
            Err(DirectionError::dimension_mismatch("direction", 2, 3))
        );
    }

    #[test]
    fn test_unguarded_update_counts_violation() {
        let mut bfgs = Bfgs::new();
        let mut dir = DVector::zeros(2);
        bfgs.init_direction(&loc(&[0.0, 0.0], &[1.0, 1.0]), &mut dir).unwrap();
        // s = (1, 0), y = (-1, 0): s·y = -1
        bfgs.next_direction(&loc(&[1.0, 0.0], &[0.0, 1.0]), &mut dir).unwrap();

        assert_eq!(bfgs.curvature_violations(), 1);
        assert!(bfgs.inverse_hessian().is_exactly_symmetric());
        assert_ne!(bfgs.inverse_hessian().to_matrix(), DMatrix::identity(2, 2));
    }

    #[test]
    fn test_skip_update_keeps_approximation() {
        let config = BfgsConfig::new().with_curvature_guard(CurvatureGuard::SkipUpdate);
        let mut bfgs = Bfgs::with_config(config);
        let mut dir = DVector::zeros(2);
        bfgs.init_direction(&loc(&[0.0, 0.0], &[1.0, 1.0]), &mut dir).unwrap();
        bfgs.next_direction(&loc(&[1.0, 0.0], &[0.0, 1.0]), &mut dir).unwrap();

        assert_eq!(bfgs.curvature_violations(), 1);
        assert_eq!(bfgs.inverse_hessian().to_matrix(), DMatrix::identity(2, 2));
        assert_eq!(dir.as_slice(), &[0.0, -1.0]);

        // The next valid pair is measured from the cached point (1, 0).
        bfgs.next_direction(&loc(&[1.0, -1.0], &[0.0, -1.0]), &mut dir).unwrap();
        assert_eq!(bfgs.curvature_violations(), 1);
        let mut hy = DVector::zeros(2);
        bfgs.inverse_hessian().mul_vec_to(&mut hy, &DVector::from_column_slice(&[0.0, -2.0]));
        assert_relative_eq!(hy, DVector::from_column_slice(&[0.0, -1.0]), epsilon = 1e-12);
    }

    #[test]
    fn test_reinitialization_resets_state() {
        let mut bfgs = Bfgs::new();
        let mut dir = DVector::zeros(3);
        bfgs.init_direction(&loc(&[0.0; 3], &[1.0, 2.0, 3.0]), &mut dir).unwrap();
        bfgs.next_direction(&loc(&[-0.1, -0.2, -0.3], &[0.9, 1.6, 2.1]), &mut dir)
            .unwrap();

        let mut dir = DVector::zeros(2);
        bfgs.init_direction(&loc(&[5.0, 5.0], &[3.0, 4.0]), &mut dir).unwrap();
        assert_eq!(bfgs.dim(), 2);
        assert_eq!(bfgs.inverse_hessian().to_matrix(), DMatrix::identity(2, 2));
        assert_eq!(dir.as_slice(), &[-3.0, -4.0]);
    }
}
