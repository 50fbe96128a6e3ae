//! Objective functions with known minima for testing.

use crate::{
    error::{DirectionError, DirectionResult},
    linalg::{CholeskyFactor, SymmetricMatrix},
    types::DVector,
};
use std::fmt::Debug;

/// A known minimizer of a test function.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Location of the minimum.
    pub x: DVector<f64>,
    /// Objective value at `x`.
    pub f: f64,
}

/// A smooth objective function on ℝⁿ.
pub trait Function: Debug {
    /// Human-readable name.
    fn name(&self) -> &str;

    /// Dimension of the domain.
    fn dim(&self) -> usize;

    /// Evaluates the function at `x`.
    fn value(&self, x: &DVector<f64>) -> f64;

    /// Writes the gradient at `x` into `grad`.
    fn gradient(&self, x: &DVector<f64>, grad: &mut DVector<f64>);

    /// Writes the Hessian at `x` into `hess`.
    ///
    /// # Errors
    ///
    /// The default implementation returns `MissingHessian`.
    fn hessian(&self, _x: &DVector<f64>, _hess: &mut SymmetricMatrix<f64>) -> DirectionResult<()> {
        Err(DirectionError::MissingHessian)
    }

    /// Returns the global minimum if it is known.
    fn minimum(&self) -> Option<Minimum> {
        None
    }
}

/// Quadratic function f(x) = ½ xᵀ A x − bᵀ x with symmetric `A`.
#[derive(Debug, Clone)]
pub struct Quadratic {
    a: SymmetricMatrix<f64>,
    b: DVector<f64>,
}

impl Quadratic {
    /// Creates the quadratic with matrix `a` and linear term `b`.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the sizes of `a` and `b` differ.
    pub fn new(a: SymmetricMatrix<f64>, b: DVector<f64>) -> DirectionResult<Self> {
        DirectionError::check_len("linear term", a.dim(), b.len())?;
        Ok(Self { a, b })
    }

    /// Creates f(x) = ½ Σ dᵢ xᵢ², minimized at the origin.
    pub fn diagonal(d: &[f64]) -> Self {
        Self {
            a: SymmetricMatrix::from_diagonal(d),
            b: DVector::zeros(d.len()),
        }
    }

    /// Returns the matrix `A`.
    pub fn matrix(&self) -> &SymmetricMatrix<f64> {
        &self.a
    }
}

impl Function for Quadratic {
    fn name(&self) -> &str {
        "Quadratic"
    }

    fn dim(&self) -> usize {
        self.b.len()
    }

    fn value(&self, x: &DVector<f64>) -> f64 {
        0.5 * self.a.inner(x, x) - self.b.dot(x)
    }

    fn gradient(&self, x: &DVector<f64>, grad: &mut DVector<f64>) {
        self.a.mul_vec_to(grad, x);
        *grad -= &self.b;
    }

    fn hessian(&self, _x: &DVector<f64>, hess: &mut SymmetricMatrix<f64>) -> DirectionResult<()> {
        hess.copy_sym(&self.a)
    }

    /// Only known when `A` is positive definite.
    fn minimum(&self) -> Option<Minimum> {
        let mut chol = CholeskyFactor::new(self.a.dim());
        if !chol.factorize(&self.a) {
            return None;
        }
        let mut x = DVector::zeros(self.b.len());
        chol.solve_to(&mut x, &self.b);
        let f = self.value(&x);
        Some(Minimum { x, f })
    }
}

/// Extended Rosenbrock function
/// f(x) = Σᵢ 100 (xᵢ₊₁ − xᵢ²)² + (1 − xᵢ)², minimized at (1, …, 1).
#[derive(Debug, Clone)]
pub struct Rosenbrock {
    dim: usize,
}

impl Rosenbrock {
    /// Creates the `dim`-dimensional Rosenbrock function.
    ///
    /// # Panics
    ///
    /// Panics if `dim < 2`.
    pub fn new(dim: usize) -> Self {
        assert!(dim >= 2, "Rosenbrock needs at least two variables");
        Self { dim }
    }
}

impl Function for Rosenbrock {
    fn name(&self) -> &str {
        "Extended Rosenbrock"
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn value(&self, x: &DVector<f64>) -> f64 {
        x.as_slice()
            .windows(2)
            .map(|w| {
                let a = w[1] - w[0] * w[0];
                let b = 1.0 - w[0];
                100.0 * a * a + b * b
            })
            .sum()
    }

    fn gradient(&self, x: &DVector<f64>, grad: &mut DVector<f64>) {
        grad.fill(0.0);
        for i in 0..x.len() - 1 {
            let a = x[i + 1] - x[i] * x[i];
            grad[i] += -400.0 * x[i] * a - 2.0 * (1.0 - x[i]);
            grad[i + 1] += 200.0 * a;
        }
    }

    fn hessian(&self, x: &DVector<f64>, hess: &mut SymmetricMatrix<f64>) -> DirectionResult<()> {
        DirectionError::check_len("hessian", x.len(), hess.dim())?;
        hess.fill_scaled_identity(0.0);
        for i in 0..x.len() - 1 {
            let hii = hess.at(i, i) + 1200.0 * x[i] * x[i] - 400.0 * x[i + 1] + 2.0;
            hess.set_sym(i, i, hii);
            hess.set_sym(i, i + 1, -400.0 * x[i]);
            let hjj = hess.at(i + 1, i + 1) + 200.0;
            hess.set_sym(i + 1, i + 1, hjj);
        }
        Ok(())
    }

    fn minimum(&self) -> Option<Minimum> {
        Some(Minimum {
            x: DVector::from_element(self.dim, 1.0),
            f: 0.0,
        })
    }
}

/// Brown's badly scaled function
/// f(x) = (x₁ − 10⁶)² + (x₂ − 2·10⁻⁶)² + (x₁x₂ − 2)², minimized at (10⁶, 2·10⁻⁶).
#[derive(Debug, Clone, Copy, Default)]
pub struct BrownBadlyScaled;

impl BrownBadlyScaled {
    fn residuals(x: &DVector<f64>) -> (f64, f64, f64) {
        (x[0] - 1e6, x[1] - 2e-6, x[0] * x[1] - 2.0)
    }
}

impl Function for BrownBadlyScaled {
    fn name(&self) -> &str {
        "Brown badly scaled"
    }

    fn dim(&self) -> usize {
        2
    }

    fn value(&self, x: &DVector<f64>) -> f64 {
        let (r1, r2, r3) = Self::residuals(x);
        r1 * r1 + r2 * r2 + r3 * r3
    }

    fn gradient(&self, x: &DVector<f64>, grad: &mut DVector<f64>) {
        let (r1, r2, r3) = Self::residuals(x);
        grad[0] = 2.0 * r1 + 2.0 * r3 * x[1];
        grad[1] = 2.0 * r2 + 2.0 * r3 * x[0];
    }

    fn hessian(&self, x: &DVector<f64>, hess: &mut SymmetricMatrix<f64>) -> DirectionResult<()> {
        DirectionError::check_len("hessian", 2, hess.dim())?;
        hess.set_sym(0, 0, 2.0 + 2.0 * x[1] * x[1]);
        hess.set_sym(0, 1, 4.0 * x[0] * x[1] - 4.0);
        hess.set_sym(1, 1, 2.0 + 2.0 * x[0] * x[0]);
        Ok(())
    }

    fn minimum(&self) -> Option<Minimum> {
        Some(Minimum {
            x: DVector::from_column_slice(&[1e6, 2e-6]),
            f: 0.0,
        })
    }
}
