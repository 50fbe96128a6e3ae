//! In-place Cholesky factorization into reusable storage.
//!
//! nalgebra's `Cholesky::new` consumes its input and drops it when the matrix
//! is not positive definite. The modified Newton method factorizes several
//! shifted matrices per iteration, most of which are expected to fail, so the
//! factor here lives in caller-owned storage that survives failed attempts.
//! The triangular solves are delegated to nalgebra.

use crate::{
    linalg::symmetric::SymmetricMatrix,
    types::{DVector, Scalar},
};
use nalgebra::DMatrixView;
use num_traits::Float;

/// Lower-triangular Cholesky factor `L` with `A = L Lᵀ`.
#[derive(Debug, Clone, Default)]
pub struct CholeskyFactor<T: Scalar> {
    n: usize,
    data: Vec<T>,
    valid: bool,
}

impl<T: Scalar> CholeskyFactor<T> {
    /// Creates storage for the factor of an `n × n` matrix.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            data: vec![T::zero(); n * n],
            valid: false,
        }
    }

    /// Resizes the storage to `n × n`, keeping the allocation when possible.
    pub fn reuse_as(&mut self, n: usize) {
        self.data.clear();
        self.data.resize(n * n, T::zero());
        self.n = n;
        self.valid = false;
    }

    /// Returns the dimension of the factored matrix.
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Returns `true` if the last call to [`factorize`](Self::factorize) succeeded.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Attempts to factorize `a`.
    ///
    /// Returns `true` if `a` is positive definite to working precision. On
    /// failure the stored factor is left in an unspecified state and
    /// [`solve_to`](Self::solve_to) must not be used until a later call
    /// succeeds.
    pub fn factorize(&mut self, a: &SymmetricMatrix<T>) -> bool {
        debug_assert_eq!(a.dim(), self.n);
        let n = self.n;
        self.valid = false;

        for j in 0..n {
            let mut d = a.at(j, j);
            for k in 0..j {
                let ljk = self.data[k * n + j];
                d -= ljk * ljk;
            }
            if !(d > T::zero()) || !Float::is_finite(d) {
                return false;
            }
            let ljj = Float::sqrt(d);
            self.data[j * n + j] = ljj;

            for i in (j + 1)..n {
                let mut s = a.at(i, j);
                for k in 0..j {
                    s -= self.data[k * n + i] * self.data[k * n + j];
                }
                self.data[j * n + i] = s / ljj;
            }
            for i in 0..j {
                self.data[j * n + i] = T::zero();
            }
        }

        self.valid = true;
        true
    }

    /// Solves `A x = b` using the stored factor and writes `x` into `out`.
    ///
    /// Returns `false` if no valid factor is stored.
    pub fn solve_to(&self, out: &mut DVector<T>, b: &DVector<T>) -> bool {
        if !self.valid {
            return false;
        }
        out.copy_from(b);
        let l = self.as_view();
        l.solve_lower_triangular_mut(out) && l.tr_solve_lower_triangular_mut(out)
    }

    /// Returns a view of the lower-triangular factor.
    pub fn as_view(&self) -> DMatrixView<'_, T> {
        DMatrixView::from_slice(&self.data, self.n, self.n)
    }
}
