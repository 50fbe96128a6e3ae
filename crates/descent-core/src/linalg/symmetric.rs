//! Dense symmetric matrix with symmetric rank updates.
//!
//! [`SymmetricMatrix`] stores the full `n × n` matrix in column-major order
//! and keeps both triangles bitwise identical: every mutation computes the
//! upper-triangle entry once and writes it to both positions. This makes the
//! symmetry of quasi-Newton updates exact rather than approximate.
//!
//! The backing storage is a plain `Vec` so that [`SymmetricMatrix::reuse_as`]
//! can change the dimension without giving memory back, which lets direction
//! strategies keep a single allocation across optimization runs.

use crate::{
    error::{DirectionError, DirectionResult},
    types::{DMatrix, DVector, Scalar},
};
use approx::{AbsDiffEq, RelativeEq};
use nalgebra::{DMatrixView, DMatrixViewMut};

/// Dense symmetric `n × n` matrix.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymmetricMatrix<T: Scalar> {
    n: usize,
    data: Vec<T>,
}

impl<T: Scalar> SymmetricMatrix<T> {
    /// Creates an `n × n` zero matrix.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![T::zero(); n * n],
        }
    }

    /// Creates the `n × n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        m.fill_scaled_identity(T::one());
        m
    }

    /// Creates a diagonal matrix from the given diagonal entries.
    pub fn from_diagonal(diagonal: &[T]) -> Self {
        let mut m = Self::zeros(diagonal.len());
        for (i, &d) in diagonal.iter().enumerate() {
            m.set_sym(i, i, d);
        }
        m
    }

    /// Creates a symmetric matrix from the upper triangle of a square matrix.
    ///
    /// Entries below the diagonal of `m` are ignored.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `m` is not square.
    pub fn from_upper(m: &DMatrix<T>) -> DirectionResult<Self> {
        DirectionError::check_len("matrix columns", m.nrows(), m.ncols())?;
        let n = m.nrows();
        let mut sym = Self::zeros(n);
        for j in 0..n {
            for i in 0..=j {
                sym.set_sym(i, j, m[(i, j)]);
            }
        }
        Ok(sym)
    }

    /// Creates a symmetric matrix by evaluating `f(i, j)` for `i <= j`.
    pub fn from_fn<F>(n: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut sym = Self::zeros(n);
        for j in 0..n {
            for i in 0..=j {
                sym.set_sym(i, j, f(i, j));
            }
        }
        sym
    }

    /// Returns the dimension `n` of the matrix.
    #[inline]
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Resizes the matrix to `n × n` and zeroes it, keeping the existing
    /// allocation whenever it is large enough.
    pub fn reuse_as(&mut self, n: usize) {
        self.data.clear();
        self.data.resize(n * n, T::zero());
        self.n = n;
    }

    /// Returns the number of elements the backing storage can hold without
    /// reallocating.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Returns the entry at `(i, j)`.
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> T {
        self.data[j * self.n + i]
    }

    /// Sets the entries at `(i, j)` and `(j, i)` to `value`.
    #[inline]
    pub fn set_sym(&mut self, i: usize, j: usize, value: T) {
        let n = self.n;
        self.data[j * n + i] = value;
        self.data[i * n + j] = value;
    }

    /// Overwrites the matrix with `scale · I`.
    pub fn fill_scaled_identity(&mut self, scale: T) {
        self.data.fill(T::zero());
        for i in 0..self.n {
            self.data[i * self.n + i] = scale;
        }
    }

    /// Copies `other` into `self`.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the dimensions differ.
    pub fn copy_sym(&mut self, other: &Self) -> DirectionResult<()> {
        DirectionError::check_len("symmetric matrix", self.n, other.n)?;
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// Returns the smallest diagonal entry, or `None` for an empty matrix.
    pub fn min_diagonal(&self) -> Option<T> {
        (0..self.n)
            .map(|i| self.at(i, i))
            .reduce(|min, a| if a < min { a } else { min })
    }

    /// Sets the diagonal of `self` to `source_ii + shift`, leaving the
    /// off-diagonal entries untouched.
    ///
    /// The shift is always applied to the diagonal of `source`, so repeated
    /// calls with different shifts do not accumulate.
    pub fn set_shifted_diagonal(&mut self, source: &Self, shift: T) {
        debug_assert_eq!(self.n, source.n);
        for i in 0..self.n {
            self.data[i * self.n + i] = source.at(i, i) + shift;
        }
    }

    /// Computes the quadratic form `xᵀ A y`.
    pub fn inner(&self, x: &DVector<T>, y: &DVector<T>) -> T {
        debug_assert_eq!(x.len(), self.n);
        debug_assert_eq!(y.len(), self.n);
        let mut sum = T::zero();
        for j in 0..self.n {
            let column = &self.data[j * self.n..(j + 1) * self.n];
            let mut col_dot = T::zero();
            for (a, &xi) in column.iter().zip(x.iter()) {
                col_dot += *a * xi;
            }
            sum += col_dot * y[j];
        }
        sum
    }

    /// Computes `out = A x` without allocating.
    pub fn mul_vec_to(&self, out: &mut DVector<T>, x: &DVector<T>) {
        out.gemv(T::one(), &self.as_view(), x, T::zero());
    }

    /// Applies the symmetric rank-one update `A += alpha · x xᵀ`.
    pub fn rank_one(&mut self, alpha: T, x: &DVector<T>) {
        debug_assert_eq!(x.len(), self.n);
        for j in 0..self.n {
            let axj = alpha * x[j];
            for i in 0..=j {
                let v = self.at(i, j) + axj * x[i];
                self.set_sym(i, j, v);
            }
        }
    }

    /// Applies the symmetric rank-two update `A += alpha · (x yᵀ + y xᵀ)`.
    pub fn rank_two(&mut self, alpha: T, x: &DVector<T>, y: &DVector<T>) {
        debug_assert_eq!(x.len(), self.n);
        debug_assert_eq!(y.len(), self.n);
        for j in 0..self.n {
            for i in 0..=j {
                let v = self.at(i, j) + alpha * (x[i] * y[j] + y[i] * x[j]);
                self.set_sym(i, j, v);
            }
        }
    }

    /// Returns a read-only nalgebra view of the matrix.
    pub fn as_view(&self) -> DMatrixView<'_, T> {
        DMatrixView::from_slice(&self.data, self.n, self.n)
    }

    /// Returns a mutable nalgebra view of the matrix.
    ///
    /// Writes through this view are not mirrored; callers must keep the
    /// matrix symmetric themselves.
    pub fn as_view_mut(&mut self) -> DMatrixViewMut<'_, T> {
        DMatrixViewMut::from_slice(&mut self.data, self.n, self.n)
    }

    /// Copies the matrix into an owned nalgebra matrix.
    pub fn to_matrix(&self) -> DMatrix<T> {
        self.as_view().into_owned()
    }

    /// Returns `true` if every pair `(i, j)`, `(j, i)` is bitwise equal.
    pub fn is_exactly_symmetric(&self) -> bool {
        (0..self.n).all(|j| (0..j).all(|i| self.at(i, j) == self.at(j, i)))
    }
}

impl<T: Scalar> AbsDiffEq for SymmetricMatrix<T> {
    type Epsilon = T;

    fn default_epsilon() -> T {
        <T as AbsDiffEq>::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: T) -> bool {
        self.n == other.n
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<T: Scalar> RelativeEq for SymmetricMatrix<T> {
    fn default_max_relative() -> T {
        <T as RelativeEq>::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: T, max_relative: T) -> bool {
        self.n == other.n
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

impl<T: Scalar> Default for SymmetricMatrix<T> {
    fn default() -> Self {
        Self::zeros(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn dvec(values: &[f64]) -> DVector<f64> {
        DVector::from_column_slice(values)
    }

    #[test]
    fn test_identity_and_access() {
        let m = SymmetricMatrix::<f64>::identity(3);
        assert_eq!(m.dim(), 3);
        assert_eq!(m.at(0, 0), 1.0);
        assert_eq!(m.at(1, 2), 0.0);
        assert_eq!(m.min_diagonal(), Some(1.0));
        assert_eq!(SymmetricMatrix::<f64>::zeros(0).min_diagonal(), None);
    }

    #[test]
    fn test_from_upper_rejects_rectangular() {
        let m = DMatrix::<f64>::zeros(2, 3);
        assert!(matches!(
            SymmetricMatrix::from_upper(&m),
            Err(DirectionError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_from_upper_mirrors() {
        let m = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 99.0, 3.0]);
        let sym = SymmetricMatrix::from_upper(&m).unwrap();
        assert_eq!(sym.at(1, 0), 1.0);
        assert_eq!(sym.at(0, 1), 1.0);
        assert_eq!(sym.at(1, 1), 3.0);
    }

    #[test]
    fn test_inner_and_mul_vec() {
        let a = SymmetricMatrix::from_fn(2, |i, j| if i == j { 2.0 } else { 1.0 });
        let x = dvec(&[1.0, 2.0]);
        let y = dvec(&[3.0, -1.0]);

        // A y = [5, 1]; x^T A y = 5 + 2
        assert_relative_eq!(a.inner(&x, &y), 7.0);

        let mut out = DVector::zeros(2);
        a.mul_vec_to(&mut out, &y);
        assert_relative_eq!(out, dvec(&[5.0, 1.0]));
    }

    #[test]
    fn test_rank_updates_match_dense_formulas() {
        let mut a = SymmetricMatrix::<f64>::identity(3);
        let x = dvec(&[1.0, -2.0, 0.5]);
        let y = dvec(&[0.3, 0.1, -4.0]);

        a.rank_two(-0.5, &x, &y);
        a.rank_one(2.0, &x);

        let expected = DMatrix::<f64>::identity(3, 3)
            - (&x * y.transpose() + &y * x.transpose()) * 0.5
            + &x * x.transpose() * 2.0;
        assert_relative_eq!(a.to_matrix(), expected, epsilon = 1e-12);
        assert!(a.is_exactly_symmetric());
    }

    #[test]
    fn test_approx_comparison() {
        let a = SymmetricMatrix::from_diagonal(&[1.0, 2.0]);
        let mut b = a.clone();
        b.set_sym(0, 1, 1e-12);
        assert_relative_eq!(a, b, epsilon = 1e-10);
        assert!(!a.abs_diff_eq(&SymmetricMatrix::identity(3), 1.0));
    }

    #[test]
    fn test_shifted_diagonal_does_not_accumulate() {
        let source = SymmetricMatrix::from_diagonal(&[-1.0, 2.0]);
        let mut shifted = source.clone();
        shifted.set_shifted_diagonal(&source, 0.5);
        shifted.set_shifted_diagonal(&source, 1.5);
        assert_eq!(shifted.at(0, 0), 0.5);
        assert_eq!(shifted.at(1, 1), 3.5);
    }

    #[test]
    fn test_reuse_keeps_allocation() {
        let mut m = SymmetricMatrix::<f64>::identity(4);
        let capacity = m.capacity();
        m.reuse_as(2);
        assert_eq!(m.dim(), 2);
        assert_eq!(m.capacity(), capacity);
        assert_eq!(m.at(0, 0), 0.0);

        assert!(m.copy_sym(&SymmetricMatrix::identity(3)).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_keeps_dimension() {
        let m = SymmetricMatrix::from_fn(3, |i, j| (i + 2 * j) as f64);
        let json = serde_json::to_string(&m).unwrap();
        let back: SymmetricMatrix<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.dim(), 3);
        assert_eq!(back, m);
    }

    proptest! {
        #[test]
        fn rank_updates_stay_exactly_symmetric(
            values in prop::collection::vec(-1e3f64..1e3, 12),
            alpha in -10.0f64..10.0,
        ) {
            let x = DVector::from_column_slice(&values[0..4]);
            let y = DVector::from_column_slice(&values[4..8]);
            let mut a = SymmetricMatrix::from_fn(4, |i, j| values[8 + (i + j) % 4]);

            a.rank_two(alpha, &x, &y);
            a.rank_one(-alpha, &y);

            prop_assert!(a.is_exactly_symmetric());
        }
    }
}
