//! Reusable scratch storage for direction strategies.
//!
//! Strategies own every buffer they touch and only resize them when an
//! optimization run starts. [`Reusable::reuse_as`] is that single resize
//! point: it zeroes the buffer and changes its dimension. Matrix buffers
//! keep their allocation when shrinking; vectors are reallocated on any
//! change of length. After it has been
//! called, the steady-state iterations of a strategy perform no allocation.
//!
//! Because the buffers are reused across calls, a strategy instance must be
//! driven by exactly one optimization loop at a time.

use crate::{
    linalg::{CholeskyFactor, SymmetricMatrix},
    types::{DVector, Scalar},
};

/// Scratch storage that can be resized and cleared for a new run.
pub trait Reusable {
    /// Resizes the buffer for problem dimension `n` and zeroes it.
    fn reuse_as(&mut self, n: usize);
}

impl<T: Scalar> Reusable for DVector<T> {
    fn reuse_as(&mut self, n: usize) {
        if self.len() == n {
            self.fill(T::zero());
        } else {
            // Any length change reallocates, shrinks included: a `DVector`'s
            // length is its storage length, so spare capacity cannot be kept.
            *self = DVector::zeros(n);
        }
    }
}

impl<T: Scalar> Reusable for SymmetricMatrix<T> {
    fn reuse_as(&mut self, n: usize) {
        SymmetricMatrix::reuse_as(self, n);
    }
}

impl<T: Scalar> Reusable for CholeskyFactor<T> {
    fn reuse_as(&mut self, n: usize) {
        CholeskyFactor::reuse_as(self, n);
    }
}
