//! Non-allocating vector helpers on top of nalgebra.

use crate::types::{DVector, Scalar};
use num_traits::Float;

/// Writes `-src` into `out`.
#[inline]
pub fn neg_to<T: Scalar>(out: &mut DVector<T>, src: &DVector<T>) {
    out.copy_from(src);
    out.neg_mut();
}

/// Writes `a - b` into `out`.
#[inline]
pub fn sub_to<T: Scalar>(out: &mut DVector<T>, a: &DVector<T>, b: &DVector<T>) {
    out.copy_from(a);
    *out -= b;
}

/// Writes `x + alpha · d` into `out`.
#[inline]
pub fn add_scaled_to<T: Scalar>(out: &mut DVector<T>, x: &DVector<T>, alpha: T, d: &DVector<T>) {
    out.copy_from(x);
    out.axpy(alpha, d, T::one());
}

/// Returns the largest absolute entry of `v`, or zero for an empty vector.
pub fn inf_norm<T: Scalar>(v: &DVector<T>) -> T {
    v.iter()
        .fold(T::zero(), |acc, &x| Float::max(acc, Float::abs(x)))
}
