//! Dense linear-algebra primitives used by the direction strategies.

pub mod cholesky;
pub mod symmetric;
pub mod vector;

pub use cholesky::CholeskyFactor;
pub use symmetric::SymmetricMatrix;
pub use vector::*;
