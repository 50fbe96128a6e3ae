//! Core types shared by every method.

pub mod error;
pub mod location;
pub mod types;

pub use error::*;
pub use location::Location;
pub use types::*;
