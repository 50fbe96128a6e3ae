//! Memory management for direction strategies.

pub mod workspace;

// Re-export key items
pub use workspace::Reusable;
