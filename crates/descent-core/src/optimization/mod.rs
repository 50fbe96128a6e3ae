//! Optimization methods and their building blocks.

pub mod direction;
pub mod driver;
pub mod line_search;
pub mod method;

pub use direction::{Needs, NextDirectioner};
pub use driver::Linesearch;
pub use line_search::{
    Backtracking, BacktrackingConfig, Bisection, BisectionConfig, LinesearchStep, Linesearcher,
};
pub use method::{EvaluationType, IterationType, Method};
