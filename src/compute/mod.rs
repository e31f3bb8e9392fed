//! Compute module - Grid storage and Game of Life evolution.

mod aging;
mod evolution;
mod grid;

pub use aging::*;
pub use evolution::*;
pub use grid::*;
