//! Seed types for initializing Life sandbox grids.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::compute::{Grid, GridError};
use crate::rle::{self, ApplyOutcome, RleError};

/// RLE used by [`Seed::default`].
pub const GLIDER_RLE: &str = "#N Glider\nx = 3, y = 3, rule = B3/S23\nbo$2bo$3o!";

/// Initial grid contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Seed {
    /// All cells dead.
    Empty,
    /// RLE pattern placed at the center of the grid.
    Rle {
        /// Pattern text, as it would be pasted into the RLE box.
        text: String,
    },
    /// Explicit live cells.
    Cells {
        /// List of (row, col) entries.
        cells: Vec<(usize, usize)>,
    },
    /// Uniform random soup.
    Random {
        /// Probability of each cell starting alive, in [0, 1].
        density: f32,
        /// Random seed.
        seed: u64,
    },
}

impl Default for Seed {
    fn default() -> Self {
        Seed::Rle {
            text: GLIDER_RLE.to_string(),
        }
    }
}

/// Seeding errors.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Random density {0} must be within [0, 1]")]
    InvalidDensity(f32),
    #[error(transparent)]
    Rle(#[from] RleError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl Seed {
    /// Write the seed onto a grid, returning the number of live cells placed.
    pub fn apply(&self, grid: &mut Grid) -> Result<usize, SeedError> {
        match self {
            Seed::Empty => Ok(0),
            Seed::Rle { text } => {
                let pattern = rle::decode_for(text, grid.height(), grid.width())?;
                match rle::apply_centered(&pattern, grid)? {
                    ApplyOutcome::Applied { live_cells } => Ok(live_cells),
                    ApplyOutcome::Empty => Ok(0),
                }
            }
            Seed::Cells { cells } => {
                for &(row, col) in cells {
                    grid.set_cell(row, col, true)?;
                }
                Ok(cells.len())
            }
            Seed::Random { density, seed } => {
                if !(0.0..=1.0).contains(density) {
                    return Err(SeedError::InvalidDensity(*density));
                }
                let mut rng = StdRng::seed_from_u64(*seed);
                let (height, width) = grid.dimensions();
                let mut placed = 0;
                for row in 0..height {
                    for col in 0..width {
                        if rng.gen_bool(f64::from(*density)) {
                            grid.set_cell(row, col, true)?;
                            placed += 1;
                        }
                    }
                }
                Ok(placed)
            }
        }
    }
}
