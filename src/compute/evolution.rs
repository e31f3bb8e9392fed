//! Game of Life evolution.
//!
//! The next generation is computed in full into the grid's scratch buffer,
//! then swapped in with a single commit so no partially-updated generation
//! is ever observable.

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use super::Grid;

/// Moore neighborhood offsets, excluding the cell itself.
const NEIGHBOR_OFFSETS: [(usize, usize); 8] = [
    // Offsets are stored as (d + 1) so they stay unsigned.
    (0, 0),
    (0, 1),
    (0, 2),
    (1, 0),
    (1, 2),
    (2, 0),
    (2, 1),
    (2, 2),
];

/// B3/S23: a live cell survives with 2 or 3 live neighbors, a dead cell is
/// born with exactly 3.
#[inline]
pub fn next_state(alive: bool, live_neighbors: u8) -> bool {
    matches!((alive, live_neighbors), (true, 2) | (_, 3))
}

/// Count live cells in the Moore neighborhood of (row, col) with toroidal
/// wraparound.
///
/// On grids with a dimension below 3 the same physical cell can appear as
/// several logical neighbors; each appearance is counted.
pub fn count_live_neighbors(grid: &Grid, row: usize, col: usize) -> u8 {
    let (height, width) = grid.dimensions();
    count_in(grid.cells(), height, width, row % height, col % width)
}

#[inline]
fn count_in(cells: &[bool], height: usize, width: usize, row: usize, col: usize) -> u8 {
    let mut count = 0;
    for &(dr, dc) in &NEIGHBOR_OFFSETS {
        // (row + d + height) % height with d = dr - 1
        let r = (row + dr + height - 1) % height;
        let c = (col + dc + width - 1) % width;
        if cells[r * width + c] {
            count += 1;
        }
    }
    count
}

fn evolve_row(cells: &[bool], height: usize, width: usize, row: usize, out: &mut [bool]) {
    for (col, next) in out.iter_mut().enumerate() {
        let n = count_in(cells, height, width, row, col);
        *next = next_state(cells[row * width + col], n);
    }
}

impl Grid {
    /// Advance exactly one generation.
    pub fn evolve(&mut self) {
        let (height, width) = self.dimensions();
        let cells = &self.cells;

        #[cfg(not(target_arch = "wasm32"))]
        {
            // Native: rows are independent, each writes only its own scratch row
            self.scratch
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(row, out)| evolve_row(cells, height, width, row, out));
        }

        #[cfg(target_arch = "wasm32")]
        {
            for (row, out) in self.scratch.chunks_mut(width).enumerate() {
                evolve_row(cells, height, width, row, out);
            }
        }

        self.commit_scratch();
        log::debug!(
            "evolved to generation {} ({} live)",
            self.generation(),
            self.population()
        );
    }

    /// Advance the given number of generations.
    pub fn run(&mut self, generations: u64) {
        for _ in 0..generations {
            self.evolve();
        }
    }
}
