//! Cosmetic per-cell ages for display fading.
//!
//! Ages are observed from the grid after each generation and never feed back
//! into the rule.

use super::Grid;

/// Age bookkeeping for a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellAge {
    /// Consecutive generations alive (`None` while dead).
    pub age: Option<u32>,
    /// Most recent generation in which the cell was alive.
    pub last_alive_generation: Option<u64>,
}

/// Observer tracking [`CellAge`] for every cell of a grid.
#[derive(Debug, Clone)]
pub struct CellAges {
    ages: Vec<CellAge>,
    width: usize,
}

impl CellAges {
    pub fn new(grid: &Grid) -> Self {
        let mut ages = Self {
            ages: vec![CellAge::default(); grid.cells().len()],
            width: grid.width(),
        };
        ages.refresh(grid);
        ages
    }

    /// Update ages after the grid advanced one generation.
    pub fn observe(&mut self, grid: &Grid) {
        let generation = grid.generation();
        for (entry, &alive) in self.ages.iter_mut().zip(grid.cells()) {
            if alive {
                entry.age = Some(entry.age.map_or(0, |a| a.saturating_add(1)));
                entry.last_alive_generation = Some(generation);
            } else {
                entry.age = None;
            }
        }
    }

    /// Sync with a grid that was edited rather than evolved.
    ///
    /// Newly-alive cells start at age 0, killed cells become dead, existing
    /// ages are kept.
    pub fn refresh(&mut self, grid: &Grid) {
        let generation = grid.generation();
        for (entry, &alive) in self.ages.iter_mut().zip(grid.cells()) {
            match (alive, entry.age) {
                (true, None) => {
                    entry.age = Some(0);
                    entry.last_alive_generation = Some(generation);
                }
                (false, Some(_)) => entry.age = None,
                _ => {}
            }
        }
    }

    /// Forget all history.
    pub fn reset(&mut self) {
        self.ages.fill(CellAge::default());
    }

    /// Age record at (row, col), or `None` if out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<CellAge> {
        if col >= self.width {
            return None;
        }
        self.ages.get(row * self.width + col).copied()
    }
}
