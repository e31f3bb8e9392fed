//! RLE module - Reading, writing and placing Life patterns.
//!
//! Handles the Run Length Encoded interchange format described at
//! <https://conwaylife.com/wiki/Run_Length_Encoded>:
//!
//! ```text
//! #N Glider
//! x = 3, y = 3, rule = B3/S23
//! bo$2bo$3o!
//! ```
//!
//! Only two-state patterns are supported; the rule string is kept but never
//! interpreted.

mod decode;
mod encode;

pub use decode::*;
pub use encode::*;

use crate::compute::Grid;

/// Errors from placing or decoding RLE patterns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RleError {
    #[error("Pattern is {rows}x{cols} but the grid is only {height}x{width}")]
    PatternTooLarge {
        rows: usize,
        cols: usize,
        height: usize,
        width: usize,
    },
    #[error("Pattern cell ({row}, {col}) would land outside the grid")]
    OutOfBounds { row: usize, col: usize },
    #[error("Pattern size {cols}x{rows} cannot be allocated")]
    PatternSizeOverflow { rows: usize, cols: usize },
    #[error("Run count at position {position} does not fit in a usize")]
    RunCountOverflow { position: usize },
}

/// Result of applying a pattern to a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Pattern was stamped onto the grid.
    Applied { live_cells: usize },
    /// Pattern had no live cells; the grid was left untouched.
    Empty,
}

/// A decoded rectangular pattern.
///
/// The cell buffer always holds exactly `rows * cols` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Pattern height (header `y`).
    rows: usize,
    /// Pattern width (header `x`).
    cols: usize,
    /// Row-major cell states [row * cols + col].
    cells: Vec<bool>,
    /// Rule string from the header, if any.
    rule: Option<String>,
}

impl Pattern {
    /// All-dead pattern of the given size.
    ///
    /// Fails if `rows * cols` overflows or the buffer cannot be allocated.
    pub fn new(rows: usize, cols: usize) -> Result<Self, RleError> {
        let size = rows
            .checked_mul(cols)
            .ok_or(RleError::PatternSizeOverflow { rows, cols })?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(size)
            .map_err(|_| RleError::PatternSizeOverflow { rows, cols })?;
        cells.resize(size, false);
        Ok(Self {
            rows,
            cols,
            cells,
            rule: None,
        })
    }

    /// Snapshot of a whole grid.
    pub fn from_grid(grid: &Grid) -> Self {
        let (rows, cols) = grid.dimensions();
        Self {
            rows,
            cols,
            cells: grid.cells().to_vec(),
            rule: None,
        }
    }

    /// Capture a region of a grid, wrapping around its edges.
    pub fn from_grid_region(
        grid: &Grid,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> Result<Self, RleError> {
        let mut pattern = Self::new(rows, cols)?;
        for r in 0..rows {
            for c in 0..cols {
                pattern.cells[r * cols + c] = grid.is_alive_wrapped(
                    row.wrapping_add(r) as isize,
                    col.wrapping_add(c) as isize,
                );
            }
        }
        Ok(pattern)
    }

    /// Pattern height.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Pattern width.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major view of all cells.
    #[inline]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }

    pub fn set_rule(&mut self, rule: Option<String>) {
        self.rule = rule;
    }

    /// Set a cell. Positions outside the pattern are ignored.
    pub fn set(&mut self, row: usize, col: usize, alive: bool) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = alive;
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    /// Coordinates of live cells in row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(move |(i, _)| (i / cols, i % cols))
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// True when no cell is alive.
    pub fn is_empty(&self) -> bool {
        !self.cells.contains(&true)
    }

    /// Offset that centers this pattern on a grid of the given size.
    pub fn centered_offset(&self, height: usize, width: usize) -> (usize, usize) {
        (
            (height / 2).saturating_sub(self.rows / 2),
            (width / 2).saturating_sub(self.cols / 2),
        )
    }
}

/// Stamp a pattern onto a grid with its top-left corner at the given offset.
///
/// Every cell of the pattern rectangle is written, dead cells included. The
/// grid is left untouched when the pattern is larger than the grid, when any
/// part of it would fall outside the grid, or when it has no live cells.
pub fn apply(
    pattern: &Pattern,
    grid: &mut Grid,
    offset_row: usize,
    offset_col: usize,
) -> Result<ApplyOutcome, RleError> {
    let (height, width) = grid.dimensions();
    if pattern.rows > height || pattern.cols > width {
        log::warn!(
            "rejecting {}x{} pattern for {}x{} grid",
            pattern.rows,
            pattern.cols,
            height,
            width
        );
        return Err(RleError::PatternTooLarge {
            rows: pattern.rows,
            cols: pattern.cols,
            height,
            width,
        });
    }

    if pattern.is_empty() {
        log::debug!("ignoring empty pattern");
        return Ok(ApplyOutcome::Empty);
    }

    let last_row = offset_row.saturating_add(pattern.rows - 1);
    let last_col = offset_col.saturating_add(pattern.cols - 1);
    if last_row >= height || last_col >= width {
        return Err(RleError::OutOfBounds {
            row: last_row,
            col: last_col,
        });
    }

    for r in 0..pattern.rows {
        for c in 0..pattern.cols {
            grid.set_cell(offset_row + r, offset_col + c, pattern.get(r, c))
                .map_err(|_| RleError::OutOfBounds {
                    row: offset_row + r,
                    col: offset_col + c,
                })?;
        }
    }

    let live_cells = pattern.live_count();
    log::debug!(
        "applied {}x{} pattern at ({}, {}): {} live cells",
        pattern.rows,
        pattern.cols,
        offset_row,
        offset_col,
        live_cells
    );
    Ok(ApplyOutcome::Applied { live_cells })
}

/// Stamp a pattern onto the center of a grid.
pub fn apply_centered(pattern: &Pattern, grid: &mut Grid) -> Result<ApplyOutcome, RleError> {
    let (offset_row, offset_col) = pattern.centered_offset(grid.height(), grid.width());
    apply(pattern, grid, offset_row, offset_col)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLIDER: &str = "x = 3, y = 3\nbo$2bo$3o!";

    #[test]
    fn test_glider_applied_centered() {
        let pattern = decode(GLIDER).unwrap();
        let mut grid = Grid::new(10, 10).unwrap();
        let outcome = apply_centered(&pattern, &mut grid).unwrap();
        assert_eq!(outcome, ApplyOutcome::Applied { live_cells: 5 });

        // Offset is (10/2 - 3/2, 10/2 - 3/2) = (4, 4)
        let live: Vec<_> = (0..10)
            .flat_map(|r| (0..10).map(move |c| (r, c)))
            .filter(|&(r, c)| grid.cell_state_at(r, c).unwrap())
            .collect();
        assert_eq!(live, vec![(4, 5), (5, 6), (6, 4), (6, 5), (6, 6)]);
        assert_eq!(grid.generation(), 0);
    }

    #[test]
    fn test_too_large_leaves_grid_dead() {
        let pattern = decode("x = 12, y = 3\n12o!").unwrap();
        let mut grid = Grid::new(10, 10).unwrap();
        let err = apply_centered(&pattern, &mut grid).unwrap_err();
        assert_eq!(
            err,
            RleError::PatternTooLarge {
                rows: 3,
                cols: 12,
                height: 10,
                width: 10
            }
        );
        assert_eq!(grid.population(), 0);

        let tall = decode("x = 2, y = 11\no!").unwrap();
        assert!(matches!(
            apply(&tall, &mut grid, 0, 0),
            Err(RleError::PatternTooLarge { .. })
        ));
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_empty_pattern_is_noop() {
        let mut grid = Grid::new(6, 6).unwrap();
        grid.set_cell(1, 1, true).unwrap();

        for text in ["", "x = 3, y = 3\n3b$3b!", "#C just a comment", "x = oops\n3o!"] {
            let pattern = decode(text).unwrap();
            assert_eq!(apply_centered(&pattern, &mut grid).unwrap(), ApplyOutcome::Empty);
        }
        assert_eq!(grid.population(), 1);
        assert!(grid.cell_state_at(1, 1).unwrap());
    }

    #[test]
    fn test_out_of_bounds_fails_fast() {
        let pattern = decode("x = 3, y = 2\n3o$3o!").unwrap();
        let mut grid = Grid::new(5, 5).unwrap();
        let err = apply(&pattern, &mut grid, 4, 1).unwrap_err();
        assert_eq!(err, RleError::OutOfBounds { row: 5, col: 3 });
        assert_eq!(grid.population(), 0);

        assert!(apply(&pattern, &mut grid, 0, usize::MAX).is_err());
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_apply_overwrites_rectangle() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set_cell(0, 0, true).unwrap();
        grid.set_cell(4, 4, true).unwrap();

        let pattern = decode("x = 2, y = 2\nbo$o!").unwrap();
        apply(&pattern, &mut grid, 0, 0).unwrap();

        assert!(!grid.cell_state_at(0, 0).unwrap());
        assert!(grid.cell_state_at(0, 1).unwrap());
        assert!(grid.cell_state_at(1, 0).unwrap());
        assert!(grid.cell_state_at(4, 4).unwrap());
    }

    #[test]
    fn test_centered_offset() {
        let pattern = Pattern::new(3, 4).unwrap();
        assert_eq!(pattern.centered_offset(10, 10), (4, 3));
        assert_eq!(pattern.centered_offset(3, 4), (0, 0));
        assert_eq!(pattern.centered_offset(5, 5), (1, 0));
    }

    #[test]
    fn test_from_grid_region_wraps() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set_cell(3, 3, true).unwrap();
        grid.set_cell(0, 0, true).unwrap();
        let pattern = Pattern::from_grid_region(&grid, 3, 3, 2, 2).unwrap();
        assert_eq!(pattern.live_cells().collect::<Vec<_>>(), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_from_grid_matches_cells() {
        let mut grid = Grid::new(3, 5).unwrap();
        grid.set_cell(2, 4, true).unwrap();
        let pattern = Pattern::from_grid(&grid);
        assert_eq!((pattern.rows(), pattern.cols()), (3, 5));
        assert_eq!(pattern.cells(), grid.cells());
    }

    #[test]
    fn test_pattern_size_overflow_rejected() {
        assert_eq!(
            Pattern::new(usize::MAX, 2),
            Err(RleError::PatternSizeOverflow {
                rows: usize::MAX,
                cols: 2
            })
        );
        let grid = Grid::new(2, 2).unwrap();
        assert!(Pattern::from_grid_region(&grid, 0, 0, 2, usize::MAX).is_err());
    }

    #[test]
    fn test_set_outside_pattern_is_ignored() {
        let mut pattern = Pattern::new(2, 3).unwrap();
        pattern.set(1, 2, true);
        pattern.set(2, 0, true);
        pattern.set(0, 3, true);
        assert_eq!(pattern.cells().len(), 6);
        assert_eq!(pattern.live_cells().collect::<Vec<_>>(), vec![(1, 2)]);

        let mut grid = Grid::new(4, 4).unwrap();
        assert_eq!(
            apply(&pattern, &mut grid, 2, 1).unwrap(),
            ApplyOutcome::Applied { live_cells: 1 }
        );
        assert!(grid.cell_state_at(3, 3).unwrap());
    }
}
