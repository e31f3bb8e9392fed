//! Viewport - movable, resizable window over the toroidal grid.
//!
//! The window origin is clamped to the unwrapped coordinate space so panning
//! never runs past the far edge, while reads through the window wrap.

use crate::compute::Grid;

/// Rows/columns added or removed per zoom step.
pub const ZOOM_STEP: usize = 10;

/// Smallest visible window dimension (or the grid dimension, if smaller).
pub const MIN_VIEW: usize = 10;

/// Pan distance as a percentage of the visible dimension (rounded up).
pub const PAN_PERCENT: usize = 20;

/// Pan direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Visible window onto a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    origin_row: usize,
    origin_col: usize,
    view_rows: usize,
    view_cols: usize,
    grid_height: usize,
    grid_width: usize,
}

/// Default extent: half the grid, rounded down to a multiple of the zoom step.
fn default_extent(dim: usize) -> usize {
    ((dim / 2) / ZOOM_STEP * ZOOM_STEP).clamp(min_extent(dim), dim)
}

#[inline]
fn min_extent(dim: usize) -> usize {
    MIN_VIEW.min(dim)
}

#[inline]
fn pan_step(extent: usize) -> usize {
    (extent * PAN_PERCENT).div_ceil(100)
}

impl Viewport {
    /// Create the default window for a grid of the given size, centered.
    pub fn new(grid_height: usize, grid_width: usize) -> Self {
        let view_rows = default_extent(grid_height);
        let view_cols = default_extent(grid_width);
        Self {
            origin_row: (grid_height - view_rows) / 2,
            origin_col: (grid_width - view_cols) / 2,
            view_rows,
            view_cols,
            grid_height,
            grid_width,
        }
    }

    /// Create the default window for an existing grid.
    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(grid.height(), grid.width())
    }

    /// Top-left of the window as (row, col).
    #[inline]
    pub fn origin(&self) -> (usize, usize) {
        (self.origin_row, self.origin_col)
    }

    /// Window size as (rows, cols).
    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.view_rows, self.view_cols)
    }

    pub fn zoom_in(&mut self) {
        self.view_rows = self
            .view_rows
            .saturating_sub(ZOOM_STEP)
            .max(min_extent(self.grid_height));
        self.view_cols = self
            .view_cols
            .saturating_sub(ZOOM_STEP)
            .max(min_extent(self.grid_width));
        self.clamp_origin();
    }

    pub fn zoom_out(&mut self) {
        self.view_rows = (self.view_rows + ZOOM_STEP).min(self.grid_height);
        self.view_cols = (self.view_cols + ZOOM_STEP).min(self.grid_width);
        self.clamp_origin();
    }

    pub fn pan(&mut self, direction: PanDirection) {
        let rows = pan_step(self.view_rows);
        let cols = pan_step(self.view_cols);
        match direction {
            PanDirection::Up => self.origin_row = self.origin_row.saturating_sub(rows),
            PanDirection::Down => self.origin_row += rows,
            PanDirection::Left => self.origin_col = self.origin_col.saturating_sub(cols),
            PanDirection::Right => self.origin_col += cols,
        }
        self.clamp_origin();
    }

    fn clamp_origin(&mut self) {
        self.origin_row = self.origin_row.min(self.grid_height - self.view_rows);
        self.origin_col = self.origin_col.min(self.grid_width - self.view_cols);
    }

    /// Map a position inside the window to grid coordinates.
    ///
    /// Returns `None` when the position is outside the window.
    pub fn to_grid_coords(&self, view_row: usize, view_col: usize) -> Option<(usize, usize)> {
        if view_row >= self.view_rows || view_col >= self.view_cols {
            return None;
        }
        Some((
            (self.origin_row + view_row) % self.grid_height,
            (self.origin_col + view_col) % self.grid_width,
        ))
    }

    /// Cell states inside the window, one `Vec` per visible row.
    pub fn visible_cells(&self, grid: &Grid) -> Vec<Vec<bool>> {
        (0..self.view_rows)
            .map(|y| {
                (0..self.view_cols)
                    .map(|x| {
                        grid.is_alive_wrapped(
                            (self.origin_row + y) as isize,
                            (self.origin_col + x) as isize,
                        )
                    })
                    .collect()
            })
            .collect()
    }
}
