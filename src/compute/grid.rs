//! Toroidal cell grid.
//!
//! Cells are stored as a flat row-major array with indexing `row * width + col`.

/// Grid construction and access errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Grid dimensions must be non-zero (got {height}x{width})")]
    InvalidDimensions { height: usize, width: usize },
    #[error("Cell ({row}, {col}) is outside grid bounds [0, {height}) x [0, {width})")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },
}

/// Binary-state toroidal grid with a generation counter.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Cell states, row-major [row * width + col].
    pub(crate) cells: Vec<bool>,
    /// Scratch buffer for the next generation (same size as `cells`).
    pub(crate) scratch: Vec<bool>,
    height: usize,
    width: usize,
    generation: u64,
}

impl Grid {
    /// Create an all-dead grid at generation 0.
    pub fn new(height: usize, width: usize) -> Result<Self, GridError> {
        if height == 0 || width == 0 {
            return Err(GridError::InvalidDimensions { height, width });
        }
        let size = height * width;
        Ok(Self {
            cells: vec![false; size],
            scratch: vec![false; size],
            height,
            width,
            generation: 0,
        })
    }

    /// Grid dimensions as (height, width).
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of completed generations since creation or the last clear.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Row-major view of all cells.
    #[inline]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    fn checked_idx(&self, row: usize, col: usize) -> Result<usize, GridError> {
        if row >= self.height || col >= self.width {
            return Err(GridError::IndexOutOfRange {
                row,
                col,
                height: self.height,
                width: self.width,
            });
        }
        Ok(row * self.width + col)
    }

    /// Read a cell without wraparound.
    pub fn cell_state_at(&self, row: usize, col: usize) -> Result<bool, GridError> {
        let idx = self.checked_idx(row, col)?;
        Ok(self.cells[idx])
    }

    /// Read a cell with toroidal wraparound on both axes.
    #[inline]
    pub fn is_alive_wrapped(&self, row: isize, col: isize) -> bool {
        let r = row.rem_euclid(self.height as isize) as usize;
        let c = col.rem_euclid(self.width as isize) as usize;
        self.cells[r * self.width + c]
    }

    /// Set a single cell. The generation counter is unchanged.
    pub fn set_cell(&mut self, row: usize, col: usize, alive: bool) -> Result<(), GridError> {
        let idx = self.checked_idx(row, col)?;
        self.cells[idx] = alive;
        Ok(())
    }

    /// Flip a single cell, returning its new state.
    pub fn toggle_cell(&mut self, row: usize, col: usize) -> Result<bool, GridError> {
        let idx = self.checked_idx(row, col)?;
        self.cells[idx] = !self.cells[idx];
        Ok(self.cells[idx])
    }

    /// Kill every cell and reset the generation counter.
    pub fn clear(&mut self) {
        self.cells.fill(false);
        self.generation = 0;
    }

    /// Count of live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Swap the scratch buffer in as the current generation.
    pub(crate) fn commit_scratch(&mut self) {
        std::mem::swap(&mut self.cells, &mut self.scratch);
        self.generation += 1;
    }
}

// Scratch contents are not part of the observable state.
impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.height == other.height
            && self.width == other.width
            && self.generation == other.generation
            && self.cells == other.cells
    }
}

impl Eq for Grid {}

/// Grid statistics for monitoring.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridStats {
    pub generation: u64,
    pub population: usize,
    pub height: usize,
    pub width: usize,
}

impl GridStats {
    /// Compute statistics from a grid.
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            generation: grid.generation(),
            population: grid.population(),
            height: grid.height(),
            width: grid.width(),
        }
    }
}

impl std::fmt::Display for GridStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "gen {}: {} live of {}x{}",
            self.generation, self.population, self.height, self.width
        )
    }
}
