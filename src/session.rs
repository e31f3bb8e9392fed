//! Session - Grid, viewport and run state for one sandbox.
//!
//! A [`Session`] is the single owner of simulation state. UI layers drive it
//! through two inbound paths: a periodic tick and discrete edit events. When
//! those come from separate drivers, [`SharedSession`] serializes them so an
//! edit never interleaves with an evolution pass.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::compute::{CellAges, Grid, GridError, GridStats};
use crate::rle::{self, ApplyOutcome, RleError};
use crate::schema::{ConfigError, SandboxConfig, Seed, SeedError};
use crate::viewport::{PanDirection, Viewport};

/// Session-level errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Rle(#[from] RleError),
    #[error("Position ({row}, {col}) is outside the visible window")]
    OutsideViewport { row: usize, col: usize },
}

/// Simulation state owned by one sandbox.
#[derive(Debug, Clone)]
pub struct Session {
    config: SandboxConfig,
    grid: Grid,
    viewport: Viewport,
    ages: Option<CellAges>,
    running: bool,
    tick_interval_ms: u64,
}

impl Session {
    /// Create a paused session with an all-dead grid.
    pub fn new(config: SandboxConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let grid = Grid::new(config.height, config.width)?;
        let viewport = Viewport::for_grid(&grid);
        let ages = config.track_ages.then(|| CellAges::new(&grid));
        let tick_interval_ms = config.tick_interval_ms;

        log::info!(
            "new session: {}x{} grid, {}x{} view, {}ms ticks",
            config.height,
            config.width,
            viewport.size().0,
            viewport.size().1,
            tick_interval_ms
        );

        Ok(Self {
            config,
            grid,
            viewport,
            ages,
            running: false,
            tick_interval_ms,
        })
    }

    /// Create a session and seed its grid.
    pub fn with_seed(config: SandboxConfig, seed: &Seed) -> Result<Self, SessionError> {
        let mut session = Self::new(config)?;
        let placed = seed.apply(&mut session.grid)?;
        session.refresh_ages();
        log::info!("seeded {} live cells", placed);
        Ok(session)
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Cosmetic ages, if enabled.
    pub fn ages(&self) -> Option<&CellAges> {
        self.ages.as_ref()
    }

    pub fn stats(&self) -> GridStats {
        GridStats::from_grid(&self.grid)
    }

    fn refresh_ages(&mut self) {
        if let Some(ages) = &mut self.ages {
            ages.refresh(&self.grid);
        }
    }

    /// Advance one generation regardless of run state.
    pub fn step(&mut self) {
        self.grid.evolve();
        if let Some(ages) = &mut self.ages {
            ages.observe(&self.grid);
        }
    }

    /// Periodic tick: evolves only while running. Returns whether it evolved.
    pub fn on_tick(&mut self) -> bool {
        if self.running {
            self.step();
        }
        self.running
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        if self.running != running {
            log::info!(
                "{} at generation {}",
                if running { "running" } else { "paused" },
                self.grid.generation()
            );
        }
        self.running = running;
    }

    /// Flip play/pause, returning the new state.
    pub fn toggle_running(&mut self) -> bool {
        self.set_running(!self.running);
        self.running
    }

    /// Current interval between ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Halve the tick interval, floored at the configured minimum.
    pub fn speed_up(&mut self) -> Duration {
        self.tick_interval_ms = (self.tick_interval_ms / 2).max(self.config.min_tick_interval_ms);
        log::debug!("tick interval now {}ms", self.tick_interval_ms);
        self.tick_interval()
    }

    /// Double the tick interval, capped at the configured maximum.
    pub fn slow_down(&mut self) -> Duration {
        self.tick_interval_ms = self
            .tick_interval_ms
            .saturating_mul(2)
            .min(self.config.max_tick_interval_ms);
        log::debug!("tick interval now {}ms", self.tick_interval_ms);
        self.tick_interval()
    }

    /// Kill every cell and reset the generation counter.
    pub fn clear(&mut self) {
        self.grid.clear();
        if let Some(ages) = &mut self.ages {
            ages.reset();
        }
        log::info!("cleared grid");
    }

    /// Flip a cell in grid coordinates.
    pub fn toggle_cell(&mut self, row: usize, col: usize) -> Result<bool, SessionError> {
        let alive = self.grid.toggle_cell(row, col)?;
        self.refresh_ages();
        Ok(alive)
    }

    /// Flip the cell under a position inside the visible window.
    pub fn toggle_visible(&mut self, view_row: usize, view_col: usize) -> Result<bool, SessionError> {
        let (row, col) = self
            .viewport
            .to_grid_coords(view_row, view_col)
            .ok_or(SessionError::OutsideViewport {
                row: view_row,
                col: view_col,
            })?;
        self.toggle_cell(row, col)
    }

    /// Decode RLE text and stamp it onto the center of the grid.
    pub fn apply_rle(&mut self, text: &str) -> Result<ApplyOutcome, SessionError> {
        let (height, width) = self.grid.dimensions();
        let pattern = rle::decode_for(text, height, width)?;
        let outcome = rle::apply_centered(&pattern, &mut self.grid)?;
        if let ApplyOutcome::Applied { live_cells } = outcome {
            self.refresh_ages();
            log::info!(
                "placed {}x{} pattern ({} live cells)",
                pattern.rows(),
                pattern.cols(),
                live_cells
            );
        }
        Ok(outcome)
    }

    /// Encode the whole grid as RLE.
    pub fn export_rle(&self) -> String {
        rle::encode(&rle::Pattern::from_grid(&self.grid))
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn pan(&mut self, direction: PanDirection) {
        self.viewport.pan(direction);
    }

    /// Cell states inside the visible window.
    pub fn visible_cells(&self) -> Vec<Vec<bool>> {
        self.viewport.visible_cells(&self.grid)
    }
}

/// Cloneable, mutex-serialized handle to a [`Session`].
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Lock the session. A lock poisoned by a panicking holder is recovered,
    /// since every session operation leaves the grid in a committed state.
    pub fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run a closure with exclusive access to the session.
    pub fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.lock())
    }

    /// Periodic tick entry point for a timer driver.
    pub fn tick(&self) -> bool {
        self.lock().on_tick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn small_config() -> SandboxConfig {
        SandboxConfig {
            height: 12,
            width: 12,
            ..Default::default()
        }
    }

    #[test]
    fn test_session_rejects_invalid_config() {
        let config = SandboxConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            Session::new(config),
            Err(SessionError::Config(ConfigError::InvalidDimensions))
        ));
    }

    #[test]
    fn test_tick_only_evolves_while_running() {
        let mut session = Session::with_seed(small_config(), &Seed::default()).unwrap();
        assert!(!session.on_tick());
        assert_eq!(session.grid().generation(), 0);

        assert!(session.toggle_running());
        assert!(session.on_tick());
        assert!(session.on_tick());
        assert_eq!(session.grid().generation(), 2);

        assert!(!session.toggle_running());
        session.step();
        assert_eq!(session.grid().generation(), 3);
    }

    #[test]
    fn test_clear_resets() {
        let mut session = Session::with_seed(small_config(), &Seed::default()).unwrap();
        session.step();
        session.step();
        session.clear();
        assert_eq!(session.grid().generation(), 0);
        assert_eq!(session.grid().population(), 0);
        let ages = session.ages().unwrap();
        assert_eq!(ages.get(6, 6).unwrap().last_alive_generation, None);
    }

    #[test]
    fn test_speed_controls_clamp() {
        let mut session = Session::new(small_config()).unwrap();
        assert_eq!(session.tick_interval(), Duration::from_millis(50));
        assert_eq!(session.speed_up(), Duration::from_millis(25));
        assert_eq!(session.speed_up(), Duration::from_millis(12));
        assert_eq!(session.speed_up(), Duration::from_millis(10));
        assert_eq!(session.speed_up(), Duration::from_millis(10));
        for _ in 0..20 {
            session.slow_down();
        }
        assert_eq!(session.tick_interval(), Duration::from_millis(2000));
    }

    #[test]
    fn test_toggle_visible_maps_through_viewport() {
        let mut session = Session::new(small_config()).unwrap();
        // 12x12 grid: 10x10 window at (1, 1)
        assert!(session.toggle_visible(0, 0).unwrap());
        assert!(session.grid().cell_state_at(1, 1).unwrap());
        assert!(session.visible_cells()[0][0]);

        assert!(matches!(
            session.toggle_visible(10, 0),
            Err(SessionError::OutsideViewport { row: 10, col: 0 })
        ));
        assert!(matches!(
            session.toggle_cell(12, 0),
            Err(SessionError::Grid(GridError::IndexOutOfRange { .. }))
        ));
        assert_eq!(session.grid().population(), 1);
    }

    #[test]
    fn test_apply_rle_outcomes() {
        let mut session = Session::new(small_config()).unwrap();
        assert_eq!(
            session.apply_rle("x = 3, y = 1\n3o!").unwrap(),
            ApplyOutcome::Applied { live_cells: 3 }
        );
        assert_eq!(session.apply_rle("   ").unwrap(), ApplyOutcome::Empty);
        assert!(matches!(
            session.apply_rle("x = 13, y = 1\no!"),
            Err(SessionError::Rle(RleError::PatternTooLarge { .. }))
        ));
        assert_eq!(session.grid().population(), 3);
        assert_eq!(session.ages().unwrap().get(6, 5).unwrap().age, Some(0));
    }

    #[test]
    fn test_apply_rle_huge_header_is_too_large() {
        let mut session = Session::new(small_config()).unwrap();
        session.apply_rle("x = 3, y = 1\n3o!").unwrap();
        let before = session.grid().clone();

        let err = session.apply_rle("x = 200000, y = 200000\no!").unwrap_err();
        assert!(matches!(
            err,
            SessionError::Rle(RleError::PatternTooLarge {
                rows: 200000,
                cols: 200000,
                ..
            })
        ));
        assert_eq!(session.grid(), &before);
    }

    #[test]
    fn test_export_rle_round_trip() {
        let mut session = Session::with_seed(small_config(), &Seed::default()).unwrap();
        let text = session.export_rle();
        assert!(text.starts_with("x = 12, y = 12, rule = B3/S23\n"));

        let before = session.grid().clone();
        session.clear();
        session.apply_rle(&text).unwrap();
        assert_eq!(session.grid(), &before);
    }

    #[test]
    fn test_view_controls_delegate() {
        let mut session = Session::new(SandboxConfig {
            height: 100,
            width: 100,
            ..Default::default()
        })
        .unwrap();
        session.zoom_in();
        assert_eq!(session.viewport().size(), (40, 40));
        session.zoom_out();
        session.zoom_out();
        assert_eq!(session.viewport().size(), (60, 60));
        let (row, col) = session.viewport().origin();
        session.pan(PanDirection::Left);
        assert_eq!(session.viewport().origin(), (row, col - 12));
    }

    #[test]
    fn test_shared_session_never_tears() {
        // A blinker always has exactly three live cells between generations
        let mut session = Session::new(small_config()).unwrap();
        session.apply_rle("x = 3, y = 1\n3o!").unwrap();
        session.set_running(true);
        let shared = SharedSession::new(session);

        let ticker = {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    shared.tick();
                }
            })
        };
        let reader = {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let population = shared.with(|s| s.grid().population());
                    assert_eq!(population, 3);
                }
            })
        };
        ticker.join().unwrap();
        reader.join().unwrap();

        let session = shared.lock();
        assert_eq!(session.grid().generation(), 200);
        assert_eq!(session.grid().population(), 3);
    }
}
