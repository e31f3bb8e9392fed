//! Life sandbox - Conway's Game of Life on a toroidal grid.
//!
//! This crate provides the simulation core of an interactive Life sandbox:
//! a fixed-size wrapping grid evolved under the B3/S23 rule, a codec for the
//! RLE pattern interchange format, and a movable viewport for zoom and pan.
//!
//! # Architecture
//!
//! - `compute`: Grid storage, neighbor counting and double-buffered evolution
//! - `rle`: RLE decoding, encoding and pattern placement
//! - `viewport`: Visible window over the grid
//! - `schema`: Configuration and seeding
//! - `session`: Ownership of grid + viewport for a UI layer
//!
//! # Example
//!
//! ```rust,no_run
//! use life_sandbox::{
//!     schema::{SandboxConfig, Seed},
//!     session::Session,
//! };
//!
//! let seed = Seed::Rle {
//!     text: "x = 3, y = 3\nbo$2bo$3o!".to_string(),
//! };
//! let mut session = Session::with_seed(SandboxConfig::default(), &seed).unwrap();
//!
//! for _ in 0..100 {
//!     session.step();
//! }
//!
//! println!("{}", session.stats());
//! ```

pub mod compute;
pub mod rle;
pub mod schema;
pub mod session;
pub mod viewport;

// Re-export commonly used types
pub use compute::{Grid, GridError, GridStats};
pub use rle::{ApplyOutcome, Pattern, RleError};
pub use schema::{SandboxConfig, Seed};
pub use session::{Session, SharedSession};
pub use viewport::{PanDirection, Viewport};
