//! Schema module - Configuration and seeding types for Life sandbox sessions.

mod config;
mod seed;

pub use config::*;
pub use seed::*;
