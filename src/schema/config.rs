//! Configuration types for Life sandbox sessions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

fn default_min_tick_interval() -> u64 {
    10
}

fn default_max_tick_interval() -> u64 {
    2000
}

fn default_track_ages() -> bool {
    true
}

/// Top-level sandbox configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Grid height in cells.
    pub height: usize,
    /// Grid width in cells.
    pub width: usize,
    /// Interval between evolution ticks while running, in milliseconds.
    pub tick_interval_ms: u64,
    /// Fastest interval reachable with the speed controls.
    #[serde(default = "default_min_tick_interval")]
    pub min_tick_interval_ms: u64,
    /// Slowest interval reachable with the speed controls.
    #[serde(default = "default_max_tick_interval")]
    pub max_tick_interval_ms: u64,
    /// Maintain per-cell ages for display fading.
    #[serde(default = "default_track_ages")]
    pub track_ages: bool,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            height: 40,
            width: 40,
            tick_interval_ms: 50,
            min_tick_interval_ms: default_min_tick_interval(),
            max_tick_interval_ms: default_max_tick_interval(),
            track_ages: default_track_ages(),
        }
    }
}

impl SandboxConfig {
    /// Total number of cells.
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.width * self.height
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.min_tick_interval_ms == 0 || self.min_tick_interval_ms > self.max_tick_interval_ms
        {
            return Err(ConfigError::InvalidTickBounds {
                min: self.min_tick_interval_ms,
                max: self.max_tick_interval_ms,
            });
        }
        if !(self.min_tick_interval_ms..=self.max_tick_interval_ms)
            .contains(&self.tick_interval_ms)
        {
            return Err(ConfigError::InvalidTickInterval(self.tick_interval_ms));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        Self::from_json_str(&s)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("Tick interval {0}ms is outside the configured speed bounds")]
    InvalidTickInterval(u64),
    #[error("Tick bounds must satisfy 0 < min ({min}ms) <= max ({max}ms)")]
    InvalidTickBounds { min: u64, max: u64 },
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_is_valid() {
        let config = SandboxConfig::default();
        config.validate().unwrap();
        assert_eq!(config.grid_size(), 1600);
    }

    #[test]
    fn test_validation_errors() {
        let config = SandboxConfig {
            height: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDimensions)));

        let config = SandboxConfig {
            tick_interval_ms: 5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTickInterval(5))
        ));

        let config = SandboxConfig {
            min_tick_interval_ms: 100,
            max_tick_interval_ms: 50,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTickBounds { min: 100, max: 50 })
        ));
    }

    #[test]
    fn test_json_defaults_optional_fields() {
        let config =
            SandboxConfig::from_json_str(r#"{"height": 20, "width": 30, "tick_interval_ms": 100}"#)
                .unwrap();
        assert_eq!((config.height, config.width), (20, 30));
        assert_eq!(config.min_tick_interval_ms, 10);
        assert_eq!(config.max_tick_interval_ms, 2000);
        assert!(config.track_ages);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        let json = serde_json::to_string_pretty(&SandboxConfig::default()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = SandboxConfig::load(file.path()).unwrap();
        assert_eq!(config, SandboxConfig::default());

        assert!(matches!(
            SandboxConfig::load(file.path().with_extension("missing")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            SandboxConfig::from_json_str("{\"height\": "),
            Err(ConfigError::Parse(_))
        ));
    }
}
