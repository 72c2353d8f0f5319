//! Generation configuration
//!
//! Tunable parameters for a generation run, loadable from RON files.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest accepted grid edge
pub const MIN_DIMENSION: i32 = 5;

/// Largest accepted grid edge
pub const MAX_DIMENSION: i32 = 4095;

/// Fraction of the grid the accepted wall region must cover
pub const DEFAULT_FILL_QUALITY_THRESHOLD: f64 = 0.045;

/// Floor neighbors needed to open a wall cell during pruning
pub const DEFAULT_PRUNE_NEIGHBOR_THRESHOLD: i32 = 3;

pub const DEFAULT_PRUNE_PASSES: i32 = 100;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be an odd number, got {value}")]
    EvenDimension { field: &'static str, value: i32 },

    #[error("{field} must be at least {min}, got {value}")]
    DimensionTooSmall { field: &'static str, value: i32, min: i32 },

    #[error("{field} must be at most {max}, got {value}")]
    DimensionTooLarge { field: &'static str, value: i32, max: i32 },

    #[error("room_min_dimension ({min}) is larger than room_max_dimension ({max})")]
    InvalidRoomRange { min: i32, max: i32 },

    #[error("{field} must not be negative, got {value}")]
    NegativeValue { field: &'static str, value: i32 },

    #[error("{field} must be within [0, 1], got {value}")]
    FactorOutOfRange { field: &'static str, value: f64 },

    #[error("prune_neighbor_threshold must be between 1 and 4, got {0}")]
    InvalidNeighborThreshold(i32),

    #[error("failed to read config: {0}")]
    Io(String),

    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Parameters for one dungeon generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Grid width (odd)
    pub width: i32,
    /// Grid height (odd)
    pub height: i32,
    /// Smallest room edge (odd)
    pub room_min_dimension: i32,
    /// Largest room edge (odd)
    pub room_max_dimension: i32,
    /// Cells kept clear around every room
    pub min_room_separation: i32,
    /// Rejected room candidates allowed before placement stops
    pub placement_retry_budget: i32,
    /// Scales the length of each maze growth walk
    pub maze_complexity_factor: f64,
    /// Scales the number of maze growth seeds
    pub maze_density_factor: f64,
    /// Fill re-attempts before the whole dungeon is regenerated
    pub max_fill_retries: i32,
    /// Minimum fraction of the grid the filled wall region must cover
    pub fill_quality_threshold: f64,
    pub prune_passes: i32,
    pub prune_neighbor_threshold: i32,
    /// Full restarts allowed before giving up
    pub max_regenerations: i32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 101,
            height: 101,
            room_min_dimension: 3,
            room_max_dimension: 15,
            min_room_separation: 1,
            placement_retry_budget: 200,
            maze_complexity_factor: 0.95,
            maze_density_factor: 0.95,
            max_fill_retries: 10,
            fill_quality_threshold: DEFAULT_FILL_QUALITY_THRESHOLD,
            prune_passes: DEFAULT_PRUNE_PASSES,
            prune_neighbor_threshold: DEFAULT_PRUNE_NEIGHBOR_THRESHOLD,
            max_regenerations: 50,
        }
    }
}

impl GenerationConfig {
    /// Default configuration with the given grid size
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Check every parity, range, and ordering constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if value < MIN_DIMENSION {
                return Err(ConfigError::DimensionTooSmall { field, value, min: MIN_DIMENSION });
            }
            if value > MAX_DIMENSION {
                return Err(ConfigError::DimensionTooLarge { field, value, max: MAX_DIMENSION });
            }
            if value % 2 == 0 {
                return Err(ConfigError::EvenDimension { field, value });
            }
        }

        for (field, value) in [
            ("room_min_dimension", self.room_min_dimension),
            ("room_max_dimension", self.room_max_dimension),
        ] {
            if value < 1 {
                return Err(ConfigError::DimensionTooSmall { field, value, min: 1 });
            }
            if value % 2 == 0 {
                return Err(ConfigError::EvenDimension { field, value });
            }
        }
        if self.room_min_dimension > self.room_max_dimension {
            return Err(ConfigError::InvalidRoomRange {
                min: self.room_min_dimension,
                max: self.room_max_dimension,
            });
        }

        for (field, value) in [
            ("min_room_separation", self.min_room_separation),
            ("placement_retry_budget", self.placement_retry_budget),
            ("max_fill_retries", self.max_fill_retries),
            ("prune_passes", self.prune_passes),
            ("max_regenerations", self.max_regenerations),
        ] {
            if value < 0 {
                return Err(ConfigError::NegativeValue { field, value });
            }
        }

        for (field, value) in [
            ("maze_complexity_factor", self.maze_complexity_factor),
            ("maze_density_factor", self.maze_density_factor),
            ("fill_quality_threshold", self.fill_quality_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::FactorOutOfRange { field, value });
            }
        }

        if !(1..=4).contains(&self.prune_neighbor_threshold) {
            return Err(ConfigError::InvalidNeighborThreshold(self.prune_neighbor_threshold));
        }

        Ok(())
    }

    /// Parse and validate a RON document
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        let config: GenerationConfig =
            ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Load and validate a configuration from a RON file
pub fn load_config(path: &Path) -> Result<GenerationConfig, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
    let config = GenerationConfig::from_ron(&content)?;
    log::info!("Loaded generation config from {}", path.display());
    Ok(config)
}

/// Write a configuration to a RON file
pub fn write_config(path: &Path, config: &GenerationConfig) -> Result<(), ConfigError> {
    let ron = config.to_ron()?;
    fs::write(path, ron).map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))
}
