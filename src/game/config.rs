use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "Snake.toml";

/// Smallest accepted grid side
pub const MIN_GRID_SIDE: usize = 2;

/// Largest accepted grid side, keeps every cell coordinate well inside `i32`
pub const MAX_GRID_SIDE: usize = 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for a game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Milliseconds between ticks in real-time play
    pub tick_interval_ms: u64,
    /// Fixed seed for food placement; a fresh one is drawn when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_snake_length: 2,
            tick_interval_ms: 125,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Total number of cells on the grid
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Check that a session can be built from this configuration.
    ///
    /// Both sides must be at least 2. The starting snake is laid out
    /// leftwards from the grid centre, so it has to fit between the centre
    /// column and the left wall. Together these leave at least one cell free
    /// for the first food.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < MIN_GRID_SIDE || self.grid_height < MIN_GRID_SIDE {
            return Err(ConfigError::Invalid(format!(
                "grid sides must be at least {MIN_GRID_SIDE}, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            return Err(ConfigError::Invalid(format!(
                "grid sides are limited to {MAX_GRID_SIDE}, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.initial_snake_length == 0 {
            return Err(ConfigError::Invalid(
                "initial snake length must be at least 1".to_string(),
            ));
        }
        let room = self.grid_width / 2 + 1;
        if self.initial_snake_length > room {
            return Err(ConfigError::Invalid(format!(
                "initial snake length {} does not fit a grid {} cells wide (max {room})",
                self.initial_snake_length, self.grid_width
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick interval must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a TOML config file. Absent keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load an explicitly named file, or `Snake.toml` when it exists, or the
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(Self::default()),
        }
    }

    /// Like [`GameConfig::load`], but a missing or broken file is logged and
    /// the defaults are used instead
    pub fn load_or_default(path: Option<&Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("{e}; using default game configuration");
            Self::default()
        })
    }
}
