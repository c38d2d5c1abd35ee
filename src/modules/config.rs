use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::modules::grid::{Cell, Direction, Grid};
use crate::modules::protocol::DecodeMode;
use crate::modules::world::IgniteError;

pub const DEFAULT_SIZE: i32 = 10;
pub const DEFAULT_BASE: Cell = Cell::new(5, 6);
pub const DEFAULT_OBSTACLES: [Cell; 3] = [Cell::new(2, 3), Cell::new(7, 8), Cell::new(6, 3)];
pub const DEFAULT_FIRE: Cell = Cell::new(8, 0);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("grid size must be positive, got {0}")]
    InvalidSize(i32),
    #[error("base {0} lies outside the grid")]
    BaseOutOfBounds(Cell),
    #[error("base {0} is also listed as an obstacle")]
    BaseObstructed(Cell),
    #[error("obstacle {0} lies outside the grid")]
    ObstacleOutOfBounds(Cell),
    #[error("initial fire {0} must be inside the grid and off the base and obstacles")]
    InvalidFire(Cell),
    #[error("initial fire {0} is listed more than once")]
    DuplicateFire(Cell),
    #[error("initial fire rejected: {0}")]
    Ignite(#[from] IgniteError),
    #[error("initial fires ({count}) exceed max_fires ({max})")]
    TooManyFires { count: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub size: i32,
    pub base: Cell,
    pub obstacles: Vec<Cell>,
    pub initial_fires: Vec<Cell>,
    pub initial_direction: Direction,
    /// `None` leaves the number of concurrent fires unbounded.
    pub max_fires: Option<usize>,
    /// Fixed RNG seed for reproducible fire placement.
    pub seed: Option<u64>,
    pub decode: DecodeMode,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            base: DEFAULT_BASE,
            obstacles: DEFAULT_OBSTACLES.to_vec(),
            initial_fires: vec![DEFAULT_FIRE],
            initial_direction: Direction::West,
            max_fires: None,
            seed: None,
            decode: DecodeMode::Permissive,
        }
    }
}

impl SimConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SimConfig =
            serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.size, self.base, self.obstacles.iter().copied())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size <= 0 {
            return Err(ConfigError::InvalidSize(self.size));
        }
        let grid = self.grid();
        if grid.is_wall(self.base) {
            return Err(ConfigError::BaseOutOfBounds(self.base));
        }
        if grid.is_obstacle(self.base) {
            return Err(ConfigError::BaseObstructed(self.base));
        }
        if let Some(obstacle) = self.obstacles.iter().find(|o| grid.is_wall(**o)) {
            return Err(ConfigError::ObstacleOutOfBounds(*obstacle));
        }

        let mut seen = HashSet::new();
        for fire in &self.initial_fires {
            if grid.is_wall(*fire) || grid.is_base(*fire) || grid.is_obstacle(*fire) {
                return Err(ConfigError::InvalidFire(*fire));
            }
            if !seen.insert(*fire) {
                return Err(ConfigError::DuplicateFire(*fire));
            }
        }
        if let Some(max) = self.max_fires {
            if seen.len() > max {
                return Err(ConfigError::TooManyFires {
                    count: seen.len(),
                    max,
                });
            }
        }
        Ok(())
    }
}
