//! Engine configuration - board size, winning tile and spawn distribution

use thiserror::Error;

use crate::types::{
    Tile, DEFAULT_BOARD_SIZE, DEFAULT_HIGH_TILE, DEFAULT_HIGH_TILE_PER_MILLE, DEFAULT_LOW_TILE,
    DEFAULT_WIN_TARGET, MAX_TILE, SPAWN_ROLL_SCALE,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board size must be at least 2, got {0}")]
    BoardTooSmall(usize),
    #[error("win target must be a power of two in 4..={max}, got {0}", max = MAX_TILE)]
    InvalidTarget(Tile),
    #[error("spawn value must be a power of two in 2..={max}, got {0}", max = MAX_TILE)]
    InvalidSpawnValue(Tile),
    #[error("spawn chance must be at most 1000 per mille, got {0}")]
    InvalidSpawnChance(u32),
}

/// Which values a new tile can take.
///
/// A roll in `0..SPAWN_ROLL_SCALE` below `high_per_mille` yields `high`,
/// anything else yields `low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpawnDistribution {
    pub low: Tile,
    pub high: Tile,
    pub high_per_mille: u32,
}

impl SpawnDistribution {
    /// Map a roll in `0..SPAWN_ROLL_SCALE` to a tile value.
    pub fn value_for_roll(&self, roll: u32) -> Tile {
        if roll < self.high_per_mille {
            self.high
        } else {
            self.low
        }
    }
}

impl Default for SpawnDistribution {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_TILE,
            high: DEFAULT_HIGH_TILE,
            high_per_mille: DEFAULT_HIGH_TILE_PER_MILLE,
        }
    }
}

/// Rules of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineConfig {
    pub size: usize,
    pub win_target: Tile,
    pub spawn: SpawnDistribution,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            win_target: DEFAULT_WIN_TARGET,
            spawn: SpawnDistribution::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_win_target(mut self, target: Tile) -> Self {
        self.win_target = target;
        self
    }

    pub fn with_spawn(mut self, spawn: SpawnDistribution) -> Self {
        self.spawn = spawn;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size < 2 {
            return Err(ConfigError::BoardTooSmall(self.size));
        }
        if self.win_target < 4 || self.win_target > MAX_TILE || !self.win_target.is_power_of_two() {
            return Err(ConfigError::InvalidTarget(self.win_target));
        }
        for value in [self.spawn.low, self.spawn.high] {
            if value < 2 || value > MAX_TILE || !value.is_power_of_two() {
                return Err(ConfigError::InvalidSpawnValue(value));
            }
        }
        if self.spawn.high_per_mille > SPAWN_ROLL_SCALE {
            return Err(ConfigError::InvalidSpawnChance(self.spawn.high_per_mille));
        }
        Ok(())
    }
}
