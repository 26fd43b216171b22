//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, AI protocol).
//!
//! # Board Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_BOARD_SIZE` | 4 | Rows and columns of the square grid |
//! | `DEFAULT_WIN_TARGET` | 2048 | Tile value that wins the game |
//! | `DEFAULT_LOW_TILE` | 2 | Common spawn value |
//! | `DEFAULT_HIGH_TILE` | 4 | Rare spawn value |
//! | `DEFAULT_HIGH_TILE_PER_MILLE` | 100 | Chance of the rare value (10%) |
//! | `INITIAL_TILES` | 2 | Tiles placed on a fresh board |
//! | `MAX_TILE` | 2^30 | Largest tile; two of them do not merge |
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Frame/poll interval (~60 FPS) |
//! | `MOVE_COOLDOWN_MS` | 500 | Minimum spacing between accepted moves |
//!
//! # Examples
//!
//! ```
//! use tui_2048_types::{Direction, GameAction, DEFAULT_BOARD_SIZE};
//!
//! let dir = Direction::from_str("Left").unwrap();
//! assert_eq!(dir, Direction::Left);
//! assert_eq!(dir.as_str(), "left");
//!
//! let action = GameAction::from_str("restart").unwrap();
//! assert_eq!(action, GameAction::Restart);
//!
//! assert_eq!(DEFAULT_BOARD_SIZE, 4);
//! ```

/// A tile value. `0` is an empty cell, anything else is a power of two.
pub type Tile = u32;

/// Largest tile a grid may hold. Two of them never merge, so doubling a
/// tile always stays inside `Tile`.
pub const MAX_TILE: Tile = 1 << 30;

/// Default board size (4x4)
pub const DEFAULT_BOARD_SIZE: usize = 4;

/// Default winning tile
pub const DEFAULT_WIN_TARGET: Tile = 2048;

/// Value of a freshly spawned tile in most cases
pub const DEFAULT_LOW_TILE: Tile = 2;

/// Value of a freshly spawned tile in the rare case
pub const DEFAULT_HIGH_TILE: Tile = 4;

/// Chance (out of `SPAWN_ROLL_SCALE`) that a spawn uses the high value
pub const DEFAULT_HIGH_TILE_PER_MILLE: u32 = 100;

/// Resolution of the spawn value roll
pub const SPAWN_ROLL_SCALE: u32 = 1000;

/// Number of tiles placed on a new board
pub const INITIAL_TILES: usize = 2;

/// Frame/poll interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Minimum spacing between two accepted moves.
pub const MOVE_COOLDOWN_MS: u32 = 500;

/// Minimum drag distance (terminal cells) before a mouse drag counts as a swipe.
pub const SWIPE_THRESHOLD_CELLS: u16 = 2;

/// The four directions a move can slide the tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Every direction, in the order used for legal-move listings.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Parse direction from string (case-insensitive)
    ///
    /// Accepts full names or single letters: "left" | "l", "right" | "r",
    /// "up" | "u", "down" | "d".
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_2048_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("UP"), Some(Direction::Up));
    /// assert_eq!(Direction::from_str("d"), Some(Direction::Down));
    /// assert_eq!(Direction::from_str("sideways"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// Game actions that can be applied to modify game state
///
/// These actions are used by both human input and AI control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Slide every tile in a direction
    Move(Direction),
    /// Throw the board away and start a new one
    Restart,
}

impl GameAction {
    /// Parse action from string (for AI protocol)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_2048_types::{Direction, GameAction};
    ///
    /// assert_eq!(GameAction::from_str("left"), Some(GameAction::Move(Direction::Left)));
    /// assert_eq!(GameAction::from_str("Restart"), Some(GameAction::Restart));
    /// assert_eq!(GameAction::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("restart") {
            return Some(GameAction::Restart);
        }
        Direction::from_str(s).map(GameAction::Move)
    }

    /// Convert to string for AI protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Move(dir) => dir.as_str(),
            GameAction::Restart => "restart",
        }
    }
}

/// Where a game currently stands.
///
/// Once a game leaves `Playing` it accepts no further moves until restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        }
    }

    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Playing)
    }
}

/// A tile placed by the spawner: row, column and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpawnedTile {
    pub row: usize,
    pub col: usize,
    pub value: Tile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_defaults() {
        assert_eq!(DEFAULT_BOARD_SIZE, 4);
        assert_eq!(DEFAULT_WIN_TARGET, 2048);
        assert_eq!(DEFAULT_LOW_TILE, 2);
        assert_eq!(DEFAULT_HIGH_TILE, 4);
        // 90% twos, 10% fours.
        assert_eq!(
            SPAWN_ROLL_SCALE - DEFAULT_HIGH_TILE_PER_MILLE,
            SPAWN_ROLL_SCALE * 9 / 10
        );
        assert_eq!(MOVE_COOLDOWN_MS, 500);
    }
}
