//! Core game logic module - pure, deterministic, and testable
//!
//! This crate is the grid engine of the sliding-tile merge puzzle: it decides
//! how a grid changes in response to a direction, tracks score, and detects
//! win/loss. It has **zero dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games (for AI training)
//! - **Testable**: Every rule is a plain function over a [`Grid`]
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//!
//! # Module Structure
//!
//! - [`grid`]: N×N board of tile values, score
//! - [`line`]: compress / merge / compress on a single row
//! - [`rotate`]: quarter turns, so every direction reuses the row reduction
//! - [`moves`]: applies a direction to a whole grid, reports whether it changed
//! - [`spawn`]: empty boards and random tile placement
//! - [`terminal`]: win and loss detection
//! - [`turn`]: one full turn (move, spawn, evaluate)
//! - [`rng`]: injectable random sources
//! - [`config`]: board size, winning tile, spawn distribution
//! - [`game_state`]: state container that serializes turns
//! - [`snapshot`]: owned copies for renderers and the adapter
//!
//! # Game Rules
//!
//! - **Moves**: every tile slides as far as it can; two equal neighbours merge
//!   once per move, the one nearer the wall absorbing the other
//! - **Spawns**: a move that changed the board adds one tile (2 with 90%
//!   probability, 4 with 10%) to a uniformly chosen empty cell
//! - **Score**: the sum of every tile on the board
//! - **Win**: a tile reaches the target (2048 by default)
//! - **Loss**: the board is full and no neighbours are equal
//!
//! # Example
//!
//! ```
//! use tui_2048_core::{EngineConfig, GameState};
//! use tui_2048_core::types::{Direction, GameAction, GameStatus};
//!
//! let mut game = GameState::new(EngineConfig::default(), 12345);
//! assert_eq!(game.grid().count_empty(), 14);
//!
//! for dir in Direction::ALL {
//!     game.apply_action(GameAction::Move(dir));
//! }
//!
//! assert_eq!(game.status(), GameStatus::Playing);
//! assert!(game.score() >= 4);
//! ```

pub mod config;
pub mod game_state;
pub mod grid;
pub mod line;
pub mod moves;
pub mod rng;
pub mod rotate;
pub mod snapshot;
pub mod spawn;
pub mod terminal;
pub mod turn;

pub use tui_2048_types as types;

// Re-export commonly used types for convenience
pub use config::{ConfigError, EngineConfig, SpawnDistribution};
pub use game_state::GameState;
pub use grid::{compute_score, Grid, GridError};
pub use line::{can_merge, compress, merge, reduce_line, reduce_line_reversed};
pub use moves::{apply_move, legal_moves, MoveOutcome};
pub use rng::{RandomSource, SequenceRng, SimpleRng};
pub use rotate::{rotate_clockwise, rotate_counter_clockwise};
pub use snapshot::GameSnapshot;
pub use spawn::{
    choose_spawn, create_empty_board, create_initial_board, spawn_tile, spawn_tile_traced,
};
pub use terminal::{has_winning_tile, is_board_stuck};
pub use turn::{play_turn, TurnResult};
