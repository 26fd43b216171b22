//! Turn composition - one directional input from start to finish
//!
//! move → (only if something moved) spawn → win/loss check → score.

use crate::config::EngineConfig;
use crate::grid::{compute_score, Grid};
use crate::moves::apply_move;
use crate::rng::RandomSource;
use crate::spawn::spawn_tile_traced;
use crate::terminal::{has_winning_tile, is_board_stuck};
use crate::types::{Direction, GameStatus, SpawnedTile};

/// Everything a caller needs after one move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResult {
    pub grid: Grid,
    /// Board sum after the turn.
    pub score: u64,
    pub changed: bool,
    pub won: bool,
    pub lost: bool,
    pub spawned: Option<SpawnedTile>,
}

impl TurnResult {
    pub fn status(&self) -> GameStatus {
        if self.won {
            GameStatus::Won
        } else if self.lost {
            GameStatus::Lost
        } else {
            GameStatus::Playing
        }
    }
}

/// Play one turn.
///
/// A move that leaves the board as it was spawns nothing, draws nothing from
/// `rng` and reports `won == lost == false`.
pub fn play_turn<R: RandomSource + ?Sized>(
    grid: &Grid,
    direction: Direction,
    config: &EngineConfig,
    rng: &mut R,
) -> TurnResult {
    let outcome = apply_move(grid, direction);
    if !outcome.changed {
        return TurnResult {
            score: compute_score(grid),
            grid: grid.clone(),
            changed: false,
            won: false,
            lost: false,
            spawned: None,
        };
    }

    let (grid, spawned) = spawn_tile_traced(&outcome.grid, &config.spawn, rng);
    let won = has_winning_tile(&grid, config.win_target);
    let lost = !won && is_board_stuck(&grid);

    TurnResult {
        score: compute_score(&grid),
        grid,
        changed: true,
        won,
        lost,
        spawned,
    }
}
