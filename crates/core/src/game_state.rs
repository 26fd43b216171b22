//! Game state module - the state container around the grid engine
//!
//! The engine functions are pure; `GameState` is the one place that owns the
//! current board and serializes turns. It keeps the bookkeeping front ends
//! need (status, move counter, episode id, seed) and the random source the
//! spawner draws from.

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::grid::{compute_score, Grid, GridError};
use crate::rng::{RandomSource, SimpleRng};
use crate::snapshot::GameSnapshot;
use crate::spawn::create_initial_board;
use crate::terminal::{has_winning_tile, is_board_stuck};
use crate::turn::{play_turn, TurnResult};
use crate::types::{Direction, GameAction, GameStatus, SpawnedTile};

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState<R = SimpleRng> {
    config: EngineConfig,
    grid: Grid,
    score: u64,
    status: GameStatus,
    /// Moves that changed the board in this episode.
    moves: u32,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    seed: u32,
    last_spawn: Option<SpawnedTile>,
    rng: R,
}

impl GameState<SimpleRng> {
    /// Create a new game with the given RNG seed
    pub fn new(config: EngineConfig, seed: u32) -> Self {
        let mut state = Self::with_rng(config, SimpleRng::new(seed));
        state.seed = seed;
        state
    }
}

impl<R: RandomSource> GameState<R> {
    /// Create a new game drawing from `rng`. The reported seed is 0.
    pub fn with_rng(config: EngineConfig, mut rng: R) -> Self {
        let grid = create_initial_board(config.size, &config.spawn, &mut rng);
        Self::from_parts(config, grid, rng)
    }

    /// Resume play from an existing board. The board must match
    /// `config.size`, since a restart builds a board of that size.
    pub fn with_grid(config: EngineConfig, grid: Grid, rng: R) -> Result<Self, GridError> {
        if grid.size() != config.size {
            return Err(GridError::SizeMismatch {
                expected: config.size,
                actual: grid.size(),
            });
        }
        let mut state = Self::from_parts(config, grid, rng);
        state.refresh_status();
        Ok(state)
    }

    fn from_parts(config: EngineConfig, grid: Grid, rng: R) -> Self {
        Self {
            score: compute_score(&grid),
            config,
            grid,
            status: GameStatus::Playing,
            moves: 0,
            episode_id: 0,
            seed: 0,
            last_spawn: None,
            rng,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn last_spawn(&self) -> Option<SpawnedTile> {
        self.last_spawn
    }

    /// Apply a game action
    ///
    /// Returns whether anything changed. Moves are ignored once the game is
    /// won or lost; restart is always accepted.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Move(direction) => self.try_move(direction).is_some(),
            GameAction::Restart => {
                self.restart();
                true
            }
        }
    }

    /// Play one move. `None` when the game is over or nothing moved.
    pub fn try_move(&mut self, direction: Direction) -> Option<TurnResult> {
        if self.status.is_over() {
            return None;
        }

        let result = play_turn(&self.grid, direction, &self.config, &mut self.rng);
        if !result.changed {
            debug!(direction = direction.as_str(), "move left the board unchanged");
            return None;
        }

        self.grid = result.grid.clone();
        self.score = result.score;
        self.status = result.status();
        self.moves = self.moves.wrapping_add(1);
        self.last_spawn = result.spawned;

        debug!(
            direction = direction.as_str(),
            score = self.score,
            moves = self.moves,
            "move applied"
        );
        if self.status.is_over() {
            info!(
                status = self.status.as_str(),
                score = self.score,
                moves = self.moves,
                episode_id = self.episode_id,
                "game finished"
            );
        }

        Some(result)
    }

    /// Start a fresh board. The random source keeps going, so episodes differ.
    pub fn restart(&mut self) {
        self.grid = create_initial_board(self.config.size, &self.config.spawn, &mut self.rng);
        self.score = compute_score(&self.grid);
        self.status = GameStatus::Playing;
        self.moves = 0;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.last_spawn = None;
        debug!(episode_id = self.episode_id, "game restarted");
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.size = self.grid.size();
        out.cells.clear();
        out.cells.extend_from_slice(self.grid.cells());
        out.score = self.score;
        out.status = self.status;
        out.moves = self.moves;
        out.episode_id = self.episode_id;
        out.seed = self.seed;
        out.target = self.config.win_target;
        out.last_spawn = self.last_spawn;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    fn refresh_status(&mut self) {
        self.status = if has_winning_tile(&self.grid, self.config.win_target) {
            GameStatus::Won
        } else if is_board_stuck(&self.grid) {
            GameStatus::Lost
        } else {
            GameStatus::Playing
        };
    }
}
