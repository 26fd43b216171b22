use crate::types::{GameStatus, SpawnedTile, Tile, DEFAULT_BOARD_SIZE, DEFAULT_WIN_TARGET};

/// Owned, read-only copy of a game for views and the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub size: usize,
    /// Row-major, `size * size` values.
    pub cells: Vec<Tile>,
    pub score: u64,
    pub status: GameStatus,
    pub moves: u32,
    pub episode_id: u32,
    pub seed: u32,
    pub target: Tile,
    pub last_spawn: Option<SpawnedTile>,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.cells.clear();
        self.cells.resize(self.size * self.size, 0);
        self.score = 0;
        self.status = GameStatus::Playing;
        self.moves = 0;
        self.episode_id = 0;
        self.seed = 0;
        self.last_spawn = None;
    }

    pub fn tile(&self, row: usize, col: usize) -> Tile {
        if row >= self.size || col >= self.size {
            return 0;
        }
        self.cells[row * self.size + col]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        self.cells.chunks(self.size.max(1))
    }

    pub fn best_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    pub fn won(&self) -> bool {
        self.status == GameStatus::Won
    }

    pub fn lost(&self) -> bool {
        self.status == GameStatus::Lost
    }

    pub fn playable(&self) -> bool {
        !self.status.is_over()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            size: DEFAULT_BOARD_SIZE,
            cells: Vec::new(),
            score: 0,
            status: GameStatus::Playing,
            moves: 0,
            episode_id: 0,
            seed: 0,
            target: DEFAULT_WIN_TARGET,
            last_spawn: None,
        };
        s.clear();
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty_classic_board() {
        let s = GameSnapshot::default();
        assert_eq!(s.cells.len(), 16);
        assert_eq!(s.best_tile(), 0);
        assert!(s.playable());
        assert_eq!(s.rows().count(), 4);
    }

    #[test]
    fn test_tile_out_of_range_reads_empty() {
        let mut s = GameSnapshot::default();
        s.cells[5] = 8;
        assert_eq!(s.tile(1, 1), 8);
        assert_eq!(s.tile(4, 0), 0);
        assert_eq!(s.best_tile(), 8);
    }
}
