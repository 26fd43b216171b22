//! Board factory - empty boards and random tile placement
//!
//! Placement draws twice from the random source: first the index of the empty
//! cell (row-major order), then the value roll.

use crate::config::SpawnDistribution;
use crate::grid::Grid;
use crate::rng::RandomSource;
use crate::types::{SpawnedTile, INITIAL_TILES, SPAWN_ROLL_SCALE};

/// A `size`×`size` grid of zeros.
pub fn create_empty_board(size: usize) -> Grid {
    Grid::empty(size)
}

/// Pick an empty cell and a value for a new tile without touching the grid.
///
/// Returns `None` on a full board (and draws nothing from `rng`).
pub fn choose_spawn<R: RandomSource + ?Sized>(
    grid: &Grid,
    dist: &SpawnDistribution,
    rng: &mut R,
) -> Option<SpawnedTile> {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return None;
    }

    let (row, col) = empty[rng.next_below(empty.len() as u32) as usize];
    let value = dist.value_for_roll(rng.next_below(SPAWN_ROLL_SCALE));
    Some(SpawnedTile { row, col, value })
}

/// Place one random tile. A full board comes back unchanged.
pub fn spawn_tile<R: RandomSource + ?Sized>(
    grid: &Grid,
    dist: &SpawnDistribution,
    rng: &mut R,
) -> Grid {
    spawn_tile_traced(grid, dist, rng).0
}

/// Like [`spawn_tile`], also reporting what was placed.
pub fn spawn_tile_traced<R: RandomSource + ?Sized>(
    grid: &Grid,
    dist: &SpawnDistribution,
    rng: &mut R,
) -> (Grid, Option<SpawnedTile>) {
    match choose_spawn(grid, dist, rng) {
        Some(tile) => (grid.with_tile(tile.row, tile.col, tile.value), Some(tile)),
        None => (grid.clone(), None),
    }
}

/// An empty board seeded with the opening tiles.
pub fn create_initial_board<R: RandomSource + ?Sized>(
    size: usize,
    dist: &SpawnDistribution,
    rng: &mut R,
) -> Grid {
    let mut grid = create_empty_board(size);
    for _ in 0..INITIAL_TILES {
        grid = spawn_tile(&grid, dist, rng);
    }
    grid
}
