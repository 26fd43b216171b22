//! Board rotator - quarter turns of a square grid
//!
//! Rotations only move cells around; values are never touched. They exist so
//! up/down can borrow the row reduction used by left/right.

use crate::grid::Grid;
use crate::types::Tile;

/// Rotate 90° clockwise: row `r` of the result is column `r` read bottom to top.
pub fn rotate_clockwise(grid: &Grid) -> Grid {
    let n = grid.size();
    Grid::from_row_iter(
        n,
        (0..n).map(|col| (0..n).rev().map(|row| cell(grid, row, col)).collect()),
    )
}

/// Rotate 90° counter-clockwise: row `r` of the result is column `n - 1 - r`
/// read top to bottom.
pub fn rotate_counter_clockwise(grid: &Grid) -> Grid {
    let n = grid.size();
    Grid::from_row_iter(
        n,
        (0..n)
            .rev()
            .map(|col| (0..n).map(|row| cell(grid, row, col)).collect()),
    )
}

#[inline(always)]
fn cell(grid: &Grid, row: usize, col: usize) -> Tile {
    grid.cells()[row * grid.size() + col]
}
