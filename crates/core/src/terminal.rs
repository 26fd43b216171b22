//! Terminal-state detection - win and loss

use crate::grid::Grid;
use crate::line::can_merge;
use crate::types::Tile;

/// True iff some cell holds exactly `target`.
pub fn has_winning_tile(grid: &Grid, target: Tile) -> bool {
    grid.cells().contains(&target)
}

/// True iff the board is full and no two orthogonal neighbours can merge.
///
/// A stuck board has no move left in any direction.
pub fn is_board_stuck(grid: &Grid) -> bool {
    if !grid.is_full() {
        return false;
    }

    let n = grid.size();
    for row in 0..n {
        let line = grid.row(row);
        for col in 0..n {
            let v = line[col];
            if col + 1 < n && can_merge(v, line[col + 1]) {
                return false;
            }
            if row + 1 < n && can_merge(v, grid.row(row + 1)[col]) {
                return false;
            }
        }
    }
    true
}
