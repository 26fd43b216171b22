//! Move dispatcher - applies a direction to a whole grid
//!
//! All four directions share the single left-reduction in [`crate::line`]:
//!
//! - **Left**: reduce every row
//! - **Right**: reduce every reversed row
//! - **Up**: rotate counter-clockwise, move left, rotate clockwise
//! - **Down**: rotate counter-clockwise, move right, rotate clockwise
//!
//! Rows never interact, so each one is reduced independently.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::line::{reduce_line, reduce_line_reversed};
use crate::rotate::{rotate_clockwise, rotate_counter_clockwise};
use crate::types::{Direction, Tile};

/// Result of sliding a grid in one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub grid: Grid,
    /// Whether any cell differs from the grid the move started from.
    pub changed: bool,
}

/// Slide every tile in `direction`. The input grid is left untouched.
///
/// # Examples
///
/// ```
/// use tui_2048_core::{apply_move, Grid};
/// use tui_2048_core::types::Direction;
///
/// let grid = Grid::from_rows(&[[2, 0], [2, 0]]).unwrap();
/// let outcome = apply_move(&grid, Direction::Up);
/// assert!(outcome.changed);
/// assert_eq!(outcome.grid.to_rows(), vec![vec![4, 0], vec![0, 0]]);
/// ```
pub fn apply_move(grid: &Grid, direction: Direction) -> MoveOutcome {
    let moved = match direction {
        Direction::Left => map_rows(grid, reduce_line),
        Direction::Right => map_rows(grid, reduce_line_reversed),
        Direction::Up => {
            rotate_clockwise(&map_rows(&rotate_counter_clockwise(grid), reduce_line))
        }
        Direction::Down => rotate_clockwise(&map_rows(
            &rotate_counter_clockwise(grid),
            reduce_line_reversed,
        )),
    };

    let changed = moved != *grid;
    MoveOutcome {
        grid: moved,
        changed,
    }
}

/// Directions that would change the grid, in [`Direction::ALL`] order.
pub fn legal_moves(grid: &Grid) -> ArrayVec<Direction, 4> {
    Direction::ALL
        .iter()
        .copied()
        .filter(|&dir| apply_move(grid, dir).changed)
        .collect()
}

fn map_rows(grid: &Grid, reduce: fn(&[Tile]) -> Vec<Tile>) -> Grid {
    Grid::from_row_iter(grid.size(), grid.rows().map(reduce))
}
