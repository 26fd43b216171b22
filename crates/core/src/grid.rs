//! Grid module - the N×N matrix of tile values
//!
//! Uses a flat row-major vector for cache locality; coordinates are
//! `(row, col)` with `row` growing downwards and `col` growing rightwards.
//! Every transform elsewhere in the engine builds a new `Grid` instead of
//! mutating one, so a pre-move grid can always be compared to its successor.

use thiserror::Error;

use crate::types::{Tile, MAX_TILE};

/// Reasons a set of rows cannot form a grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid must have at least one row")]
    Empty,
    #[error("row {row} has {len} cells, expected {size}")]
    NotSquare { row: usize, len: usize, size: usize },
    #[error("cell ({row}, {col}) holds {value}, which is neither 0 nor a power of two in 2..={max}", max = MAX_TILE)]
    InvalidTile { row: usize, col: usize, value: Tile },
    #[error("grid is {actual}x{actual}, expected {expected}x{expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// A square board of tiles, `0` meaning empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    /// Flat array of cells, row-major order (row * size + col)
    cells: Vec<Tile>,
}

impl Grid {
    /// Create an empty `size`×`size` grid
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build a grid from nested rows, checking shape and tile values.
    pub fn from_rows<R: AsRef<[Tile]>>(rows: &[R]) -> Result<Self, GridError> {
        let size = rows.len();
        if size == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != size {
                return Err(GridError::NotSquare {
                    row,
                    len: r.len(),
                    size,
                });
            }
            for (col, &value) in r.iter().enumerate() {
                if value != 0 && (value == 1 || value > MAX_TILE || !value.is_power_of_two()) {
                    return Err(GridError::InvalidTile { row, col, value });
                }
                cells.push(value);
            }
        }

        Ok(Self { size, cells })
    }

    /// Build a grid from rows produced by a transform. The caller guarantees
    /// `size` rows of `size` cells each.
    pub(crate) fn from_row_iter(size: usize, rows: impl Iterator<Item = Vec<Tile>>) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            debug_assert_eq!(row.len(), size);
            cells.extend(row);
        }
        Self { size, cells }
    }

    /// Calculate flat index from (row, col)
    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(row * self.size + col)
    }

    /// Side length of the grid
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the tile at (row, col); `None` when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Copy of this grid with one cell replaced. Out-of-bounds writes return
    /// an unchanged copy.
    pub fn with_tile(&self, row: usize, col: usize, value: Tile) -> Self {
        let mut next = self.clone();
        if let Some(idx) = self.index(row, col) {
            next.cells[idx] = value;
        }
        next
    }

    /// One row as a slice
    pub fn row(&self, row: usize) -> &[Tile] {
        let start = row * self.size;
        &self.cells[start..start + self.size]
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        self.cells.chunks(self.size.max(1))
    }

    /// Flat row-major view of every cell
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    /// Nested copy of the rows
    pub fn to_rows(&self) -> Vec<Vec<Tile>> {
        self.rows().map(|r| r.to_vec()).collect()
    }

    /// Positions of all empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(|(i, _)| (i / self.size, i % self.size))
            .collect()
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    /// Largest tile on the board (0 for an empty board)
    pub fn max_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }
}

/// Sum of every tile on the board.
///
/// Score is always derived from the board, never accumulated turn by turn.
pub fn compute_score(grid: &Grid) -> u64 {
    grid.cells().iter().map(|&v| v as u64).sum()
}
