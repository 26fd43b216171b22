//! Line reducer - slides and merges a single row towards index 0
//!
//! Every directional move ends up here: the board is rotated/reversed so the
//! move becomes "left", each row goes through [`reduce_line`], and the board is
//! rotated back. Reduction is always compress, merge, compress.

use crate::types::{Tile, MAX_TILE};

/// Pack non-zero tiles to the front, keeping their order, and pad with zeros.
pub fn compress(line: &[Tile]) -> Vec<Tile> {
    let mut out: Vec<Tile> = line.iter().copied().filter(|&v| v != 0).collect();
    out.resize(line.len(), 0);
    out
}

/// Whether two neighbouring tiles combine. Tiles at [`MAX_TILE`] never do.
#[inline]
pub fn can_merge(a: Tile, b: Tile) -> bool {
    a != 0 && a == b && a < MAX_TILE
}

/// Single left-to-right merge sweep.
///
/// A pair `(i, i + 1)` of equal non-zero tiles doubles into `i` and empties
/// `i + 1`. The emptied cell is then the left side of the next comparison, so
/// a freshly merged tile never merges again in the same move.
pub fn merge(line: &[Tile]) -> Vec<Tile> {
    let mut out = line.to_vec();
    for i in 0..out.len().saturating_sub(1) {
        if can_merge(out[i], out[i + 1]) {
            out[i] *= 2;
            out[i + 1] = 0;
        }
    }
    out
}

/// Slide a line towards index 0: compress, merge, compress.
///
/// # Examples
///
/// ```
/// use tui_2048_core::reduce_line;
///
/// assert_eq!(reduce_line(&[2, 0, 2, 2]), vec![4, 2, 0, 0]);
/// assert_eq!(reduce_line(&[2, 2, 2, 2]), vec![4, 4, 0, 0]);
/// ```
pub fn reduce_line(line: &[Tile]) -> Vec<Tile> {
    compress(&merge(&compress(line)))
}

/// Slide a line towards its last index (reverse, reduce, reverse back).
pub fn reduce_line_reversed(line: &[Tile]) -> Vec<Tile> {
    let reversed: Vec<Tile> = line.iter().rev().copied().collect();
    let mut out = reduce_line(&reversed);
    out.reverse();
    out
}
