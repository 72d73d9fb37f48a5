//! Codeword to grid synthesis.
//!
//! Format contract shared with the detector:
//!
//! - orientation corners: top-left dark, bottom-left dark, bottom-right light
//! - the remaining cells take codeword bits row-major, most significant first
//! - codeword bit 1 is a dark cell
//!
//! The top-right corner carries data, so no rotation other than the upright
//! one can satisfy all three orientation cells.

use crate::code::family::{MarkerFamily, ORIENTATION_CELL_COUNT};
use crate::code::grid::Grid;
use crate::code::table::{Codeword, DecodeMatch, decode_nearest, encode};
use crate::foundation::core::MarkerIdentity;
use crate::foundation::error::MarkerResult;

/// Fixed orientation cell: position and dark/light value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrientationCell {
    /// Row, 0 at the top.
    pub row: usize,
    /// Column, 0 at the left.
    pub col: usize,
    /// Required value.
    pub dark: bool,
}

/// Orientation cells of an `n x n` marker grid.
pub fn orientation_cells(n: usize) -> [OrientationCell; ORIENTATION_CELL_COUNT] {
    let last = n - 1;
    [
        OrientationCell {
            row: 0,
            col: 0,
            dark: true,
        },
        OrientationCell {
            row: last,
            col: 0,
            dark: true,
        },
        OrientationCell {
            row: last,
            col: last,
            dark: false,
        },
    ]
}

fn is_orientation(n: usize, row: usize, col: usize) -> bool {
    orientation_cells(n)
        .iter()
        .any(|c| c.row == row && c.col == col)
}

fn data_positions(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n)
        .flat_map(move |row| (0..n).map(move |col| (row, col)))
        .filter(move |&(row, col)| !is_orientation(n, row, col))
}

/// Lay `codeword` out on the family's grid.
pub fn to_grid(family: MarkerFamily, codeword: Codeword) -> Grid {
    let n = family.grid_size();
    let mut grid = Grid::light(n);
    for cell in orientation_cells(n) {
        grid.set(cell.row, cell.col, cell.dark);
    }
    let mut bit = family.codeword_bits();
    for (row, col) in data_positions(n) {
        bit -= 1;
        grid.set(row, col, codeword.bit(bit));
    }
    grid
}

/// Grid for `identity`: [`encode`] followed by [`to_grid`].
pub fn identity_grid(family: MarkerFamily, identity: MarkerIdentity) -> MarkerResult<Grid> {
    Ok(to_grid(family, encode(family, identity)?))
}

/// Read the codeword back from an upright grid.
///
/// Returns `None` when the grid size or any orientation cell does not match.
pub fn from_grid(family: MarkerFamily, grid: &Grid) -> Option<Codeword> {
    let n = family.grid_size();
    if grid.size() != n {
        return None;
    }
    if orientation_cells(n)
        .iter()
        .any(|c| grid.is_dark(c.row, c.col) != c.dark)
    {
        return None;
    }
    let word = data_positions(n).fold(0u32, |acc, (row, col)| {
        (acc << 1) | u32::from(grid.is_dark(row, col))
    });
    Some(Codeword(word))
}

/// Rotate `grid` clockwise until its orientation cells match.
///
/// Returns the upright grid and the number of clockwise quarter turns applied.
pub fn orient(family: MarkerFamily, grid: &Grid) -> Option<(Grid, u8)> {
    if grid.size() != family.grid_size() {
        return None;
    }
    grid.rotations()
        .into_iter()
        .zip(0u8..)
        .find(|(g, _)| from_grid(family, g).is_some())
}

/// Orient a grid in any rotation and match it against the codeword table.
pub fn read_grid(family: MarkerFamily, grid: &Grid) -> Option<DecodeMatch> {
    let (upright, _) = orient(family, grid)?;
    from_grid(family, &upright).map(|word| decode_nearest(family, word))
}

#[cfg(test)]
#[path = "../../tests/unit/code/synth.rs"]
mod tests;
