//! Square cell grids shared by markers, QR module matrices and pattern rasters.
//!
//! Rotation is clockwise; resampling picks the nearest source cell.

use crate::foundation::error::{MarkerError, MarkerResult};

/// Square matrix of cells, `true` meaning dark.
///
/// Used both for marker grids and for QR module matrices. Cells are stored
/// row-major; `(row, col)` with row 0 at the top.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// An all-light grid of side `size`.
    pub fn light(size: usize) -> Self {
        Self {
            size,
            cells: vec![false; size * size],
        }
    }

    /// Build a grid from row vectors. Every row must be as long as the row count.
    pub fn from_rows(rows: &[Vec<bool>]) -> MarkerResult<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(MarkerError::validation("grid must have at least one row"));
        }
        let mut cells = Vec::with_capacity(size * size);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(MarkerError::validation(format!(
                    "grid row {i} has {} cells, expected {size}",
                    row.len()
                )));
            }
            cells.extend_from_slice(row);
        }
        Ok(Self { size, cells })
    }

    /// Parse text rows where `1`/`#` is dark and `0`/`.` is light.
    pub fn parse_rows<S: AsRef<str>>(rows: &[S]) -> MarkerResult<Self> {
        let parsed = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.as_ref()
                    .chars()
                    .map(|c| match c {
                        '1' | '#' => Ok(true),
                        '0' | '.' => Ok(false),
                        other => Err(MarkerError::validation(format!(
                            "grid row {i}: unexpected cell character {other:?}"
                        ))),
                    })
                    .collect::<MarkerResult<Vec<bool>>>()
            })
            .collect::<MarkerResult<Vec<_>>>()?;
        Self::from_rows(&parsed)
    }

    /// Side length in cells.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the cell at `(row, col)` is dark.
    ///
    /// Panics when the position is outside the grid.
    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        assert!(row < self.size && col < self.size, "cell out of range");
        self.cells[row * self.size + col]
    }

    /// Set the cell at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, dark: bool) {
        assert!(row < self.size && col < self.size, "cell out of range");
        self.cells[row * self.size + col] = dark;
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks_exact(self.size.max(1))
    }

    /// Number of dark cells.
    pub fn dark_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Rotate 90 degrees clockwise: `out[y][x] = in[n-1-x][y]`.
    pub fn rotate_cw(&self) -> Self {
        let n = self.size;
        let mut out = Self::light(n);
        for y in 0..n {
            for x in 0..n {
                out.cells[y * n + x] = self.cells[(n - 1 - x) * n + y];
            }
        }
        out
    }

    /// The grid at 0, 90, 180 and 270 degrees clockwise, in that order.
    pub fn rotations(&self) -> [Self; 4] {
        let r90 = self.rotate_cw();
        let r180 = r90.rotate_cw();
        let r270 = r180.rotate_cw();
        [self.clone(), r90, r180, r270]
    }

    /// Nearest-neighbour resample to a `target x target` grid.
    pub fn resample(&self, target: usize) -> Self {
        let mut out = Self::light(target);
        for y in 0..target {
            let sy = y * self.size / target;
            for x in 0..target {
                let sx = x * self.size / target;
                out.cells[y * target + x] = self.cells[sy * self.size + sx];
            }
        }
        out
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Grid({}x{})", self.size, self.size)?;
        write!(f, "{self}")
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|&d| if d { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/code/grid.rs"]
mod tests;
