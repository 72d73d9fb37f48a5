//! Rotation-complete `.patt` templates for square template-matching detectors.
//!
//! A template holds the marker raster at 0, 90, 180 and 270 degrees clockwise.
//! Each rotation is written as three identical channels (B, G, R) of
//! `resolution` rows, each row being `resolution` right-aligned three-column
//! values joined by single spaces. A blank line closes every rotation block.
//! Dark cells are written as 0 and light cells as 255.

use crate::code::grid::Grid;
use crate::foundation::error::{MarkerError, MarkerResult};

/// Raster value of a dark cell.
pub const DARK_SENTINEL: u8 = 0;
/// Raster value of a light cell.
pub const LIGHT_SENTINEL: u8 = 255;
/// Channels per rotation, all carrying the same raster.
pub const PATTERN_CHANNELS: usize = 3;
/// Raster side used by the stock marker trainer.
pub const DEFAULT_RESOLUTION: usize = 16;

/// Pattern export settings.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PatternOptions {
    /// Raster side in pixels.
    pub resolution: usize,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

/// Four rotations of a rasterized grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternTemplate {
    resolution: usize,
    rotations: [Grid; 4],
}

/// Rasterize `grid` to `resolution` pixels square and build all four rotations.
///
/// The raster is a nearest-neighbour resample, so it also accepts QR module
/// matrices larger than `resolution`.
pub fn to_pattern_template(grid: &Grid, resolution: usize) -> MarkerResult<PatternTemplate> {
    if resolution == 0 {
        return Err(MarkerError::validation("pattern resolution must be > 0"));
    }
    Ok(PatternTemplate {
        resolution,
        rotations: grid.resample(resolution).rotations(),
    })
}

impl PatternTemplate {
    /// Raster side in pixels.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Raster of rotation `rot` (quarter turns clockwise, `0..4`).
    ///
    /// Panics when `rot` is 4 or more.
    pub fn rotation(&self, rot: usize) -> &Grid {
        &self.rotations[rot]
    }

    /// Sentinel value at pixel `(y, x)` of rotation `rot`. Every channel holds the same value.
    ///
    /// Panics when `rot` is 4 or more, or the pixel lies outside the raster.
    pub fn value_at(&self, rot: usize, y: usize, x: usize) -> u8 {
        if self.rotations[rot].is_dark(y, x) {
            DARK_SENTINEL
        } else {
            LIGHT_SENTINEL
        }
    }

    /// Serialize in the `.patt` text layout.
    pub fn to_patt_string(&self) -> String {
        let res = self.resolution;
        let mut out = String::with_capacity(4 * PATTERN_CHANNELS * res * (res * 4 + 1) + 4);
        for rot in 0..4 {
            for _channel in 0..PATTERN_CHANNELS {
                for y in 0..res {
                    for x in 0..res {
                        if x > 0 {
                            out.push(' ');
                        }
                        out.push_str(&format!("{:>3}", self.value_at(rot, y, x)));
                    }
                    out.push('\n');
                }
            }
            out.push('\n');
        }
        out
    }

    /// Parse `.patt` text produced by [`PatternTemplate::to_patt_string`].
    ///
    /// Only the two sentinel values are accepted, and the channels of each
    /// rotation must agree.
    pub fn parse(text: &str) -> MarkerResult<Self> {
        let rows = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(i, line)| {
                line.split_whitespace()
                    .map(|tok| match tok.parse::<u8>() {
                        Ok(DARK_SENTINEL) => Ok(true),
                        Ok(LIGHT_SENTINEL) => Ok(false),
                        _ => Err(MarkerError::validation(format!(
                            "pattern row {i}: unexpected value '{tok}'"
                        ))),
                    })
                    .collect::<MarkerResult<Vec<bool>>>()
            })
            .collect::<MarkerResult<Vec<_>>>()?;

        let res = rows.first().map_or(0, Vec::len);
        let block = PATTERN_CHANNELS * res;
        if res == 0 || rows.len() != 4 * block {
            return Err(MarkerError::validation(format!(
                "pattern has {} rows, expected 4 rotations x {PATTERN_CHANNELS} channels x {res} rows",
                rows.len()
            )));
        }

        let mut rotations = Vec::with_capacity(4);
        for chunk in rows.chunks(block) {
            let first = &chunk[..res];
            for channel in chunk.chunks(res).skip(1) {
                if channel != first {
                    return Err(MarkerError::validation(
                        "pattern channels of one rotation differ",
                    ));
                }
            }
            rotations.push(Grid::from_rows(first)?);
        }
        let rotations: [Grid; 4] = rotations
            .try_into()
            .map_err(|_| MarkerError::validation("pattern must hold exactly 4 rotations"))?;
        Ok(Self {
            resolution: res,
            rotations,
        })
    }

    /// Read an `n x n` cell grid back out of rotation `rot`.
    ///
    /// The result is the source grid turned `rot` quarter turns clockwise.
    pub fn cells(&self, rot: usize, n: usize) -> MarkerResult<Grid> {
        let res = self.resolution;
        if rot >= self.rotations.len() {
            return Err(MarkerError::validation(format!(
                "pattern rotation {rot} out of range, expected 0..4"
            )));
        }
        if n == 0 || n > res {
            return Err(MarkerError::validation(format!(
                "cannot read a {n}x{n} grid from a {res}px pattern"
            )));
        }
        // Undo the rotation so every cell maps back onto its resample rows.
        let mut upright = self.rotations[rot].clone();
        for _ in 0..(4 - rot) % 4 {
            upright = upright.rotate_cw();
        }
        let mut grid = Grid::light(n);
        for row in 0..n {
            let y = (row * res).div_ceil(n);
            for col in 0..n {
                let x = (col * res).div_ceil(n);
                grid.set(row, col, upright.is_dark(y, x));
            }
        }
        for _ in 0..rot {
            grid = grid.rotate_cw();
        }
        Ok(grid)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pattern.rs"]
mod tests;
