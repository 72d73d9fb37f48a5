//! Standalone barcode marker: dark border square, light inner field, grid.

use crate::code::family::MarkerFamily;
use crate::code::grid::Grid;
use crate::code::synth::identity_grid;
use crate::foundation::core::{MarkerIdentity, Point, Rect};
use crate::foundation::error::{MarkerError, MarkerResult};
use crate::render::vector::{Fill, Label, VectorImage};

/// Sizing of a standalone marker image, in image units.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StandaloneGeometry {
    /// Side of the dark border square.
    pub marker_size: f64,
    /// Border thickness as a fraction of `marker_size`, per side.
    pub border_ratio: f64,
    /// Light quiet zone around the marker.
    pub margin: f64,
    /// Draw the `Marker <id> (<family>)` caption in the bottom margin.
    pub label: bool,
    /// Caption font size.
    pub label_font_size: f64,
}

impl Default for StandaloneGeometry {
    fn default() -> Self {
        Self {
            marker_size: 400.0,
            border_ratio: 0.25,
            margin: 40.0,
            label: true,
            label_font_size: 14.0,
        }
    }
}

impl StandaloneGeometry {
    /// Reject sizes that cannot produce a marker.
    pub fn validate(&self) -> MarkerResult<()> {
        if !(self.marker_size.is_finite() && self.marker_size > 0.0) {
            return Err(MarkerError::validation("standalone.marker_size must be > 0"));
        }
        validate_border_ratio("standalone.border_ratio", self.border_ratio)?;
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(MarkerError::validation("standalone.margin must be >= 0"));
        }
        if self.label && !(self.label_font_size.is_finite() && self.label_font_size > 0.0) {
            return Err(MarkerError::validation(
                "standalone.label_font_size must be > 0",
            ));
        }
        Ok(())
    }

    /// Side of the whole image.
    pub fn total_size(&self) -> f64 {
        self.marker_size + self.margin * 2.0
    }
}

pub(crate) fn validate_border_ratio(field: &str, ratio: f64) -> MarkerResult<()> {
    if ratio.is_finite() && ratio > 0.0 && ratio < 0.5 {
        Ok(())
    } else {
        Err(MarkerError::validation(format!(
            "{field} must be in (0, 0.5), got {ratio}"
        )))
    }
}

/// Paint a marker whose dark square starts at `origin` with side `size`.
pub(crate) fn draw_marker(img: &mut VectorImage, origin: Point, size: f64, border: f64, grid: &Grid) {
    img.fill_rect(
        Rect::new(origin.x, origin.y, origin.x + size, origin.y + size),
        Fill::Dark,
    );
    let inner = size - border * 2.0;
    let ix = origin.x + border;
    let iy = origin.y + border;
    img.fill_rect(Rect::new(ix, iy, ix + inner, iy + inner), Fill::Light);

    let n = grid.size();
    let cell = inner / n as f64;
    for row in 0..n {
        for col in 0..n {
            let x = ix + col as f64 * cell;
            let y = iy + row as f64 * cell;
            img.fill_rect(
                Rect::new(x, y, x + cell, y + cell),
                Fill::from_dark(grid.is_dark(row, col)),
            );
        }
    }
}

/// Render the standalone marker for `identity`.
pub fn render_standalone(
    family: MarkerFamily,
    identity: MarkerIdentity,
    geometry: &StandaloneGeometry,
) -> MarkerResult<VectorImage> {
    geometry.validate()?;
    let grid = identity_grid(family, identity)?;

    let total = geometry.total_size();
    let mut img = VectorImage::new(total, total);
    draw_marker(
        &mut img,
        Point::new(geometry.margin, geometry.margin),
        geometry.marker_size,
        geometry.marker_size * geometry.border_ratio,
        &grid,
    );
    if geometry.label {
        img.add_label(Label {
            anchor: Point::new(total / 2.0, total - 5.0),
            text: format!("Marker {identity} ({family})"),
            font_size: geometry.label_font_size,
        });
    }
    Ok(img)
}

/// Centre of grid cell `(row, col)` in a standalone image.
pub fn standalone_cell_center(geometry: &StandaloneGeometry, n: usize, row: usize, col: usize) -> Point {
    let border = geometry.marker_size * geometry.border_ratio;
    let cell = (geometry.marker_size - border * 2.0) / n as f64;
    let base = geometry.margin + border;
    Point::new(
        base + (col as f64 + 0.5) * cell,
        base + (row as f64 + 0.5) * cell,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/marker.rs"]
mod tests;
