//! QR code with a barcode marker embedded in its centre.
//!
//! The marker replaces a square block of QR modules. The block is sized from
//! the marker plus its own quiet zone, converted to modules and rounded
//! outward, then checked against the QR's error-correction budget: the
//! replaced module count must stay strictly below
//! `budget * budget_safety * n^2`. When it does not, the marker shrinks one
//! module at a time.

use crate::code::family::MarkerFamily;
use crate::code::synth::identity_grid;
use crate::foundation::core::{MarkerIdentity, Point, Rect};
use crate::foundation::error::{MarkerError, MarkerResult};
use crate::qr::matrix::QrModules;
use crate::render::marker::{draw_marker, validate_border_ratio};
use crate::render::vector::{Fill, VectorImage};

/// Composite sizing, expressed in QR modules so it scales with `module_px`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositeGeometry {
    /// Image units per QR module.
    pub module_px: f64,
    /// Light margin around the QR, in modules.
    pub qr_quiet_modules: u32,
    /// Preferred side of the marker's dark square, in modules.
    pub marker_modules: u32,
    /// Light margin around the marker, in modules.
    pub marker_quiet_modules: u32,
    /// Marker border thickness as a fraction of the marker side.
    pub border_ratio: f64,
    /// Smallest marker side the planner may shrink to.
    pub min_marker_modules: u32,
    /// Fraction of the declared error-correction budget the clear zone may use.
    pub budget_safety: f64,
}

impl Default for CompositeGeometry {
    fn default() -> Self {
        Self {
            module_px: 8.0,
            qr_quiet_modules: 2,
            marker_modules: 12,
            marker_quiet_modules: 2,
            border_ratio: 0.25,
            min_marker_modules: 6,
            budget_safety: 0.9,
        }
    }
}

impl CompositeGeometry {
    /// Reject sizes that cannot produce a composite.
    pub fn validate(&self) -> MarkerResult<()> {
        if !(self.module_px.is_finite() && self.module_px > 0.0) {
            return Err(MarkerError::validation("composite.module_px must be > 0"));
        }
        if self.min_marker_modules == 0 || self.min_marker_modules > self.marker_modules {
            return Err(MarkerError::validation(
                "composite.min_marker_modules must be in 1..=marker_modules",
            ));
        }
        validate_border_ratio("composite.border_ratio", self.border_ratio)?;
        if !(self.budget_safety > 0.0 && self.budget_safety <= 1.0) {
            return Err(MarkerError::validation(
                "composite.budget_safety must be in (0, 1]",
            ));
        }
        Ok(())
    }
}

/// Planned clear zone: the square block of QR modules left undrawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClearZone {
    /// First cleared module index (row and column).
    pub start: usize,
    /// One past the last cleared module index.
    pub end: usize,
    /// Side of the marker's dark square, in modules.
    pub marker_modules: u32,
    /// Side of the marker's dark square, in image units.
    pub marker_px: f64,
    /// Marker quiet zone width, in image units.
    pub quiet_px: f64,
}

impl ClearZone {
    /// Side of the cleared block, in modules.
    pub fn side_modules(&self) -> usize {
        self.end - self.start
    }

    /// Number of QR modules replaced by the marker.
    pub fn cleared_modules(&self) -> usize {
        self.side_modules() * self.side_modules()
    }

    /// Whether module `(row, col)` is inside the zone.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.start..self.end).contains(&row) && (self.start..self.end).contains(&col)
    }
}

/// Size the clear zone for an `n x n` QR with error-correction `budget`.
pub fn plan_clear_zone(
    qr_size: usize,
    budget: f64,
    geometry: &CompositeGeometry,
) -> MarkerResult<ClearZone> {
    geometry.validate()?;
    let ms = geometry.module_px;
    let qr_px = qr_size as f64 * ms;
    let center = qr_px / 2.0;
    let quiet_px = f64::from(geometry.marker_quiet_modules) * ms;
    let allowed = budget * geometry.budget_safety * (qr_size * qr_size) as f64;

    for marker_modules in (geometry.min_marker_modules..=geometry.marker_modules).rev() {
        let marker_px = f64::from(marker_modules) * ms;
        let clear_px = marker_px + quiet_px * 2.0;
        let clear_start = center - clear_px / 2.0;
        if clear_start < 0.0 {
            continue;
        }
        let start = (clear_start / ms).floor() as usize;
        let end = ((clear_start + clear_px) / ms).ceil() as usize;
        if end > qr_size {
            continue;
        }
        let zone = ClearZone {
            start,
            end,
            marker_modules,
            marker_px,
            quiet_px,
        };
        if (zone.cleared_modules() as f64) < allowed {
            tracing::debug!(
                qr_size,
                marker_modules,
                cleared = zone.cleared_modules(),
                allowed,
                "clear zone planned"
            );
            return Ok(zone);
        }
        tracing::debug!(
            qr_size,
            marker_modules,
            cleared = zone.cleared_modules(),
            allowed,
            "clear zone over budget, shrinking marker"
        );
    }
    Err(MarkerError::validation(format!(
        "a {qr_size}x{qr_size} QR with budget {budget} cannot hold a marker of \
         {} modules or more",
        geometry.min_marker_modules
    )))
}

/// Render the QR with the marker for `identity` in its clear zone.
pub fn render_composite(
    qr: &QrModules,
    family: MarkerFamily,
    identity: MarkerIdentity,
    geometry: &CompositeGeometry,
) -> MarkerResult<VectorImage> {
    let grid = identity_grid(family, identity)?;
    let n = qr.size();
    let zone = plan_clear_zone(n, qr.budget(), geometry)?;

    let ms = geometry.module_px;
    let quiet = f64::from(geometry.qr_quiet_modules) * ms;
    let qr_px = n as f64 * ms;
    let total = qr_px + quiet * 2.0;
    let mut img = VectorImage::new(total, total);

    for (row, cells) in qr.grid().rows().enumerate() {
        for (col, &dark) in cells.iter().enumerate() {
            if !dark || zone.contains(row, col) {
                continue;
            }
            let x = quiet + col as f64 * ms;
            let y = quiet + row as f64 * ms;
            img.fill_rect(Rect::new(x, y, x + ms, y + ms), Fill::Dark);
        }
    }

    let origin = quiet + qr_px / 2.0 - zone.marker_px / 2.0;
    let q = zone.quiet_px;
    img.fill_rect(
        Rect::new(
            origin - q,
            origin - q,
            origin + zone.marker_px + q,
            origin + zone.marker_px + q,
        ),
        Fill::Light,
    );
    draw_marker(
        &mut img,
        Point::new(origin, origin),
        zone.marker_px,
        zone.marker_px * geometry.border_ratio,
        &grid,
    );
    Ok(img)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
