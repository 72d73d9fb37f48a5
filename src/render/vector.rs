use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;

use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{MarkerError, MarkerResult};

/// Fill of a rectangle: the two colors a marker is made of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Fill {
    /// Black.
    Dark,
    /// White.
    Light,
}

impl Fill {
    /// Fill for a grid cell value.
    pub fn from_dark(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    fn svg_color(self) -> &'static str {
        match self {
            Self::Dark => "black",
            Self::Light => "white",
        }
    }
}

/// Axis-aligned filled rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilledRect {
    /// Rectangle in image units.
    pub rect: Rect,
    /// Fill color.
    pub fill: Fill,
}

/// Centered caption text.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    /// Baseline anchor (text is centered on `anchor.x`).
    pub anchor: Point,
    /// Caption.
    pub text: String,
    /// Font size in image units.
    pub font_size: f64,
}

/// Resolution-independent drawing: rectangles painted in order, then labels.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorImage {
    width: f64,
    height: f64,
    rects: Vec<FilledRect>,
    labels: Vec<Label>,
}

impl VectorImage {
    /// Image of the given size with a light background.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            rects: vec![FilledRect {
                rect: Rect::new(0.0, 0.0, width, height),
                fill: Fill::Light,
            }],
            labels: Vec::new(),
        }
    }

    /// Image width in units.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Image height in units.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Rectangles in paint order (background first).
    pub fn rects(&self) -> &[FilledRect] {
        &self.rects
    }

    /// Labels in paint order.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Paint a rectangle on top of everything drawn so far.
    pub fn fill_rect(&mut self, rect: Rect, fill: Fill) {
        self.rects.push(FilledRect { rect, fill });
    }

    /// Add a caption.
    pub fn add_label(&mut self, label: Label) {
        self.labels.push(label);
    }

    /// Fill of the topmost rectangle covering `p`, the way a renderer would paint it.
    pub fn fill_at(&self, p: Point) -> Fill {
        self.rects
            .iter()
            .rev()
            .find(|r| r.rect.contains(p))
            .map_or(Fill::Light, |r| r.fill)
    }

    /// Serialize as an SVG document.
    pub fn to_svg(&self) -> String {
        let (w, h) = (num(self.width), num(self.height));
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#
        );
        for r in &self.rects {
            let _ = write!(
                svg,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                num(r.rect.x0),
                num(r.rect.y0),
                num(r.rect.width()),
                num(r.rect.height()),
                r.fill.svg_color()
            );
        }
        for l in &self.labels {
            let _ = write!(
                svg,
                r##"<text x="{}" y="{}" text-anchor="middle" font-family="Arial" font-size="{}" fill="#666">{}</text>"##,
                num(l.anchor.x),
                num(l.anchor.y),
                num(l.font_size),
                escape_xml(&l.text)
            );
        }
        svg.push_str("</svg>");
        svg
    }

    /// Rasterize at `scale` pixels per unit into straight-alpha RGBA8.
    pub fn rasterize(&self, scale: f32) -> MarkerResult<image::RgbaImage> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(MarkerError::validation("raster scale must be positive"));
        }
        let width = to_px(self.width, scale)?;
        let height = to_px(self.height, scale)?;

        let mut opts = usvg::Options::default();
        if !self.labels.is_empty() {
            opts.fontdb_mut().load_system_fonts();
        }
        let tree = usvg::Tree::from_str(&self.to_svg(), &opts).context("parse marker svg")?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| MarkerError::validation("failed to allocate marker pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        let mut data = pixmap.data().to_vec();
        demultiply_rgba8_in_place(&mut data);
        image::RgbaImage::from_raw(width, height, data)
            .ok_or_else(|| MarkerError::validation("pixmap size does not match raster"))
    }

    /// Write to `path`: `.png` is rasterized at `scale`, anything else is SVG.
    pub fn save(&self, path: &Path, scale: f32) -> MarkerResult<()> {
        let is_png = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if is_png {
            self.rasterize(scale)?
                .save_with_format(path, image::ImageFormat::Png)
                .with_context(|| format!("write png '{}'", path.display()))?;
        } else {
            std::fs::write(path, self.to_svg())
                .with_context(|| format!("write svg '{}'", path.display()))?;
        }
        Ok(())
    }
}

fn to_px(units: f64, scale: f32) -> MarkerResult<u32> {
    const MAX_DIM: f64 = 16_384.0;
    let px = (units * f64::from(scale)).ceil();
    if !px.is_finite() || px < 1.0 || px > MAX_DIM {
        return Err(MarkerError::validation(format!(
            "raster size {px} out of range (1..={MAX_DIM})"
        )));
    }
    Ok(px as u32)
}

// Integral values print without a fractional part so the SVG stays compact.
fn num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/vector.rs"]
mod tests;
