//! CPU-rendered PNG snapshots of a field.
//!
//! Points are projected orthographically onto an image and their colors
//! summed, the same additive look the viewer gets from its blend state.
//! No GPU is needed, so this also works on headless machines.

use std::path::Path;

use glam::Vec3;
use image::{Rgb, RgbImage};

use crate::color;
use crate::error::PreviewError;
use crate::field::Field;

/// Which plane the field is projected onto.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Projection {
    /// Looking down the Y axis at the disc (x right, z down).
    #[default]
    TopDown,
    /// Looking along the Z axis at the disc's edge (x right, y up).
    EdgeOn,
}

/// Options for [`render_preview`].
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewOptions {
    pub width: u32,
    pub height: u32,
    /// Half-width of the visible world region. `None` uses the field's
    /// radius plus one, the largest per-axis jitter; in-plane offsets can
    /// reach `√2` along a diagonal, so extreme corner points may be clipped.
    pub extent: Option<f32>,
    /// Contribution of a single point to its pixel.
    pub intensity: f32,
    pub background: Vec3,
    pub projection: Projection,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            extent: None,
            intensity: 0.35,
            background: Vec3::ZERO,
            projection: Projection::TopDown,
        }
    }
}

impl PreviewOptions {
    /// Options with the given canvas size and everything else default.
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

/// Render `field` into an RGB image.
pub fn render_preview(field: &Field, options: &PreviewOptions) -> Result<RgbImage, PreviewError> {
    let (width, height) = (options.width, options.height);
    if width == 0 || height == 0 {
        return Err(PreviewError::EmptyCanvas);
    }

    let extent = options
        .extent
        .filter(|e| e.is_finite() && *e > 0.0)
        .unwrap_or(field.params().radius + 1.0);
    // Keep square pixels: the shorter side spans [-extent, extent].
    let scale = width.min(height) as f32 * 0.5 / extent;
    let (cx, cy) = (width as f32 * 0.5, height as f32 * 0.5);

    let mut accum = vec![Vec3::ZERO; width as usize * height as usize];
    for record in field.records() {
        let p = record.position;
        let (u, v) = match options.projection {
            Projection::TopDown => (p.x, p.z),
            Projection::EdgeOn => (p.x, -p.y),
        };
        let px = (cx + u * scale).floor();
        let py = (cy + v * scale).floor();
        if px < 0.0 || py < 0.0 || px >= width as f32 || py >= height as f32 {
            continue;
        }
        accum[py as usize * width as usize + px as usize] += record.color * options.intensity;
    }

    Ok(RgbImage::from_fn(width, height, |x, y| {
        let c = options.background + accum[y as usize * width as usize + x as usize];
        Rgb([color::to_byte(c.x), color::to_byte(c.y), color::to_byte(c.z)])
    }))
}

/// Render `field` and write it as an image file; the format follows the extension.
pub fn save_preview(field: &Field, path: impl AsRef<Path>, options: &PreviewOptions) -> Result<(), PreviewError> {
    let path = path.as_ref();
    let image = render_preview(field, options)?;
    image.save(path)?;
    tracing::info!(path = %path.display(), points = field.len(), "saved preview");
    Ok(())
}
