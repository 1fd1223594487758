//! In-memory RGBA surface backed by the `image` crate.
//!
//! Used by the CLI to flatten annotation documents without a browser, and by
//! tests to check the exported pixels. Ink is stamped as discs along each
//! segment, which matches the round caps and joins of the browser canvas.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::consts::{CANVAS_FILL, CANVAS_SIZE, INK_COLOR, INK_WIDTH};
use crate::doc::Stroke;
use crate::geom::{Placement, Point};
use crate::surface::{Surface, SurfaceError};

/// Decode image bytes (PNG, JPEG, or WebP).
///
/// # Errors
///
/// Returns [`SurfaceError::Decode`] for unsupported or corrupt data.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, SurfaceError> {
    image::load_from_memory(bytes).map_err(|e| SurfaceError::Decode(e.to_string()))
}

/// Encode an RGBA buffer as PNG.
///
/// # Errors
///
/// Returns [`SurfaceError::Encode`] if the encoder fails.
pub fn encode_png(pixels: &RgbaImage) -> Result<Vec<u8>, SurfaceError> {
    let mut out = Cursor::new(Vec::new());
    pixels
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| SurfaceError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}

struct Background {
    pixels: RgbaImage,
    left: i64,
    top: i64,
}

pub struct RasterSurface {
    size: u32,
    canvas: RgbaImage,
    background: Option<Background>,
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self::with_size(CANVAS_SIZE)
    }
}

impl RasterSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A square surface of `size` pixels.
    #[must_use]
    pub fn with_size(size: u32) -> Self {
        Self {
            size,
            canvas: RgbaImage::from_pixel(size, size, Rgba(CANVAS_FILL)),
            background: None,
        }
    }

    /// Current picture.
    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.canvas
    }

    fn stamp_segment(&mut self, from: Point, to: Point) {
        let radius = INK_WIDTH / 2.0;
        let length = from.distance(to);
        let steps = length.ceil().max(1.0);
        let mut i = 0.0;
        while i <= steps {
            let t = i / steps;
            let x = from.x + (to.x - from.x) * t;
            let y = from.y + (to.y - from.y) * t;
            stamp_disc(&mut self.canvas, x, y, radius);
            i += 1.0;
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn stamp_disc(img: &mut RgbaImage, cx: f64, cy: f64, radius: f64) {
    let (w, h) = (i64::from(img.width()), i64::from(img.height()));
    let min_x = ((cx - radius).floor() as i64).max(0);
    let max_x = ((cx + radius).ceil() as i64).min(w - 1);
    let min_y = ((cy - radius).floor() as i64).max(0);
    let max_y = ((cy + radius).ceil() as i64).min(h - 1);
    let r2 = radius * radius;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            if dx * dx + dy * dy <= r2 {
                img.put_pixel(x as u32, y as u32, Rgba(INK_COLOR));
            }
        }
    }
}

impl Surface for RasterSurface {
    type Image = DynamicImage;

    fn natural_size(&self, image: &Self::Image) -> (u32, u32) {
        (image.width(), image.height())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn set_background(&mut self, image: Self::Image, placement: Placement) -> Result<(), SurfaceError> {
        let width = (placement.width.round() as u32).clamp(1, self.size);
        let height = (placement.height.round() as u32).clamp(1, self.size);
        let pixels = imageops::resize(&image.to_rgba8(), width, height, FilterType::Triangle);
        self.background = Some(Background {
            pixels,
            left: placement.left.round() as i64,
            top: placement.top.round() as i64,
        });
        Ok(())
    }

    fn redraw(&mut self, strokes: &[Stroke]) -> Result<(), SurfaceError> {
        self.canvas = RgbaImage::from_pixel(self.size, self.size, Rgba(CANVAS_FILL));
        if let Some(bg) = &self.background {
            imageops::overlay(&mut self.canvas, &bg.pixels, bg.left, bg.top);
        }
        for stroke in strokes {
            for (from, to) in stroke.segments() {
                self.stamp_segment(from, to);
            }
        }
        Ok(())
    }

    fn draw_segment(&mut self, from: Point, to: Point) -> Result<(), SurfaceError> {
        self.stamp_segment(from, to);
        Ok(())
    }

    fn flatten(&self) -> Result<Vec<u8>, SurfaceError> {
        encode_png(&self.canvas)
    }
}
