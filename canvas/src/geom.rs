//! Canvas-space geometry: points and background placement.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in canvas pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Where a background image lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Uniform scale applied to the source image.
    pub scale: f64,
    pub left: f64,
    pub top: f64,
    /// Scaled width in canvas pixels.
    pub width: f64,
    /// Scaled height in canvas pixels.
    pub height: f64,
}

/// Fit a `src_w`×`src_h` image inside `bounds_w`×`bounds_h`, preserving aspect
/// ratio without cropping, and center it.
///
/// Returns `None` when any dimension is zero.
#[must_use]
pub fn fit_centered(src_w: u32, src_h: u32, bounds_w: u32, bounds_h: u32) -> Option<Placement> {
    if src_w == 0 || src_h == 0 || bounds_w == 0 || bounds_h == 0 {
        return None;
    }
    let (sw, sh) = (f64::from(src_w), f64::from(src_h));
    let (bw, bh) = (f64::from(bounds_w), f64::from(bounds_h));
    let scale = (bw / sw).min(bh / sh);
    let width = sw * scale;
    let height = sh * scale;
    Some(Placement {
        scale,
        left: (bw - width) / 2.0,
        top: (bh - height) / 2.0,
        width,
        height,
    })
}
