//! Drawing surface capability.
//!
//! The editor logic never touches pixels. It drives a [`Surface`], which is a
//! browser canvas in the client and an in-memory RGBA buffer in the CLI and
//! tests. Background, strokes, and export all go through this trait.

use crate::doc::Stroke;
use crate::geom::{Placement, Point};

/// Failure inside a surface implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// A draw call failed.
    #[error("draw failed: {0}")]
    Draw(String),

    /// Image bytes could not be decoded.
    #[error("could not decode image: {0}")]
    Decode(String),

    /// The flattened raster could not be encoded.
    #[error("could not encode image: {0}")]
    Encode(String),
}

pub trait Surface {
    /// Loaded background image handle.
    type Image;

    /// Intrinsic pixel size of `image`.
    fn natural_size(&self, image: &Self::Image) -> (u32, u32);

    /// Install the background layer at `placement`. Does not repaint.
    ///
    /// # Errors
    ///
    /// Implementation-specific draw or decode failure.
    fn set_background(&mut self, image: Self::Image, placement: Placement) -> Result<(), SurfaceError>;

    /// Repaint fill, background, and `strokes` bottom first.
    ///
    /// # Errors
    ///
    /// Implementation-specific draw failure.
    fn redraw(&mut self, strokes: &[Stroke]) -> Result<(), SurfaceError>;

    /// Paint one live segment of a stroke still being drawn.
    ///
    /// # Errors
    ///
    /// Implementation-specific draw failure.
    fn draw_segment(&mut self, _from: Point, _to: Point) -> Result<(), SurfaceError> {
        Ok(())
    }

    /// Encode the current picture as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Encode`] when encoding fails.
    fn flatten(&self) -> Result<Vec<u8>, SurfaceError>;
}
