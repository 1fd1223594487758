//! Browser surface: draws the editor onto an `HtmlCanvasElement`.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! Export reads the canvas back as a PNG data URL and decodes the base64
//! payload, so the bytes match what the user sees.
//!
//! All fallible `Canvas2D` calls are mapped to [`SurfaceError::Draw`].

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::consts::{CANVAS_FILL_CSS, CANVAS_SIZE, INK_COLOR_CSS, INK_WIDTH};
use crate::doc::Stroke;
use crate::engine::EditorCore;
use crate::geom::{Placement, Point};
use crate::surface::{Surface, SurfaceError};

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// The editor bound to a browser canvas.
pub type Editor = EditorCore<CanvasSurface>;

/// Readable text for a thrown JS value.
fn js_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn draw_err(value: JsValue) -> SurfaceError {
    SurfaceError::Draw(js_message(&value))
}

/// Decode a `data:image/png;base64,...` URL.
///
/// # Errors
///
/// Returns [`SurfaceError::Encode`] for a different prefix or invalid base64.
pub fn decode_png_data_url(url: &str) -> Result<Vec<u8>, SurfaceError> {
    let payload = url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or_else(|| SurfaceError::Encode("canvas did not produce a PNG data URL".to_owned()))?;
    STANDARD
        .decode(payload)
        .map_err(|e| SurfaceError::Encode(e.to_string()))
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    background: Option<(HtmlImageElement, Placement)>,
}

impl CanvasSurface {
    /// Size `canvas` to the editor dimensions and acquire its 2D context.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Draw`] if no 2D context is available.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
        canvas.set_width(CANVAS_SIZE);
        canvas.set_height(CANVAS_SIZE);
        let ctx = canvas
            .get_context("2d")
            .map_err(draw_err)?
            .ok_or_else(|| SurfaceError::Draw("2d context unavailable".to_owned()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::Draw("context is not a 2d context".to_owned()))?;
        ctx.set_fill_style_str(CANVAS_FILL_CSS);
        ctx.fill_rect(0.0, 0.0, f64::from(CANVAS_SIZE), f64::from(CANVAS_SIZE));
        Ok(Self { canvas, ctx, background: None })
    }

    fn set_ink(&self) {
        self.ctx.set_stroke_style_str(INK_COLOR_CSS);
        self.ctx.set_line_width(INK_WIDTH);
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
    }

    fn stroke_path(&self, points: &[Point]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        if rest.is_empty() {
            self.ctx.line_to(first.x, first.y);
        }
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.stroke();
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;

    fn natural_size(&self, image: &Self::Image) -> (u32, u32) {
        (image.natural_width(), image.natural_height())
    }

    fn set_background(&mut self, image: Self::Image, placement: Placement) -> Result<(), SurfaceError> {
        self.background = Some((image, placement));
        Ok(())
    }

    fn redraw(&mut self, strokes: &[Stroke]) -> Result<(), SurfaceError> {
        let size = f64::from(CANVAS_SIZE);
        self.ctx.set_fill_style_str(CANVAS_FILL_CSS);
        self.ctx.fill_rect(0.0, 0.0, size, size);
        if let Some((image, p)) = &self.background {
            self.ctx
                .draw_image_with_html_image_element_and_dw_and_dh(image, p.left, p.top, p.width, p.height)
                .map_err(draw_err)?;
        }
        self.set_ink();
        for stroke in strokes {
            self.stroke_path(&stroke.points);
        }
        Ok(())
    }

    fn draw_segment(&mut self, from: Point, to: Point) -> Result<(), SurfaceError> {
        self.set_ink();
        self.stroke_path(&[from, to]);
        Ok(())
    }

    fn flatten(&self) -> Result<Vec<u8>, SurfaceError> {
        let url = self
            .canvas
            .to_data_url_with_type("image/png")
            .map_err(|e| SurfaceError::Encode(js_message(&e)))?;
        decode_png_data_url(&url)
    }
}
