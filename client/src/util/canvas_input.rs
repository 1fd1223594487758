//! Pointer mapping from page coordinates into editor canvas space.
//!
//! The canvas keeps a fixed 512x512 backing store but may be laid out at a
//! different CSS size, so client coordinates are rescaled against the element
//! bounding box before they reach the editor.

#[cfg(test)]
#[path = "canvas_input_test.rs"]
mod canvas_input_test;

use canvas::consts::CANVAS_SIZE;
use canvas::geom::Point;

/// On-page box of the canvas element, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Map a client-space position to canvas backing-store pixels.
///
/// A zero-sized rect (element hidden mid-drag) maps without scaling.
pub fn map_to_canvas(client_x: f64, client_y: f64, rect: ElementRect) -> Point {
    let size = f64::from(CANVAS_SIZE);
    let sx = if rect.width > 0.0 { size / rect.width } else { 1.0 };
    let sy = if rect.height > 0.0 { size / rect.height } else { 1.0 };
    Point::new((client_x - rect.left) * sx, (client_y - rect.top) * sy)
}

#[cfg(feature = "csr")]
pub fn pointer_point(ev: &leptos::ev::PointerEvent, canvas: &web_sys::HtmlCanvasElement) -> Point {
    let dom = canvas.get_bounding_client_rect();
    let rect = ElementRect { left: dom.left(), top: dom.top(), width: dom.width(), height: dom.height() };
    map_to_canvas(f64::from(ev.client_x()), f64::from(ev.client_y()), rect)
}

#[cfg(feature = "csr")]
pub fn pointer_button(ev: &leptos::ev::PointerEvent) -> canvas::input::Button {
    canvas::input::Button::from_dom(ev.button())
}
