//! Shared constants for the annotation editor.

// ── Canvas ──────────────────────────────────────────────────────

/// Width and height of the editor canvas in pixels.
pub const CANVAS_SIZE: u32 = 512;

/// RGBA fill behind the background image.
pub const CANVAS_FILL: [u8; 4] = [0xf0, 0xf0, 0xf0, 0xff];

/// CSS form of [`CANVAS_FILL`].
pub const CANVAS_FILL_CSS: &str = "#f0f0f0";

// ── Ink ─────────────────────────────────────────────────────────

/// RGBA ink color for annotations.
pub const INK_COLOR: [u8; 4] = [0xff, 0x00, 0x00, 0xff];

/// CSS form of [`INK_COLOR`].
pub const INK_COLOR_CSS: &str = "red";

/// Stroke width in canvas pixels.
pub const INK_WIDTH: f64 = 5.0;

/// Pointer moves shorter than this (canvas pixels) are merged into the previous point.
pub const MIN_SEGMENT_PX: f64 = 1.0;

// ── Cursors ─────────────────────────────────────────────────────

pub const CURSOR_DRAW: &str = "crosshair";
pub const CURSOR_SELECT: &str = "default";
