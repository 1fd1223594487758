//! Annotation editor for marking up a generated silhouette.
//!
//! The editor shows a fixed 512×512 canvas with a remote background image and
//! collects freehand red strokes above it. On save it flattens background and
//! strokes into one PNG and hands it, together with a free-text description,
//! back to the host. Editor logic lives in [`engine::EditorCore`], which drives
//! a [`surface::Surface`]: the browser canvas in [`render`] or the in-memory
//! raster in [`raster`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Editor state machine and [`engine::Action`]s for the host |
//! | [`doc`] | Stroke document with LIFO removal and JSON form |
//! | [`geom`] | Canvas points and fit-and-center placement |
//! | [`input`] | Toolbar mode, mouse buttons, and the stroke gesture machine |
//! | [`surface`] | Drawing surface trait and its error type |
//! | [`raster`] | `image`-backed surface for native export and tests |
//! | [`render`] | `CanvasRenderingContext2d`-backed surface for the browser |
//! | [`consts`] | Canvas size, fill, and ink constants |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod input;
pub mod raster;
pub mod render;
pub mod surface;
