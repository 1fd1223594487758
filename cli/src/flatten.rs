//! Offline annotation export: background plus stroke document to PNG.
//!
//! Runs the same `EditorCore` as the browser, over the `image`-backed
//! `RasterSurface`, so a stroke file produces the picture the editor would
//! have saved.

#[cfg(test)]
#[path = "flatten_test.rs"]
mod flatten_test;

use canvas::doc::AnnotationDoc;
use canvas::engine::{Action, EditorCore, EditorError, Export};
use canvas::raster::{RasterSurface, decode};
use canvas::surface::SurfaceError;

#[derive(Debug, thiserror::Error)]
pub enum FlattenError {
    #[error("cannot decode background: {0}")]
    Decode(#[from] SurfaceError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error("editor did not produce an export")]
    NoExport,
}

/// Flatten `doc` over the background image in `background`.
///
/// `label` only names the background in logs.
///
/// # Errors
///
/// [`FlattenError::Decode`] for an unreadable background, otherwise the
/// editor's error.
pub fn flatten(background: &[u8], label: &str, doc: &AnnotationDoc, description: &str) -> Result<Export, FlattenError> {
    let image = decode(background)?;
    let mut editor = EditorCore::mount(RasterSurface::new(), label, "");
    editor.background_loaded(image)?;
    let replayed = editor.replay(doc)?;
    tracing::debug!(strokes = replayed, %label, "replayed annotation");
    editor.set_description(description);
    match editor.save()? {
        Action::Save(export) => Ok(export),
        Action::Cancel | Action::SetCursor(_) => Err(FlattenError::NoExport),
    }
}
