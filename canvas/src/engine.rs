use crate::consts::{CANVAS_SIZE, CURSOR_DRAW, CURSOR_SELECT};
use crate::doc::{AnnotationDoc, Stroke, StrokeId};
use crate::geom::{Point, fit_centered};
use crate::input::{Button, InputState, Mode};
use crate::surface::{Surface, SurfaceError};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Background image lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Image fetch in flight; controls disabled.
    Loading,
    /// Background installed; controls enabled.
    Ready,
    /// Fetch or decode failed. Terminal for this editor instance.
    Failed(String),
}

/// Payload handed to the host on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// Flattened background plus strokes, PNG encoded.
    pub image: Vec<u8>,
    /// Free-text description typed next to the canvas.
    pub description: String,
}

/// Actions returned from editor controls for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Save(Export),
    Cancel,
    SetCursor(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    /// A control was used before the background finished loading.
    #[error("editor is not ready")]
    NotReady,

    #[error("failed to load image: {0}")]
    Load(String),

    #[error("flattened image is empty")]
    EmptyExport,

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Resolve a background URL against the backend origin.
///
/// Absolute `http(s)`, `blob:`, and `data:` URLs are returned unchanged.
#[must_use]
pub fn resolve_image_url(url: &str, origin: &str) -> String {
    const ABSOLUTE: [&str; 4] = ["http://", "https://", "blob:", "data:"];
    if ABSOLUTE.iter().any(|scheme| url.starts_with(scheme)) {
        return url.to_owned();
    }
    let origin = origin.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{origin}{url}")
    } else {
        format!("{origin}/{url}")
    }
}

/// Annotation editor state, independent of any particular surface.
///
/// Created by [`EditorCore::mount`] in the `Loading` state. The host fetches
/// [`EditorCore::image_url`] and reports back through `background_loaded` or
/// `background_failed`. Save and cancel produce [`Action`]s; the host is
/// expected to drop the editor afterwards.
pub struct EditorCore<S: Surface> {
    surface: S,
    image_url: String,
    load: LoadState,
    mode: Mode,
    input: InputState,
    doc: AnnotationDoc,
    description: String,
}

impl<S: Surface> EditorCore<S> {
    #[must_use]
    pub fn mount(surface: S, image_url: &str, origin: &str) -> Self {
        let image_url = resolve_image_url(image_url, origin);
        log::debug!("editor mounted for {image_url}");
        Self {
            surface,
            image_url,
            load: LoadState::Loading,
            mode: Mode::Select,
            input: InputState::Idle,
            doc: AnnotationDoc::new(),
            description: String::new(),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.load == LoadState::Ready
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn doc(&self) -> &AnnotationDoc {
        &self.doc
    }

    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.doc.len()
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    // --- Background ---

    /// Install the fetched background, scaled to fit and centered.
    ///
    /// Ignored unless the editor is still loading.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Load`] for a zero-sized image or a surface
    /// failure; the editor is then in the terminal `Failed` state.
    pub fn background_loaded(&mut self, image: S::Image) -> Result<(), EditorError> {
        if self.load != LoadState::Loading {
            log::debug!("ignoring background for editor in {:?}", self.load);
            return Ok(());
        }
        let (w, h) = self.surface.natural_size(&image);
        let Some(placement) = fit_centered(w, h, CANVAS_SIZE, CANVAS_SIZE) else {
            return Err(self.fail_load("image has no pixels".to_owned()));
        };
        let installed = self
            .surface
            .set_background(image, placement)
            .and_then(|()| self.surface.redraw(self.doc.strokes()));
        if let Err(e) = installed {
            return Err(self.fail_load(e.to_string()));
        }
        self.load = LoadState::Ready;
        Ok(())
    }

    /// Record that the background could not be fetched. There is no retry.
    pub fn background_failed(&mut self, reason: impl Into<String>) {
        if self.load == LoadState::Loading {
            self.fail_load(reason.into());
        }
    }

    fn fail_load(&mut self, reason: String) -> EditorError {
        log::warn!("editor background failed: {reason}");
        self.load = LoadState::Failed(reason.clone());
        EditorError::Load(reason)
    }

    fn ensure_ready(&self) -> Result<(), EditorError> {
        if self.is_ready() { Ok(()) } else { Err(EditorError::NotReady) }
    }

    // --- Controls ---

    /// Switch to draw mode.
    ///
    /// # Errors
    ///
    /// [`EditorError::NotReady`] until the background is installed.
    pub fn enable_drawing(&mut self) -> Result<Action, EditorError> {
        self.ensure_ready()?;
        self.mode = Mode::Draw;
        Ok(Action::SetCursor(CURSOR_DRAW))
    }

    /// Switch to select mode, committing any stroke in progress.
    ///
    /// # Errors
    ///
    /// [`EditorError::NotReady`] until the background is installed.
    pub fn disable_drawing(&mut self) -> Result<Action, EditorError> {
        self.ensure_ready()?;
        self.commit_stroke()?;
        self.mode = Mode::Select;
        Ok(Action::SetCursor(CURSOR_SELECT))
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        self.description = text.into();
    }

    /// Remove the most recent stroke, if any.
    ///
    /// # Errors
    ///
    /// [`EditorError::NotReady`] until the background is installed.
    pub fn undo(&mut self) -> Result<Option<Stroke>, EditorError> {
        self.ensure_ready()?;
        let discarded_partial = self.input.finish().is_some();
        let removed = self.doc.pop();
        if removed.is_some() || discarded_partial {
            self.surface.redraw(self.doc.strokes())?;
        }
        Ok(removed)
    }

    /// Flatten background and strokes and hand them to the host.
    ///
    /// Leaves drawing disabled. Strokes and description are kept.
    ///
    /// # Errors
    ///
    /// [`EditorError::NotReady`] until the background is installed,
    /// [`EditorError::EmptyExport`] if the surface produced no bytes.
    pub fn save(&mut self) -> Result<Action, EditorError> {
        self.ensure_ready()?;
        self.commit_stroke()?;
        self.mode = Mode::Select;
        let image = self.surface.flatten()?;
        if image.is_empty() {
            return Err(EditorError::EmptyExport);
        }
        log::debug!("editor export: {} strokes, {} bytes", self.doc.len(), image.len());
        Ok(Action::Save(Export { image, description: self.description.clone() }))
    }

    /// Abandon the editor. Always available, even while loading or failed.
    pub fn cancel(&mut self) -> Action {
        self.input = InputState::Idle;
        Action::Cancel
    }

    /// Append every stroke of `doc` on top of the current ones.
    ///
    /// # Errors
    ///
    /// [`EditorError::NotReady`] until the background is installed.
    pub fn replay(&mut self, doc: &AnnotationDoc) -> Result<usize, EditorError> {
        self.ensure_ready()?;
        let mut added = 0;
        for stroke in doc.strokes() {
            if self.doc.push(stroke.clone()) {
                added += 1;
            }
        }
        self.surface.redraw(self.doc.strokes())?;
        Ok(added)
    }

    // --- Pointer input ---

    /// Begin a stroke when drawing is enabled and the primary button is pressed.
    ///
    /// # Errors
    ///
    /// Surface failure while painting the initial dot.
    pub fn on_pointer_down(&mut self, at: Point, button: Button) -> Result<(), EditorError> {
        if !self.is_ready() || self.mode != Mode::Draw || button != Button::Primary {
            return Ok(());
        }
        self.input = InputState::start(at);
        self.surface.draw_segment(at, at)?;
        Ok(())
    }

    /// Extend the active stroke.
    ///
    /// # Errors
    ///
    /// Surface failure while painting the segment.
    pub fn on_pointer_move(&mut self, at: Point) -> Result<(), EditorError> {
        if let Some((from, to)) = self.input.extend(at) {
            self.surface.draw_segment(from, to)?;
        }
        Ok(())
    }

    /// Commit the active stroke. Returns its id when one was added.
    ///
    /// # Errors
    ///
    /// Surface failure while repainting.
    pub fn on_pointer_up(&mut self, at: Point) -> Result<Option<StrokeId>, EditorError> {
        self.on_pointer_move(at)?;
        self.commit_stroke()
    }

    fn commit_stroke(&mut self) -> Result<Option<StrokeId>, EditorError> {
        let Some(points) = self.input.finish() else {
            return Ok(None);
        };
        let stroke = Stroke::new(points);
        let id = stroke.id;
        if !self.doc.push(stroke) {
            return Ok(None);
        }
        self.surface.redraw(self.doc.strokes())?;
        Ok(Some(id))
    }
}
