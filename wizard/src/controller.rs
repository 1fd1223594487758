//! Async wizard driver for front ends that own their state directly.
//!
//! ARCHITECTURE
//! ============
//! `Controller` pairs a [`WizardState`] with a [`Backend`] and runs each
//! operation as begin -> call -> finish. Reactive front ends that cannot hold
//! a borrow across an await use the same transitions on `WizardState`
//! directly instead.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use crate::api::ModelOutcome;
use crate::backend::{Backend, CANVAS_EDIT_FILENAME, DEFAULT_CANVAS_PROMPT, ImageFile, TEXT_EDIT_FILENAME};
use crate::config::BackendConfig;
use crate::error::{ApiError, WizardError};
use crate::state::{Operation, WizardState};

/// Where and under which name the generated model should be saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadTarget {
    pub url: String,
    pub filename: String,
}

/// Compute the download target for the current result, if a model exists.
#[must_use]
pub fn download_target(state: &WizardState, config: &BackendConfig) -> Option<DownloadTarget> {
    let Some(model) = state.result().model.as_deref() else {
        log::warn!("no model available for download");
        return None;
    };
    let filename = state
        .session()
        .map_or_else(|| "keychain.stl".to_owned(), crate::state::Session::download_filename);
    Some(DownloadTarget { url: config.resolve(model), filename })
}

/// Prompt actually sent with a canvas edit.
#[must_use]
pub fn canvas_prompt(prompt: &str) -> String {
    if prompt.trim().is_empty() {
        DEFAULT_CANVAS_PROMPT.to_owned()
    } else {
        prompt.to_owned()
    }
}

// --- Backend calls against a state snapshot ---
//
// These run between `begin` and `finish_*`. They only read `state`, so a
// reactive front end can pass a clone taken when the operation began.

/// Fetch the current silhouette and submit it with `prompt`.
///
/// # Errors
///
/// [`ApiError::Resource`] when there is no silhouette or session, otherwise
/// whatever the backend returns.
pub async fn run_text_edit<B: Backend>(backend: &B, state: &WizardState, prompt: &str) -> Result<String, ApiError> {
    let current = state
        .images()
        .current_2d
        .clone()
        .ok_or_else(|| ApiError::Resource("no silhouette to edit".to_owned()))?;
    let bytes = backend.fetch_resource(&current).await?;
    let request = state
        .edit_request(prompt, ImageFile::png(TEXT_EDIT_FILENAME, bytes))
        .map_err(|e| ApiError::Resource(e.to_string()))?;
    log::info!("text edit v{}: {prompt}", request.version);
    backend.edit_2d(request).await
}

/// Submit a flattened annotation canvas, defaulting a blank prompt.
///
/// # Errors
///
/// [`ApiError::Resource`] without a session, otherwise the backend's error.
pub async fn run_canvas_edit<B: Backend>(
    backend: &B,
    state: &WizardState,
    flattened: Vec<u8>,
    prompt: &str,
) -> Result<String, ApiError> {
    let request = state
        .edit_request(canvas_prompt(prompt), ImageFile::png(CANVAS_EDIT_FILENAME, flattened))
        .map_err(|e| ApiError::Resource(e.to_string()))?;
    log::info!("canvas edit v{} ({} bytes)", request.version, request.image.bytes.len());
    backend.edit_2d(request).await
}

/// Request the 3D model, forwarding any uncommitted prompt.
///
/// # Errors
///
/// [`ApiError::Resource`] without a session, otherwise the backend's error.
pub async fn run_generate_3d<B: Backend>(backend: &B, state: &WizardState) -> Result<ModelOutcome, ApiError> {
    let request = state
        .generate_request()
        .map_err(|e| ApiError::Resource(e.to_string()))?;
    log::info!("generating 3D model for session {}", request.session_id);
    backend.generate_3d(request).await
}

pub struct Controller<B> {
    backend: B,
    state: WizardState,
}

impl<B: Backend> Controller<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend, state: WizardState::new() }
    }

    #[must_use]
    pub fn state(&self) -> &WizardState {
        &self.state
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn set_edit_prompt(&mut self, text: impl Into<String>) {
        self.state.set_edit_prompt(text);
    }

    /// Upload a sketch and advance to Review on success.
    ///
    /// `original` is the caller's local reference to the sketch, kept for display.
    ///
    /// # Errors
    ///
    /// Guard refusals from [`WizardState::begin`] or [`WizardError::Failed`].
    pub async fn submit_upload(&mut self, image: ImageFile, original: Option<String>) -> Result<(), WizardError> {
        let ticket = self.state.begin(Operation::Upload)?;
        log::info!("uploading {} ({} bytes)", image.name, image.bytes.len());
        let outcome = self.backend.generate_2d(image).await;
        self.state.finish_upload(ticket, outcome, original)
    }

    /// Re-submit the current silhouette with a text instruction.
    ///
    /// A blank prompt is a no-op. The prompt is recorded only once the
    /// operation is accepted, so refusals leave the state as it was.
    ///
    /// # Errors
    ///
    /// Guard refusals from [`WizardState::begin`] or [`WizardError::Failed`].
    pub async fn submit_text_edit(&mut self, prompt: &str) -> Result<(), WizardError> {
        if prompt.trim().is_empty() {
            log::debug!("ignoring text edit with empty prompt");
            return Ok(());
        }
        let ticket = self.state.begin(Operation::TextEdit)?;
        self.state.set_edit_prompt(prompt);
        let outcome = run_text_edit(&self.backend, &self.state, prompt).await;
        self.state.finish_edit(ticket, outcome)
    }

    /// Submit a flattened annotation canvas as the next revision.
    ///
    /// # Errors
    ///
    /// Guard refusals from [`WizardState::begin`] or [`WizardError::Failed`].
    pub async fn submit_canvas_edit(&mut self, flattened: Vec<u8>, prompt: &str) -> Result<(), WizardError> {
        let ticket = self.state.begin(Operation::CanvasEdit)?;
        let outcome = run_canvas_edit(&self.backend, &self.state, flattened, prompt).await;
        self.state.finish_edit(ticket, outcome)
    }

    /// Generate the 3D model and advance to Result on success.
    ///
    /// # Errors
    ///
    /// Guard refusals from [`WizardState::begin`] or [`WizardError::Failed`].
    pub async fn submit_generate_3d(&mut self) -> Result<(), WizardError> {
        let ticket = self.state.begin(Operation::Generate3d)?;
        let outcome = run_generate_3d(&self.backend, &self.state).await;
        self.state.finish_generate(ticket, outcome)
    }

    /// Download target for the generated model; `None` (logged) when absent.
    #[must_use]
    pub fn download_target(&self, config: &BackendConfig) -> Option<DownloadTarget> {
        download_target(&self.state, config)
    }

    /// Start over. The backend is not told about the abandoned session.
    pub fn restart(&mut self) {
        self.state.restart();
    }
}
