//! Wizard state machine: Upload -> Review -> Result.
//!
//! DESIGN
//! ======
//! All fields are private and change only through the named transitions
//! below. An operation is split in two halves so front ends that keep state in
//! reactive signals can release the borrow across the network await:
//! `begin` claims the single in-flight slot and returns a [`Ticket`], and the
//! matching `finish_*` applies the outcome. A ticket issued before the last
//! `restart` is stale and its outcome is dropped.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::fmt;

use crate::api::{ModelOutcome, UploadOutcome};
use crate::backend::{EditRequest, Generate3dRequest, ImageFile};
use crate::error::{ApiError, WizardError};

/// Revision counter value for the first edit of every run.
pub const INITIAL_EDIT_VERSION: u32 = 2;

/// Current step of the wizard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Waiting for the sketch upload.
    #[default]
    Upload,
    /// Silhouette generated; edits and 3D generation are available.
    Review,
    /// 3D model generated; download is available.
    Result,
}

impl Stage {
    /// All stages in flow order.
    pub const ALL: [Self; 3] = [Self::Upload, Self::Review, Self::Result];

    /// One-based step number shown in the progress indicator.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::Upload => 1,
            Self::Review => 2,
            Self::Result => 3,
        }
    }

    /// Short caption shown under the step number.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Upload => "Upload",
            Self::Review => "Edit 2D",
            Self::Result => "Download 3D",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Upload => "Upload",
            Self::Review => "Review",
            Self::Result => "Result",
        };
        f.write_str(name)
    }
}

/// Backend-issued identifier threaded through every request of one run.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Session(String);

impl Session {
    /// Wrap a session id. Returns `None` for an empty or blank id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() { None } else { Some(Self(id)) }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name the generated model is saved under.
    #[must_use]
    pub fn download_filename(&self) -> String {
        format!("keychain_{}.stl", self.0)
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A backend-bound wizard operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Upload,
    TextEdit,
    CanvasEdit,
    Generate3d,
}

impl Operation {
    /// Stage in which the operation is legal.
    #[must_use]
    pub fn stage(self) -> Stage {
        match self {
            Self::Upload => Stage::Upload,
            Self::TextEdit | Self::CanvasEdit | Self::Generate3d => Stage::Review,
        }
    }

    /// Banner text when the backend reports failure without a message.
    #[must_use]
    pub fn rejected_fallback(self) -> &'static str {
        match self {
            Self::Upload => "2D generation failed",
            Self::TextEdit | Self::CanvasEdit => "Edit failed",
            Self::Generate3d => "3D generation failed",
        }
    }

    /// Banner text when the request itself failed.
    #[must_use]
    pub fn request_fallback(self) -> &'static str {
        match self {
            Self::Upload => "Request error",
            Self::TextEdit | Self::CanvasEdit => "Edit request failed",
            Self::Generate3d => "3D generation request failed",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Upload => "upload",
            Self::TextEdit => "text edit",
            Self::CanvasEdit => "canvas edit",
            Self::Generate3d => "3D generation",
        };
        f.write_str(name)
    }
}

/// Proof that an operation holds the in-flight slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    op: Operation,
    epoch: u64,
}

impl Ticket {
    #[must_use]
    pub fn op(self) -> Operation {
        self.op
    }
}

/// Images shown during the Review stage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Images {
    /// Local reference to the uploaded sketch (an object URL in the browser, a path in the CLI).
    pub original: Option<String>,
    /// Relative resource path of the current silhouette.
    pub current_2d: Option<String>,
}

/// Artifacts of the Result stage. Either may be absent on success.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelResult {
    /// Relative resource path of the STL file.
    pub model: Option<String>,
    /// Relative resource path of the render preview.
    pub preview: Option<String>,
}

/// Complete wizard state for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WizardState {
    stage: Stage,
    session: Option<Session>,
    images: Images,
    edit_prompt: String,
    edit_version: u32,
    result: ModelResult,
    error: Option<String>,
    in_flight: Option<Ticket>,
    epoch: u64,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            stage: Stage::Upload,
            session: None,
            images: Images::default(),
            edit_prompt: String::new(),
            edit_version: INITIAL_EDIT_VERSION,
            result: ModelResult::default(),
            error: None,
            in_flight: None,
            epoch: 0,
        }
    }
}

impl WizardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn images(&self) -> &Images {
        &self.images
    }

    #[must_use]
    pub fn edit_prompt(&self) -> &str {
        &self.edit_prompt
    }

    #[must_use]
    pub fn edit_version(&self) -> u32 {
        self.edit_version
    }

    #[must_use]
    pub fn result(&self) -> &ModelResult {
        &self.result
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while an operation holds the in-flight slot.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The operation currently in flight, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<Operation> {
        self.in_flight.map(Ticket::op)
    }

    /// Whether `ticket` still owns the in-flight slot.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.epoch == self.epoch && self.in_flight == Some(ticket)
    }

    // --- Local edits ---

    pub fn set_edit_prompt(&mut self, text: impl Into<String>) {
        self.edit_prompt = text.into();
    }

    /// Hide the error banner without starting a new operation.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Reset to a fresh run. Outstanding tickets become stale.
    pub fn restart(&mut self) {
        let epoch = self.epoch.wrapping_add(1);
        *self = Self { epoch, ..Self::default() };
    }

    // --- Operation lifecycle ---

    /// Claim the in-flight slot for `op`.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Busy`] while another operation is outstanding,
    /// [`WizardError::WrongStage`] if `op` is not legal in the current stage,
    /// and [`WizardError::NoSession`] for a Review-stage operation without a session.
    pub fn begin(&mut self, op: Operation) -> Result<Ticket, WizardError> {
        if let Some(current) = self.in_flight {
            return Err(WizardError::Busy(current.op));
        }
        if op.stage() != self.stage {
            return Err(WizardError::WrongStage { op, stage: self.stage });
        }
        if op.stage() == Stage::Review && self.session.is_none() {
            return Err(WizardError::NoSession);
        }
        let ticket = Ticket { op, epoch: self.epoch };
        self.in_flight = Some(ticket);
        self.error = None;
        Ok(ticket)
    }

    /// Build the edit payload for the current session and revision.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::NoSession`] before the first successful upload.
    pub fn edit_request(&self, prompt: impl Into<String>, image: ImageFile) -> Result<EditRequest, WizardError> {
        let session = self.session.as_ref().ok_or(WizardError::NoSession)?;
        Ok(EditRequest {
            session_id: session.as_str().to_owned(),
            prompt: prompt.into(),
            image,
            version: self.edit_version,
        })
    }

    /// Build the 3D generation payload, forwarding any uncommitted prompt.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::NoSession`] before the first successful upload.
    pub fn generate_request(&self) -> Result<Generate3dRequest, WizardError> {
        let session = self.session.as_ref().ok_or(WizardError::NoSession)?;
        let prompt = self.edit_prompt.trim();
        Ok(Generate3dRequest {
            session_id: session.as_str().to_owned(),
            prompt: (!prompt.is_empty()).then(|| self.edit_prompt.clone()),
        })
    }

    /// Apply the outcome of the initial silhouette generation.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Superseded`] for a stale ticket (state untouched)
    /// and [`WizardError::Failed`] when the backend call failed (banner set).
    pub fn finish_upload(
        &mut self,
        ticket: Ticket,
        outcome: Result<UploadOutcome, ApiError>,
        original: Option<String>,
    ) -> Result<(), WizardError> {
        self.settle(ticket)?;
        match outcome {
            Ok(upload) => {
                self.session = Some(upload.session);
                self.images = Images { original, current_2d: Some(upload.silhouette) };
                self.edit_version = INITIAL_EDIT_VERSION;
                self.stage = Stage::Review;
                Ok(())
            }
            Err(e) => Err(self.fail(ticket.op, &e)),
        }
    }

    /// Apply the outcome of a text or canvas edit.
    ///
    /// # Errors
    ///
    /// Same as [`Self::finish_upload`].
    pub fn finish_edit(&mut self, ticket: Ticket, outcome: Result<String, ApiError>) -> Result<(), WizardError> {
        self.settle(ticket)?;
        match outcome {
            Ok(silhouette) => {
                self.images.current_2d = Some(silhouette);
                self.edit_version = self.edit_version.saturating_add(1);
                self.edit_prompt.clear();
                Ok(())
            }
            Err(e) => Err(self.fail(ticket.op, &e)),
        }
    }

    /// Apply the outcome of 3D generation.
    ///
    /// # Errors
    ///
    /// Same as [`Self::finish_upload`].
    pub fn finish_generate(
        &mut self,
        ticket: Ticket,
        outcome: Result<ModelOutcome, ApiError>,
    ) -> Result<(), WizardError> {
        self.settle(ticket)?;
        match outcome {
            Ok(model) => {
                self.result = ModelResult { model: model.model, preview: model.preview };
                self.stage = Stage::Result;
                Ok(())
            }
            Err(e) => Err(self.fail(ticket.op, &e)),
        }
    }

    /// Release the in-flight slot held by `ticket`.
    fn settle(&mut self, ticket: Ticket) -> Result<(), WizardError> {
        if !self.is_current(ticket) {
            log::debug!("dropping stale {} outcome", ticket.op);
            return Err(WizardError::Superseded(ticket.op));
        }
        self.in_flight = None;
        Ok(())
    }

    fn fail(&mut self, op: Operation, error: &ApiError) -> WizardError {
        log::warn!("{op} failed: {error}");
        let message = error.user_message(op);
        self.error = Some(message.clone());
        WizardError::Failed { op, message }
    }
}
