//! Local UI state around the wizard (editor overlay, local object URL).
//!
//! DESIGN
//! ======
//! Keeps browser-only presentation concerns out of `WizardState` so the
//! wizard model stays shareable with the CLI.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use wizard::Stage;

/// UI state for the annotation editor overlay and the uploaded sketch preview.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    /// Annotation editor is open over the Review panel.
    pub show_editor: bool,
    /// Object URL for the locally selected sketch. Owned here so it can be revoked.
    pub object_url: Option<String>,
}

impl UiState {
    /// Open the editor. Only the Review stage has a silhouette to annotate.
    pub fn open_editor(&mut self, stage: Stage) -> bool {
        self.show_editor = stage == Stage::Review;
        self.show_editor
    }

    pub fn close_editor(&mut self) {
        self.show_editor = false;
    }

    /// Track a new object URL, returning the previous one for revocation.
    pub fn replace_object_url(&mut self, url: String) -> Option<String> {
        self.object_url.replace(url)
    }

    /// Reset for a new run, returning the object URL to revoke.
    pub fn reset(&mut self) -> Option<String> {
        self.show_editor = false;
        self.object_url.take()
    }
}
