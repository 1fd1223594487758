//! Error types for backend calls, wizard transitions, and configuration.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is caught at the operation boundary and reduced to a message
//! the banner can show. Backend-supplied text wins; otherwise each operation
//! has its own fallback so the user can tell which step failed.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::state::{Operation, Stage};

/// Failure of a single backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No response arrived (connection refused, DNS, CORS, aborted body).
    #[error("request failed: {0}")]
    Transport(String),

    /// The call did not complete within the configured request timeout.
    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The server answered with a non-success HTTP status.
    #[error("server responded with status {status}")]
    Status { status: u16, detail: Option<String> },

    /// The envelope reported `success: false`.
    #[error("backend rejected request: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { message: Option<String> },

    /// The body could not be decoded or lacked a required field.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// A local resource (file, image bytes) could not be read or decoded.
    #[error("{0}")]
    Resource(String),
}

impl ApiError {
    /// Message for the error banner when this error ends `op`.
    #[must_use]
    pub fn user_message(&self, op: Operation) -> String {
        match self {
            Self::Rejected { message: Some(message) } if !message.trim().is_empty() => message.clone(),
            Self::Rejected { .. } => op.rejected_fallback().to_owned(),
            Self::Status { detail: Some(detail), .. } if !detail.trim().is_empty() => detail.clone(),
            Self::Resource(message) if !message.trim().is_empty() => message.clone(),
            Self::Transport(_) | Self::Timeout { .. } | Self::Status { .. } | Self::Malformed(_) | Self::Resource(_) => {
                op.request_fallback().to_owned()
            }
        }
    }
}

/// Refusal or failure of a wizard operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    /// Another operation is still outstanding.
    #[error("{0} is already in progress")]
    Busy(Operation),

    /// The operation is not legal in the current stage.
    #[error("{op} is not available during the {stage} stage")]
    WrongStage { op: Operation, stage: Stage },

    /// A Review-stage operation ran without a session.
    #[error("no active session")]
    NoSession,

    /// The backend call failed; the message is also stored in the state's error banner.
    #[error("{message}")]
    Failed { op: Operation, message: String },

    /// The wizard was restarted while the call was outstanding; its result was dropped.
    #[error("{0} was superseded by a restart")]
    Superseded(Operation),
}

/// Invalid backend configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Origin is empty or not an `http(s)://` URL.
    #[error("invalid backend origin: {0:?}")]
    InvalidOrigin(String),

    /// API prefix contains a scheme or whitespace.
    #[error("invalid API prefix: {0:?}")]
    InvalidApiPrefix(String),
}
