//! Backend capability and request payloads.
//!
//! SYSTEM CONTEXT
//! ==============
//! The wizard never talks HTTP itself. The browser client implements
//! [`Backend`] over `gloo-net`, the CLI over `reqwest`, and the tests over a
//! scripted fake. Futures are not required to be `Send` so browser
//! implementations qualify.

#[cfg(test)]
#[path = "backend_test.rs"]
mod backend_test;

use async_trait::async_trait;

use crate::api::{ModelOutcome, UploadOutcome};
use crate::error::ApiError;

/// Prompt sent with a canvas edit when the user typed none.
pub const DEFAULT_CANVAS_PROMPT: &str = "Apply the changes marked in red";

/// Upload name for the silhouette round-tripped by a text edit.
pub const TEXT_EDIT_FILENAME: &str = "current_sketch.png";

/// Upload name for the flattened annotation canvas.
pub const CANVAS_EDIT_FILENAME: &str = "edited.png";

/// Multipart field carrying the sketch on upload.
pub const UPLOAD_FIELD: &str = "file";

/// Multipart field carrying the image on edit.
pub const EDIT_IMAGE_FIELD: &str = "image";

/// File extensions the upload picker offers.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Value for an `<input accept=...>` attribute built from [`ACCEPTED_EXTENSIONS`].
#[must_use]
pub fn accept_attribute() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// MIME type for an accepted image file name, by extension.
#[must_use]
pub fn mime_for_name(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// An image file ready for multipart upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// A PNG file with the given upload name.
    #[must_use]
    pub fn png(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), mime: "image/png".to_owned(), bytes }
    }

    /// A file whose MIME type is inferred from its name.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Resource`] for names outside [`ACCEPTED_EXTENSIONS`]
    /// or for empty contents.
    pub fn from_name(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ApiError> {
        let name = name.into();
        let mime = mime_for_name(&name)
            .ok_or_else(|| ApiError::Resource(format!("unsupported image type: {name}")))?;
        if bytes.is_empty() {
            return Err(ApiError::Resource(format!("image file is empty: {name}")));
        }
        Ok(Self { name, mime: mime.to_owned(), bytes })
    }
}

/// Payload of the apply-edit operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditRequest {
    pub session_id: String,
    pub prompt: String,
    pub image: ImageFile,
    pub version: u32,
}

impl EditRequest {
    /// Text parts of the multipart form; the image goes under `image`.
    #[must_use]
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("session_id", self.session_id.clone()),
            ("prompt", self.prompt.clone()),
            ("version", self.version.to_string()),
        ]
    }
}

/// Payload of the generate-3D operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generate3dRequest {
    pub session_id: String,
    pub prompt: Option<String>,
}

impl Generate3dRequest {
    /// Form fields; `prompt` is only sent when present.
    #[must_use]
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("session_id", self.session_id.clone())];
        if let Some(prompt) = &self.prompt {
            fields.push(("prompt", prompt.clone()));
        }
        fields
    }
}

/// Operations the external generation service offers.
#[async_trait(?Send)]
pub trait Backend {
    /// Upload a sketch under a new session and generate its silhouette.
    async fn generate_2d(&self, image: ImageFile) -> Result<UploadOutcome, ApiError>;

    /// Apply an edit and return the new silhouette path.
    async fn edit_2d(&self, request: EditRequest) -> Result<String, ApiError>;

    /// Generate the 3D model for a session.
    async fn generate_3d(&self, request: Generate3dRequest) -> Result<ModelOutcome, ApiError>;

    /// Download a generated resource by its (possibly relative) path.
    async fn fetch_resource(&self, path: &str) -> Result<Vec<u8>, ApiError>;
}
