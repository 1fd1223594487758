//! Backend response envelope and per-endpoint parsers.
//!
//! Every endpoint answers with `{success, data?, error?}`; the upload endpoint
//! additionally carries `session_id` at the top level. Non-2xx answers use a
//! `{detail}` body instead. Generated files come back as resource descriptors
//! holding a path relative to the backend origin.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::state::Session;

/// Uniform response envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub session_id: Option<String>,
}

/// Response fragment pointing at a generated file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ResourceDescriptor {
    #[serde(default)]
    pub url_path: String,
}

impl ResourceDescriptor {
    /// The path, or `None` when the backend sent an empty one.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        let path = self.url_path.trim();
        if path.is_empty() { None } else { Some(path) }
    }
}

#[derive(Debug, Deserialize)]
struct Generate2dData {
    silhouette_2d: Option<ResourceDescriptor>,
}

#[derive(Debug, Deserialize)]
struct Edit2dData {
    silhouette_url: Option<String>,
    silhouette_2d: Option<ResourceDescriptor>,
}

#[derive(Debug, Deserialize)]
struct Generate3dData {
    stl_file: Option<ResourceDescriptor>,
    render_image: Option<ResourceDescriptor>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    detail: Option<serde_json::Value>,
    error: Option<String>,
}

/// Successful result of the initial silhouette generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadOutcome {
    pub session: Session,
    /// Relative path of the generated silhouette.
    pub silhouette: String,
}

/// Successful result of 3D generation. Both artifacts are optional.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelOutcome {
    pub model: Option<String>,
    pub preview: Option<String>,
}

/// Decode an envelope and unwrap its `data` on success.
fn open_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<(Option<String>, T), ApiError> {
    let envelope: Envelope<T> = serde_json::from_slice(body).map_err(|e| ApiError::Malformed(e.to_string()))?;
    if !envelope.success {
        return Err(ApiError::Rejected { message: envelope.error });
    }
    let data = envelope
        .data
        .ok_or_else(|| ApiError::Malformed("missing `data`".to_owned()))?;
    Ok((envelope.session_id, data))
}

/// Parse the answer of the generate-2D endpoint.
///
/// # Errors
///
/// [`ApiError::Rejected`] for `success: false`, [`ApiError::Malformed`] when the
/// session id or silhouette path is missing.
pub fn parse_upload(body: &[u8]) -> Result<UploadOutcome, ApiError> {
    let (session_id, data) = open_envelope::<Generate2dData>(body)?;
    let session = session_id
        .and_then(Session::new)
        .ok_or_else(|| ApiError::Malformed("missing `session_id`".to_owned()))?;
    let silhouette = data
        .silhouette_2d
        .as_ref()
        .and_then(ResourceDescriptor::path)
        .ok_or_else(|| ApiError::Malformed("missing `silhouette_2d.url_path`".to_owned()))?
        .to_owned();
    Ok(UploadOutcome { session, silhouette })
}

/// Parse the answer of the edit-2D endpoint.
///
/// Accepts both `data.silhouette_url` and `data.silhouette_2d.url_path`.
///
/// # Errors
///
/// Same as [`parse_upload`].
pub fn parse_edit(body: &[u8]) -> Result<String, ApiError> {
    let (_, data) = open_envelope::<Edit2dData>(body)?;
    let from_url = data
        .silhouette_url
        .as_deref()
        .map(str::trim)
        .filter(|path| !path.is_empty());
    let from_descriptor = data.silhouette_2d.as_ref().and_then(ResourceDescriptor::path);
    from_url
        .or(from_descriptor)
        .map(str::to_owned)
        .ok_or_else(|| ApiError::Malformed("missing silhouette path".to_owned()))
}

/// Parse the answer of the generate-3D endpoint.
///
/// # Errors
///
/// [`ApiError::Rejected`] for `success: false`, [`ApiError::Malformed`] for an
/// undecodable body. Missing artifacts are not an error.
pub fn parse_generate_3d(body: &[u8]) -> Result<ModelOutcome, ApiError> {
    let (_, data) = open_envelope::<Generate3dData>(body)?;
    let path = |d: Option<&ResourceDescriptor>| d.and_then(ResourceDescriptor::path).map(str::to_owned);
    Ok(ModelOutcome {
        model: path(data.stl_file.as_ref()),
        preview: path(data.render_image.as_ref()),
    })
}

/// Extract a readable message from an error body: `detail` first, then `error`.
#[must_use]
pub fn parse_error_detail(body: &[u8]) -> Option<String> {
    let Ok(parsed) = serde_json::from_slice::<ErrorDetail>(body) else {
        return None;
    };
    let detail = match parsed.detail {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(serde_json::Value::Null | serde_json::Value::String(_)) | None => None,
        Some(other) => Some(other.to_string()),
    };
    detail.or_else(|| parsed.error.filter(|e| !e.trim().is_empty()))
}

/// Map a non-success HTTP answer to an [`ApiError::Status`].
#[must_use]
pub fn status_error(status: u16, body: &[u8]) -> ApiError {
    ApiError::Status { status, detail: parse_error_detail(body) }
}
