//! File bytes, object URLs, and downloads in the browser.
//!
//! Object URLs created here must be revoked by their owner; the wizard page
//! tracks the one for the uploaded sketch in `UiState`.

#[cfg(feature = "csr")]
use wasm_bindgen::{JsCast, JsValue};

/// Readable text for a thrown JS value.
#[cfg(feature = "csr")]
pub fn js_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Wrap bytes in a `Blob` of the given MIME type.
///
/// # Errors
///
/// Returns the thrown JS value if the `Blob` constructor fails.
#[cfg(feature = "csr")]
pub fn bytes_to_blob(bytes: &[u8], mime: &str) -> Result<web_sys::Blob, JsValue> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

/// Read the full contents of a picked file.
///
/// # Errors
///
/// Returns a readable message if the browser fails to read the file.
#[cfg(feature = "csr")]
pub async fn read_file(file: &web_sys::File) -> Result<Vec<u8>, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("could not read {}: {}", file.name(), js_message(&e)))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Object URL for a local blob, or `None` (logged) if the browser refuses.
#[cfg(feature = "csr")]
pub fn create_object_url(blob: &web_sys::Blob) -> Option<String> {
    match web_sys::Url::create_object_url_with_blob(blob) {
        Ok(url) => Some(url),
        Err(e) => {
            log::warn!("object URL unavailable: {}", js_message(&e));
            None
        }
    }
}

#[cfg(feature = "csr")]
pub fn revoke_object_url(url: &str) {
    if let Err(e) = web_sys::Url::revoke_object_url(url) {
        log::warn!("failed to revoke {url}: {}", js_message(&e));
    }
}

/// Save bytes through a temporary anchor with a `download` attribute.
///
/// # Errors
///
/// Returns a readable message if the document or any DOM call is unavailable.
#[cfg(feature = "csr")]
pub fn save_bytes(bytes: &[u8], filename: &str, mime: &str) -> Result<(), String> {
    let blob = bytes_to_blob(bytes, mime).map_err(|e| js_message(&e))?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(|e| js_message(&e))?;
    let result = trigger_download(&url, filename);
    revoke_object_url(&url);
    result
}

/// Click a temporary `<a download>` pointing at `url`.
///
/// # Errors
///
/// Returns a readable message if the document or any DOM call is unavailable.
#[cfg(feature = "csr")]
pub fn trigger_download(url: &str, filename: &str) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "document unavailable".to_owned())?;
    let anchor = document
        .create_element("a")
        .map_err(|e| js_message(&e))?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| "anchor element unavailable".to_owned())?;
    anchor.set_href(url);
    anchor.set_download(filename);
    let body = document.body().ok_or_else(|| "document body unavailable".to_owned())?;
    body.append_child(&anchor).map_err(|e| js_message(&e))?;
    anchor.click();
    anchor.remove();
    Ok(())
}
