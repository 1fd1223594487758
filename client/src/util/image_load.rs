//! Load an image element and wait for it to decode.
//!
//! Resolves on `onload`, rejects on `onerror`. The editor uses the decoded
//! element both for layout (natural size) and drawing.

/// Shown in the editor when the background fails to load.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load image from server";

/// Fetch and decode `url` into an `HtmlImageElement`.
///
/// `crossOrigin` is set to `anonymous` so the canvas stays exportable after
/// the image is drawn.
///
/// # Errors
///
/// Returns [`LOAD_FAILED_MESSAGE`]; the browser's reason is logged.
#[cfg(feature = "csr")]
pub async fn load_image(url: &str) -> Result<web_sys::HtmlImageElement, String> {
    let image = web_sys::HtmlImageElement::new().map_err(|e| crate::util::files::js_message(&e))?;
    image.set_cross_origin(Some("anonymous"));

    let for_promise = image.clone();
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        for_promise.set_onload(Some(&resolve));
        for_promise.set_onerror(Some(&reject));
    });
    image.set_src(url);

    let outcome = wasm_bindgen_futures::JsFuture::from(promise).await;
    image.set_onload(None);
    image.set_onerror(None);
    match outcome {
        Ok(_) => Ok(image),
        Err(e) => {
            log::warn!("image load failed for {url}: {e:?}");
            Err(LOAD_FAILED_MESSAGE.to_owned())
        }
    }
}
