//! HTTP backend for the browser, built on `gloo-net`.
//!
//! Every call posts a multipart form (or GETs a resource), races it against
//! the configured request timeout, and hands the body to the matching parser
//! in `wizard::api`.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here panics or surfaces raw JS values. Transport failures, JS
//! exceptions, and timeouts all become `wizard::ApiError` so the wizard can
//! derive the banner text.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use wizard::{ApiError, BackendConfig};

#[cfg(feature = "csr")]
use async_trait::async_trait;
#[cfg(feature = "csr")]
use wizard::api::{ModelOutcome, UploadOutcome, parse_edit, parse_generate_3d, parse_upload};
#[cfg(feature = "csr")]
use wizard::backend::{EDIT_IMAGE_FIELD, UPLOAD_FIELD};
#[cfg(feature = "csr")]
use wizard::config::Endpoint;
#[cfg(feature = "csr")]
use wizard::{Backend, EditRequest, Generate3dRequest, ImageFile};

/// Route a response to `parse` on 2xx, or to a status error otherwise.
#[cfg(any(test, feature = "csr"))]
fn classify_response<T>(
    status: u16,
    body: &[u8],
    parse: impl FnOnce(&[u8]) -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    if (200..300).contains(&status) {
        parse(body)
    } else {
        Err(wizard::api::status_error(status, body))
    }
}

/// Milliseconds for a `gloo-timers` timeout, saturating at `u32::MAX`.
#[cfg(any(test, feature = "csr"))]
fn timeout_millis(secs: u64) -> u32 {
    u32::try_from(secs.saturating_mul(1000)).unwrap_or(u32::MAX)
}

/// The generation backend reached over `fetch`.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    config: BackendConfig,
}

impl HttpBackend {
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }
}

#[cfg(feature = "csr")]
fn js_error(value: &wasm_bindgen::JsValue) -> ApiError {
    ApiError::Transport(crate::util::files::js_message(value))
}

#[cfg(feature = "csr")]
fn net_error(err: gloo_net::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

/// Build the multipart body: text fields first, then the image part.
#[cfg(feature = "csr")]
fn image_form(
    field: &str,
    image: &ImageFile,
    text_fields: &[(&'static str, String)],
) -> Result<web_sys::FormData, ApiError> {
    let form = web_sys::FormData::new().map_err(|e| js_error(&e))?;
    for (name, value) in text_fields {
        form.append_with_str(name, value).map_err(|e| js_error(&e))?;
    }
    let blob = crate::util::files::bytes_to_blob(&image.bytes, &image.mime).map_err(|e| js_error(&e))?;
    form.append_with_blob_and_filename(field, &blob, &image.name)
        .map_err(|e| js_error(&e))?;
    Ok(form)
}

/// Race `fut` against a timer; the loser is dropped.
#[cfg(feature = "csr")]
async fn with_timeout<T>(
    secs: u64,
    fut: impl std::future::Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    use futures::future::{Either, select};

    let timer = gloo_timers::future::TimeoutFuture::new(timeout_millis(secs));
    match select(Box::pin(fut), Box::pin(timer)).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(ApiError::Timeout { secs }),
    }
}

#[cfg(feature = "csr")]
impl HttpBackend {
    async fn post_form<T>(
        &self,
        endpoint: Endpoint,
        form: web_sys::FormData,
        parse: impl FnOnce(&[u8]) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let url = self.config.endpoint(endpoint);
        log::debug!("POST {url}");
        with_timeout(self.config.timeouts().request_secs, async move {
            let resp = gloo_net::http::Request::post(&url)
                .body(form)
                .map_err(net_error)?
                .send()
                .await
                .map_err(net_error)?;
            let status = resp.status();
            let body = resp.binary().await.map_err(net_error)?;
            classify_response(status, &body, parse)
        })
        .await
    }
}

#[cfg(feature = "csr")]
#[async_trait(?Send)]
impl Backend for HttpBackend {
    async fn generate_2d(&self, image: ImageFile) -> Result<UploadOutcome, ApiError> {
        let form = image_form(UPLOAD_FIELD, &image, &[])?;
        self.post_form(Endpoint::Generate2d, form, parse_upload).await
    }

    async fn edit_2d(&self, request: EditRequest) -> Result<String, ApiError> {
        let form = image_form(EDIT_IMAGE_FIELD, &request.image, &request.text_fields())?;
        self.post_form(Endpoint::Edit2d, form, parse_edit).await
    }

    async fn generate_3d(&self, request: Generate3dRequest) -> Result<ModelOutcome, ApiError> {
        let form = web_sys::FormData::new().map_err(|e| js_error(&e))?;
        for (name, value) in request.text_fields() {
            form.append_with_str(name, &value).map_err(|e| js_error(&e))?;
        }
        self.post_form(Endpoint::Generate3d, form, parse_generate_3d).await
    }

    async fn fetch_resource(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.config.resolve(path);
        log::debug!("GET {url}");
        with_timeout(self.config.timeouts().request_secs, async move {
            let resp = gloo_net::http::Request::get(&url).send().await.map_err(net_error)?;
            let status = resp.status();
            let body = resp.binary().await.map_err(net_error)?;
            classify_response(status, &body, |bytes| Ok(bytes.to_vec()))
        })
        .await
    }
}
