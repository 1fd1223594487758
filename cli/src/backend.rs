//! `reqwest` implementation of the wizard backend.
//!
//! Timeouts come from [`BackendConfig::timeouts`] and are enforced by the
//! client itself. Status handling and envelope parsing are shared with the
//! browser through `wizard::api`.

#[cfg(test)]
#[path = "backend_test.rs"]
mod backend_test;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use wizard::api::{ModelOutcome, UploadOutcome, parse_edit, parse_generate_3d, parse_upload, status_error};
use wizard::backend::{EDIT_IMAGE_FIELD, UPLOAD_FIELD};
use wizard::{ApiError, Backend, BackendConfig, EditRequest, Endpoint, Generate3dRequest, ImageFile};

pub struct ReqwestBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl ReqwestBackend {
    /// Build a client with the configured request and connect timeouts.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn new(config: BackendConfig) -> Result<Self, reqwest::Error> {
        let timeouts = config.timeouts();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// GET the API root; `Ok(status)` for any answer, even non-2xx.
    ///
    /// # Errors
    ///
    /// Transport failures and timeouts.
    pub async fn ping(&self) -> Result<u16, ApiError> {
        let url = self.config.endpoint(Endpoint::Health);
        tracing::debug!(%url, "ping");
        let response = self.client.get(&url).send().await.map_err(|e| self.send_error(&e))?;
        Ok(response.status().as_u16())
    }

    fn send_error(&self, err: &reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout { secs: self.config.timeouts().request_secs }
        } else {
            ApiError::Transport(err.to_string())
        }
    }

    async fn post_form<T>(
        &self,
        endpoint: Endpoint,
        form: Form,
        parse: impl FnOnce(&[u8]) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let url = self.config.endpoint(endpoint);
        tracing::debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.send_error(&e))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.send_error(&e))?;
        classify(status, &body, parse)
    }
}

/// Route a response to `parse` on 2xx, or to a status error otherwise.
fn classify<T>(status: u16, body: &[u8], parse: impl FnOnce(&[u8]) -> Result<T, ApiError>) -> Result<T, ApiError> {
    if (200..300).contains(&status) {
        parse(body)
    } else {
        Err(status_error(status, body))
    }
}

fn image_part(image: ImageFile) -> Result<Part, ApiError> {
    Part::bytes(image.bytes)
        .file_name(image.name)
        .mime_str(&image.mime)
        .map_err(|e| ApiError::Resource(e.to_string()))
}

fn text_form(fields: Vec<(&'static str, String)>) -> Form {
    fields
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value))
}

#[async_trait(?Send)]
impl Backend for ReqwestBackend {
    async fn generate_2d(&self, image: ImageFile) -> Result<UploadOutcome, ApiError> {
        let form = Form::new().part(UPLOAD_FIELD, image_part(image)?);
        self.post_form(Endpoint::Generate2d, form, parse_upload).await
    }

    async fn edit_2d(&self, request: EditRequest) -> Result<String, ApiError> {
        let fields = request.text_fields();
        let form = text_form(fields).part(EDIT_IMAGE_FIELD, image_part(request.image)?);
        self.post_form(Endpoint::Edit2d, form, parse_edit).await
    }

    async fn generate_3d(&self, request: Generate3dRequest) -> Result<ModelOutcome, ApiError> {
        let form = text_form(request.text_fields());
        self.post_form(Endpoint::Generate3d, form, parse_generate_3d).await
    }

    async fn fetch_resource(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.config.resolve(path);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send().await.map_err(|e| self.send_error(&e))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.send_error(&e))?;
        classify(status, &body, |bytes| Ok(bytes.to_vec()))
    }
}
