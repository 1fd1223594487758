//! Backend location and call limits.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::error::ConfigError;

pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8000";
pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 180;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Backend operations reachable under the API prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Health,
    Generate2d,
    Edit2d,
    Generate3d,
}

impl Endpoint {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Health => "/",
            Self::Generate2d => "/generate2d",
            Self::Edit2d => "/edit2d",
            Self::Generate3d => "/generate3D",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    origin: String,
    api_prefix: String,
    timeouts: Timeouts,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_owned(),
            api_prefix: DEFAULT_API_PREFIX.to_owned(),
            timeouts: Timeouts::default(),
        }
    }
}

impl BackendConfig {
    /// Config for `origin` with the default prefix and timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOrigin`] unless `origin` is an `http(s)://` URL.
    pub fn new(origin: &str) -> Result<Self, ConfigError> {
        Ok(Self { origin: normalize_origin(origin)?, ..Self::default() })
    }

    /// Replace the API prefix. An empty prefix mounts endpoints at the origin root.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiPrefix`] if the prefix holds a scheme or whitespace.
    pub fn with_api_prefix(mut self, prefix: &str) -> Result<Self, ConfigError> {
        let trimmed = prefix.trim();
        if trimmed.contains("://") || trimmed.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidApiPrefix(prefix.to_owned()));
        }
        let trimmed = trimmed.trim_matches('/');
        self.api_prefix = if trimmed.is_empty() { String::new() } else { format!("/{trimmed}") };
        Ok(self)
    }

    #[must_use]
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    #[must_use]
    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Absolute URL of an endpoint.
    #[must_use]
    pub fn endpoint(&self, endpoint: Endpoint) -> String {
        format!("{}{}{}", self.origin, self.api_prefix, endpoint.path())
    }

    /// Absolute URL for a resource path returned by the backend.
    ///
    /// Absolute `http(s)` URLs pass through unchanged.
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        if is_absolute(path) {
            return path.to_owned();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.origin)
        } else {
            format!("{}/{path}", self.origin)
        }
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn normalize_origin(origin: &str) -> Result<String, ConfigError> {
    let trimmed = origin.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"));
    match host {
        Some(host) if !host.is_empty() && !host.chars().any(char::is_whitespace) => Ok(trimmed.to_owned()),
        _ => Err(ConfigError::InvalidOrigin(origin.to_owned())),
    }
}
