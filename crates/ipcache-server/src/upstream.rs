//! Upstream IP lookup service.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::DEFAULT_UPSTREAM_URL;

/// Errors returned when the upstream lookup fails.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection failure, timeout or any other transport problem.
    #[error("failed to retrieve IP: {0}")]
    Transport(String),

    /// The response arrived but its body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// A source of the server's public IP address.
///
/// The returned text is treated as opaque: it is served to clients exactly as
/// the source produced it.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Fetches the current IP address text.
    async fn fetch(&self) -> Result<String, UpstreamError>;

    /// Returns the name of this source, used in logs.
    fn name(&self) -> &str;
}

/// [`IpSource`] backed by an HTTP GET against ipify (or a compatible service).
#[derive(Debug, Clone)]
pub struct IpifyClient {
    url: String,
    http_client: reqwest::Client,
}

impl IpifyClient {
    /// Creates a client for `https://api.ipify.org`.
    pub fn new(timeout: Duration) -> Result<Self, UpstreamError> {
        Self::with_url(DEFAULT_UPSTREAM_URL, timeout)
    }

    /// Creates a client for the given URL. `timeout` bounds the whole round trip,
    /// from connecting to reading the last byte of the body.
    pub fn with_url(url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self {
            url: url.into(),
            http_client,
        })
    }

    /// Returns the URL queried by this client.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl IpSource for IpifyClient {
    async fn fetch(&self) -> Result<String, UpstreamError> {
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        // El status no se inspecciona: el body se sirve tal cual.
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Body(e.to_string()))?;

        String::from_utf8(body.to_vec())
            .map_err(|e| UpstreamError::Body(format!("body is not valid UTF-8: {e}")))
    }

    fn name(&self) -> &str {
        "ipify"
    }
}
