//! Transport invoker: a single HTTP exchange.
//!
//! The transport does not interpret responses. Any status code with a
//! readable body is an `Ok`; only failing to build, send, or read the
//! exchange is a [`TransportError`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use pushover_core::DispatchError;
use pushover_core::FormParams;
use pushover_core::constants::{FORM_CONTENT_TYPE, USER_AGENT};
use tracing::debug;
use url::Url;

/// Request timeout of the default reqwest client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A fully formed POST request.
#[derive(Clone)]
pub struct WireRequest {
    /// Absolute endpoint URL.
    pub url: Url,
    /// URL-encoded form body.
    pub body: String,
    /// Request headers.
    pub headers: Vec<(&'static str, String)>,
}

impl WireRequest {
    /// Form POST to `url` with the standard client headers.
    pub fn form(url: Url, params: &FormParams) -> Self {
        Self {
            url,
            body: params.to_urlencoded(),
            headers: vec![
                ("content-type", FORM_CONTENT_TYPE.to_string()),
                ("user-agent", USER_AGENT.to_string()),
            ],
        }
    }

    /// Value of a header, if set.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// The body carries the application token.
impl fmt::Debug for WireRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireRequest")
            .field("url", &self.url.as_str())
            .field("body_len", &self.body.len())
            .field("headers", &self.headers)
            .finish()
    }
}

/// Status code and full body of a completed exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes, drained even for error statuses.
    pub body: Vec<u8>,
}

/// Low-level failure of an HTTP exchange.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be built. Retrying will not help.
    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// Error description.
        reason: String,
    },
    /// Connecting, sending or waiting for the response failed.
    #[error("request failed: {reason}")]
    Request {
        /// Error description.
        reason: String,
        /// Whether the failure was a timeout.
        timeout: bool,
    },
    /// The response body could not be read.
    #[error("failed to read response body: {reason}")]
    Body {
        /// Error description.
        reason: String,
    },
}

impl TransportError {
    /// Whether the failure stems from static configuration rather than
    /// network conditions.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::InvalidRequest { .. })
    }

    fn from_send(err: &reqwest::Error) -> Self {
        if err.is_builder() {
            Self::InvalidRequest {
                reason: err.to_string(),
            }
        } else {
            Self::Request {
                reason: err.to_string(),
                timeout: err.is_timeout(),
            }
        }
    }
}

impl From<TransportError> for DispatchError {
    fn from(err: TransportError) -> Self {
        if err.is_permanent() {
            DispatchError::fatal(err.to_string())
        } else {
            DispatchError::temporary(err.to_string())
        }
    }
}

/// One HTTP exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `request` and return the status code and the full body.
    async fn send(&self, request: &WireRequest) -> Result<RawResponse, TransportError>;
}

/// Transport backed by a [`reqwest::Client`].
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport with the default 30 second timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Transport with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Wrap an existing reqwest client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &WireRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self.client.post(request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }

        let response = builder
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| TransportError::from_send(&e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body {
                reason: e.to_string(),
            })?;

        debug!(
            url = %request.url,
            status,
            body_len = body.len(),
            "HTTP exchange complete"
        );

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
