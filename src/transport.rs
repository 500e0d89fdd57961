//! HTTP transport abstraction.
//!
//! The dispatcher only needs "POST this form and give me status + body", so that is
//! all [`Transport`] asks for. [`ReqwestTransport`] is the production implementation;
//! tests substitute their own.

use crate::errors::{PayssionError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// A fully prepared form POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRequest {
    /// Absolute target URL
    pub url: String,

    /// Header name/value pairs
    pub headers: Vec<(&'static str, String)>,

    /// `application/x-www-form-urlencoded` body
    pub body: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Whether to reject invalid server certificates for this request
    pub verify_tls: bool,
}

impl FormRequest {
    /// Returns the value of a header, if set.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body of a completed exchange, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,

    /// Response body as text
    pub body: String,
}

/// The request did not complete (DNS, refused connection, timeout, TLS, ...).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportFailure {
    /// Description of the failure
    pub message: String,
}

impl TransportFailure {
    /// Creates a failure from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Sends a single form POST.
///
/// Implementations perform exactly one exchange per call and never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the raw response for any HTTP status.
    async fn post_form(
        &self,
        request: FormRequest,
    ) -> std::result::Result<RawResponse, TransportFailure>;
}

/// [`Transport`] backed by `reqwest`.
///
/// Holds one client that verifies certificates and one that does not; each request
/// picks one according to its `verify_tls` flag.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    verifying: Client,
    lenient: Client,
}

impl ReqwestTransport {
    /// Builds both underlying clients.
    pub fn new() -> Result<Self> {
        let verifying = Client::builder()
            .build()
            .map_err(|e| PayssionError::config(format!("failed to build HTTP client: {}", e)))?;
        let lenient = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| PayssionError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { verifying, lenient })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_form(
        &self,
        request: FormRequest,
    ) -> std::result::Result<RawResponse, TransportFailure> {
        let client = if request.verify_tls {
            &self.verifying
        } else {
            &self.lenient
        };

        let mut builder = client
            .post(&request.url)
            .timeout(request.timeout)
            .body(request.body);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportFailure::new(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportFailure::new(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}
