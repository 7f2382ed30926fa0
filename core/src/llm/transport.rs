use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::{QuillError, Result};

/// Raw upstream reply: status plus undecoded body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network-level failure: DNS, refused connection, timeout, broken body
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportFailure(pub String);

/// Seam between the dispatcher and the network
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    /// POST `body` as JSON with a bearer credential. One attempt, no retry.
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &Value,
    ) -> std::result::Result<UpstreamReply, TransportFailure>;
}

/// reqwest-backed transport sharing one connection pool
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(request_timeout_ms: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(request_timeout_ms))
            .build()
            .map_err(|e| QuillError::InternalError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl UpstreamTransport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &Value,
    ) -> std::result::Result<UpstreamReply, TransportFailure> {
        debug!(target: "transport", url = %url, "POST upstream");
        let resp = self
            .http
            .post(url)
            .header("content-type", "application/json")
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportFailure(e.without_url().to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportFailure(e.without_url().to_string()))?;
        debug!(target: "transport", status, len = body.len(), "upstream replied");
        Ok(UpstreamReply { status, body })
    }
}
