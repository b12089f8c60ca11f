//! Client for the external reply-generation service.
//!
//! The wire format is a single JSON round trip:
//! request `{"message": "..."}`, response `{"reply": "..."}`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;

/// Body of the outbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyRequest {
    /// The raw input text, exactly as typed (not trimmed).
    pub message: String,
}

impl ReplyRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReplyResponse {
    reply: String,
}

/// Anything that can turn a [`ReplyRequest`] into a complete reply string.
#[async_trait]
pub trait ReplyService: Send + Sync {
    /// Perform exactly one request. Implementations must not retry.
    async fn fetch_reply(&self, request: &ReplyRequest) -> Result<String, ReplyError>;
}

/// HTTP implementation of [`ReplyService`].
#[derive(Debug, Clone)]
pub struct HttpReplyClient {
    client: Client,
    endpoint: String,
    timeout: Option<Duration>,
}

impl HttpReplyClient {
    /// Create a client for `endpoint`.
    ///
    /// With `timeout` set to `None` the transport default applies.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ReplyError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ReplyError::Build)?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    /// Create a client from the endpoint and timeout in `config`.
    pub fn from_config(config: &Config) -> Result<Self, ReplyError> {
        Self::new(config.endpoint.clone(), config.request_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl ReplyService for HttpReplyClient {
    async fn fetch_reply(&self, request: &ReplyRequest) -> Result<String, ReplyError> {
        debug!(
            endpoint = %self.endpoint,
            bytes = request.message.len(),
            "dispatching reply request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(ReplyError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "reply service returned an error status");
            return Err(ReplyError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(ReplyError::from_transport)?;
        let parsed: ReplyResponse = serde_json::from_str(&body).map_err(ReplyError::Malformed)?;

        debug!(chars = parsed.reply.chars().count(), "reply received");
        Ok(parsed.reply)
    }
}

/// Failure to obtain a reply.
///
/// Every variant is the same failure as far as the conversation is
/// concerned; the variants only exist for logs.
#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Connection, DNS, TLS or body read failure.
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The configured request timeout elapsed.
    #[error("Request timed out")]
    Timeout,

    /// The service answered with a non-2xx status.
    #[error("Server returned status {0}")]
    Status(u16),

    /// The body was not `{"reply": "<string>"}`.
    #[error("Malformed response: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The task running the request ended without producing a result.
    #[error("Request task ended unexpectedly: {0}")]
    Interrupted(String),
}

impl ReplyError {
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}
