//! Transport to the Sourcing Service.
//!
//! [`SourcingService`] is the seam between the orchestrator and the network:
//! it sends one JSON POST and hands back the status and raw body without
//! interpreting either. [`HttpSourcingService`] is the reqwest-backed
//! implementation; tests substitute in-memory fakes.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::SearchError;

/// Status and raw body of one service response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A remote collaborator that accepts JSON POSTs.
///
/// Implementations return `Err` only when no response was received at all;
/// any HTTP status, including errors, is an `Ok(RawResponse)`.
#[async_trait]
pub trait SourcingService: Send + Sync {
    async fn post_json(&self, endpoint: &str, body: &Value) -> Result<RawResponse, SearchError>;
}

/// HTTP implementation of [`SourcingService`] rooted at a base URL.
///
/// No request timeout is configured: a hung request stays pending until the
/// underlying connection resolves or fails.
#[derive(Debug, Clone)]
pub struct HttpSourcingService {
    client: Client,
    base_url: String,
}

impl HttpSourcingService {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("candidate-scout/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a service path such as `/search`.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl SourcingService for HttpSourcingService {
    async fn post_json(&self, endpoint: &str, body: &Value) -> Result<RawResponse, SearchError> {
        let url = self.url_for(endpoint);
        tracing::debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| SearchError::transport(error_chain(&e)))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| SearchError::transport(error_chain(&e)))?;

        tracing::debug!(status, bytes = body.len(), "response received");
        Ok(RawResponse::new(status, body.to_vec()))
    }
}

/// Join an error with its sources: `"outer: inner: root"`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
