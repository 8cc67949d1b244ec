//! Search failure taxonomy.
//!
//! Every failure collapses to one human-readable message (its `Display`),
//! which is what the session keeps and the banner shows.

use serde_json::Value;

/// Message used when a failure carries no text of its own.
pub const FALLBACK_MESSAGE: &str = "Something went wrong";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The HTTP call could not complete (connection refused, DNS, TLS, ...).
    #[error("{}", transport_message(.0))]
    Transport(Option<String>),

    /// The service answered with a non-success status.
    #[error("{message}")]
    Service { status: u16, message: String },
}

impl SearchError {
    pub fn transport(message: impl Into<String>) -> Self {
        SearchError::Transport(Some(message.into()))
    }

    /// Build a service error from a non-success status and its raw body.
    ///
    /// The body is parsed as JSON, degrading to `{}` if it is not. Its
    /// `error` string wins; otherwise the message names the status code.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let parsed: Value =
            serde_json::from_slice(body).unwrap_or_else(|_| Value::Object(Default::default()));
        let message = match parsed.get("error").and_then(Value::as_str) {
            Some(msg) if !msg.is_empty() => msg.to_string(),
            _ => format!("Request failed ({})", status),
        };
        SearchError::Service { status, message }
    }

    /// HTTP status for service errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            SearchError::Service { status, .. } => Some(*status),
            SearchError::Transport(_) => None,
        }
    }
}

fn transport_message(message: &Option<String>) -> &str {
    message
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or(FALLBACK_MESSAGE)
}
