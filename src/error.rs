// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types and the message fallback chain shared by every flow.

use serde_json::Value;

/// Error type for all admin API operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No response was received (connect, DNS, timeout, truncated body).
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// A 2xx response whose body could not be decoded.
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// Caller-side check failed before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The session could not be read or persisted.
    #[error("Session storage error: {0}")]
    Session(String),

    /// The request was aborted through its `AbortSignal`.
    #[error("Request cancelled")]
    Cancelled,
}

impl ClientError {
    /// Human-readable message surfaced in a flow's error slot.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status of a server error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for a 401 response (missing, stale or rejected access token).
    ///
    /// Nothing in this crate acts on it; callers decide whether to re-login.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Session(err.to_string())
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Transport-level message reported for a non-2xx status.
pub fn status_message(status: u16) -> String {
    format!("Request failed with status code {}", status)
}

/// Pick the message to show for a failed request.
///
/// Order: server `message`, server `error`, transport message, `fallback`.
/// Empty strings are skipped at every step.
pub fn extract_message(body: Option<&Value>, transport: &str, fallback: &str) -> String {
    let field = |name: &str| {
        body.and_then(|b| b.get(name))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    field("message")
        .or_else(|| field("error"))
        .or_else(|| (!transport.is_empty()).then(|| transport.to_string()))
        .unwrap_or_else(|| fallback.to_string())
}
