//! Failure taxonomy for catalog fetches.

use thiserror::Error;

/// Longest slice of a response body kept in an error message.
const MAX_BODY_CHARS: usize = 300;

/// Why a catalog fetch produced no records.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network unreachable, timeout, TLS failure or unreadable body.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success HTTP status.
    #[error("catalog API returned HTTP {status}: {body}")]
    ResponseStatus { status: u16, body: String },

    /// The body was not JSON or lacked the expected structure.
    #[error("unexpected response shape: {0}")]
    Schema(String),

    /// The API token is missing or blank.
    #[error("credential error: {0}")]
    Credential(String),
}

impl FetchError {
    /// Stable label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::ResponseStatus { .. } => "response_status",
            FetchError::Schema(_) => "schema",
            FetchError::Credential(_) => "credential",
        }
    }

    /// Build a status error, shortening long bodies.
    pub fn status(status: u16, body: &str) -> Self {
        let body = if body.chars().count() > MAX_BODY_CHARS {
            let head: String = body.chars().take(MAX_BODY_CHARS).collect();
            format!("{}...", head)
        } else {
            body.to_string()
        };

        FetchError::ResponseStatus { status, body }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Transport(format!("request timed out: {}", e))
        } else if e.is_connect() {
            FetchError::Transport(format!("cannot connect to catalog API: {}", e))
        } else {
            FetchError::Transport(format!("failed to send request: {}", e))
        }
    }
}
