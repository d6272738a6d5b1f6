use std::fmt;

use reqwest::{Method, Url};

/// Errors raised by the HTTP client before any assertion runs
#[derive(Debug)]
pub enum ClientError {
    /// A request path could not be joined onto the base URL
    InvalidUrl(String),

    /// The server did not answer within the configured timeout
    Timeout { method: Method, url: Url },

    /// Connection, TLS or protocol failure
    Transport(reqwest::Error),

    /// A body could not be encoded or decoded as JSON
    Json {
        context: String,
        source: serde_json::Error,
    },
}

impl ClientError {
    pub(crate) fn from_reqwest(err: reqwest::Error, method: &Method, url: &Url) -> Self {
        if err.is_timeout() {
            ClientError::Timeout {
                method: method.clone(),
                url: url.clone(),
            }
        } else {
            ClientError::Transport(err)
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            ClientError::Timeout { method, url } => write!(f, "{} {} timed out", method, url),
            ClientError::Transport(e) => write!(f, "Transport error: {}", e),
            ClientError::Json { context, source } => write!(f, "JSON error in {}: {}", context, source),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Transport(e) => Some(e),
            ClientError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}
