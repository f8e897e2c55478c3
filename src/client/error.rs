//! Client Error Types
//!
//! Failures of a tee-time retrieval carry their cause so that callers can
//! tell a dead network from a bad status or an unexpected body.

use thiserror::Error;

/// Why a tee-time retrieval failed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// No response was received (DNS, connect, timeout)
    #[error("Transport error: {message}")]
    Transport { message: String, is_timeout: bool },

    /// A response arrived with a non-success status
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not an array of valid tee-time records
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Discriminant of [`FetchError`], for state and assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Transport,
    Status,
    Decode,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Transport { .. } => FetchErrorKind::Transport,
            FetchError::Status { .. } => FetchErrorKind::Status,
            FetchError::Decode(_) => FetchErrorKind::Decode,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        FetchError::Transport {
            message: message.into(),
            is_timeout: false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Transport {
                message: e.to_string(),
                is_timeout: e.is_timeout(),
            }
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

/// Errors building a client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid base URL {url:?}: {error}")]
    InvalidBaseUrl { url: String, error: String },

    #[error("Failed to create HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}
