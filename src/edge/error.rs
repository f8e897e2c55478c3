//! Edge Error Types
//!
//! Errors raised by the edge server itself. Upstream responses, including
//! upstream 4xx/5xx, are relayed as-is and never pass through here.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Edge server error types
#[derive(Error, Debug)]
pub enum EdgeError {
    /// The configured upstream origin could not be parsed
    #[error("Invalid upstream URL {url:?}: {error}")]
    InvalidUpstream { url: String, error: String },

    /// Upstream refused the connection or sent a broken response
    #[error("Upstream unavailable: {0}")]
    BadGateway(String),

    /// Upstream did not answer in time
    #[error("Upstream timed out: {0}")]
    GatewayTimeout(String),

    /// Inbound body exceeded the size limit
    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    /// Inbound body could not be read, e.g. the client went away mid-body
    #[error("Request body unreadable: {0}")]
    RequestBody(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl EdgeError {
    pub fn status(&self) -> StatusCode {
        match self {
            EdgeError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            EdgeError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            EdgeError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            EdgeError::RequestBody(_) => StatusCode::BAD_REQUEST,
            EdgeError::InvalidUpstream { .. } | EdgeError::Internal(_) | EdgeError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            EdgeError::InvalidUpstream { .. } => "INVALID_UPSTREAM",
            EdgeError::BadGateway(_) => "BAD_GATEWAY",
            EdgeError::GatewayTimeout(_) => "GATEWAY_TIMEOUT",
            EdgeError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            EdgeError::RequestBody(_) => "REQUEST_BODY_UNREADABLE",
            EdgeError::Internal(_) => "INTERNAL_ERROR",
            EdgeError::Io(_) => "IO_ERROR",
        }
    }
}

impl From<reqwest::Error> for EdgeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            EdgeError::GatewayTimeout(e.to_string())
        } else {
            EdgeError::BadGateway(e.to_string())
        }
    }
}

impl From<BytesRejection> for EdgeError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            EdgeError::PayloadTooLarge(rejection.body_text())
        } else {
            EdgeError::RequestBody(rejection.body_text())
        }
    }
}

impl IntoResponse for EdgeError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "Edge error occurred"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for edge operations
pub type EdgeResult<T> = Result<T, EdgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            EdgeError::BadGateway("refused".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            EdgeError::GatewayTimeout("30s".into()).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            EdgeError::PayloadTooLarge("length limit exceeded".into()).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            EdgeError::RequestBody("connection reset".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = EdgeError::BadGateway("connection refused".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
