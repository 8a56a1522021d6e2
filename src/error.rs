//! Pipeline error types with HTTP status code mapping.
//!
//! [`StatsError`] is the central error type for the crate. Inside the
//! pipeline most variants are logged and degraded rather than propagated
//! to the top; on the HTTP surface each variant maps to a status code and
//! a structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "player not found: 42",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Crate-wide error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category              | HTTP Status               |
/// |-----------|-----------------------|---------------------------|
/// | 1000–1999 | Validation            | 400 Bad Request           |
/// | 2000–2999 | Not Found             | 404 Not Found             |
/// | 3000–3999 | Server                | 500 Internal Server Error |
/// | 5000–5999 | External collaborator | 502 Bad Gateway           |
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// Request or payload validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The player directory has no entry for the id.
    #[error("player not found: {0}")]
    PlayerNotFound(u64),

    /// No subscriber is registered under the given name.
    #[error("unknown subscriber: {0}")]
    UnknownSubscriber(String),

    /// The currency conversion service failed or reported `success=false`.
    #[error("exchange rate error: {0}")]
    ExchangeRate(String),

    /// The player directory backend failed.
    #[error("directory error: {0}")]
    Directory(String),

    /// An event could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StatsError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Serialization(_) => 1002,
            Self::PlayerNotFound(_) => 2001,
            Self::UnknownSubscriber(_) => 2002,
            Self::Internal(_) => 3000,
            Self::Config(_) => 3001,
            Self::ExchangeRate(_) => 5001,
            Self::Directory(_) => 5002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::Serialization(_) => StatusCode::BAD_REQUEST,
            Self::PlayerNotFound(_) | Self::UnknownSubscriber(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ExchangeRate(_) | Self::Directory(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for StatsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = StatsError::PlayerNotFound(42);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2001);
        assert_eq!(err.to_string(), "player not found: 42");
    }

    #[test]
    fn collaborator_failures_map_to_bad_gateway() {
        let err = StatsError::ExchangeRate("timeout".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(StatsError::Directory(String::new()).error_code(), 5002);
    }

    #[test]
    fn into_response_sets_status() {
        let response = StatsError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
