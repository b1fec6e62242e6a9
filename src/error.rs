//! Error types for media-dl
//!
//! This module provides the error taxonomy for the service:
//! - Input defects ([`ValidationError`], malformed request bodies)
//! - Collaborator outcomes ([`ExtractionError`]: source failures, unexpected failures, deadlines)
//! - Infrastructure and configuration errors
//!
//! The `Display` text of every variant is the message a client sees, so the
//! response mapper can pass it through unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for media-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for media-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "download.temp_dir")
        key: Option<String>,
    },

    /// The submitted URL was rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request body could not be decoded
    #[error("{0}")]
    InvalidRequest(String),

    /// The extraction collaborator failed
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Requested resource does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// I/O error
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Server error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Reasons a submitted URL is rejected before any job is issued
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The trimmed input is empty
    #[error("URL is required")]
    EmptyInput,

    /// The input contains none of the accepted source hosts
    #[error("Invalid YouTube URL")]
    UnsupportedSource,
}

/// Failures reported by the extraction adapter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// The collaborator identified a source-specific failure (unavailable,
    /// geo-blocked, unsupported URL, format not available). The message is
    /// the collaborator's own.
    #[error("Download error: {0}")]
    Failed(String),

    /// Any other failure (spawn, I/O, permissions, unparseable output)
    #[error("Server error: {0}")]
    Unexpected(String),

    /// A phase exceeded its configured deadline and was killed
    #[error("Download timed out after {seconds}s")]
    Timeout {
        /// Which phase ran out of time ("metadata" or "retrieval")
        phase: &'static str,
        /// The deadline that was exceeded, in seconds
        seconds: u64,
    },
}

/// Error response body
///
/// Every failed request is answered with a single flat `error` field:
///
/// ```json
/// { "error": "Download error: Video unavailable" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Human-readable error message
    pub error: String,
}

impl ApiError {
    /// Create an error body from any message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Convert errors to HTTP status codes for API responses
///
/// This trait maps domain errors to appropriate HTTP status codes.
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - client input or source defect
            Error::Validation(_) => 400,
            Error::InvalidRequest(_) => 400,
            Error::Extraction(ExtractionError::Failed(_)) => 400,

            // 404 Not Found
            Error::NotFound(_) => 404,

            // 500 Internal Server Error - Server-side issues
            Error::Extraction(ExtractionError::Unexpected(_)) => 500,
            Error::Config { .. } => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,

            // 504 Gateway Timeout - collaborator exceeded its deadline
            Error::Extraction(ExtractionError::Timeout { .. }) => 504,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Validation(e) => match e {
                ValidationError::EmptyInput => "empty_input",
                ValidationError::UnsupportedSource => "unsupported_source",
            },
            Error::InvalidRequest(_) => "invalid_request",
            Error::Extraction(e) => match e {
                ExtractionError::Failed(_) => "extraction_failed",
                ExtractionError::Unexpected(_) => "unexpected_error",
                ExtractionError::Timeout { .. } => "timeout",
            },
            Error::NotFound(_) => "not_found",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        ApiError::new(error.to_string())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    /// Returns (Error, expected_status_code, expected_error_code) for every
    /// reachable match arm in ToHttpStatus.
    fn all_error_variants() -> Vec<(Error, u16, &'static str)> {
        vec![
            (
                Error::Config {
                    message: "bad value".into(),
                    key: Some("download.temp_dir".into()),
                },
                500,
                "config_error",
            ),
            (
                Error::Validation(ValidationError::EmptyInput),
                400,
                "empty_input",
            ),
            (
                Error::Validation(ValidationError::UnsupportedSource),
                400,
                "unsupported_source",
            ),
            (
                Error::InvalidRequest("expected JSON".into()),
                400,
                "invalid_request",
            ),
            (
                Error::Extraction(ExtractionError::Failed("Video unavailable".into())),
                400,
                "extraction_failed",
            ),
            (
                Error::Extraction(ExtractionError::Unexpected("disk full".into())),
                500,
                "unexpected_error",
            ),
            (
                Error::Extraction(ExtractionError::Timeout {
                    phase: "retrieval",
                    seconds: 30,
                }),
                504,
                "timeout",
            ),
            (Error::NotFound("artifact".into()), 404, "not_found"),
            (
                Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
                500,
                "io_error",
            ),
            (
                Error::ApiServerError("bind failed".into()),
                500,
                "api_server_error",
            ),
        ]
    }

    #[test]
    fn every_variant_maps_to_expected_status_code() {
        for (error, expected_status, _) in all_error_variants() {
            assert_eq!(
                error.status_code(),
                expected_status,
                "wrong status for {:?}",
                error
            );
        }
    }

    #[test]
    fn every_variant_maps_to_expected_error_code() {
        for (error, _, expected_code) in all_error_variants() {
            assert_eq!(error.error_code(), expected_code, "wrong code for {:?}", error);
        }
    }

    #[test]
    fn validation_messages_are_client_facing() {
        assert_eq!(
            Error::from(ValidationError::EmptyInput).to_string(),
            "URL is required"
        );
        assert_eq!(
            Error::from(ValidationError::UnsupportedSource).to_string(),
            "Invalid YouTube URL"
        );
    }

    #[test]
    fn extraction_failed_is_prefixed_with_download_error() {
        let error = Error::from(ExtractionError::Failed("Video unavailable".into()));
        assert_eq!(error.to_string(), "Download error: Video unavailable");
    }

    #[test]
    fn unexpected_is_prefixed_with_server_error() {
        let error = Error::from(ExtractionError::Unexpected("disk full".into()));
        assert_eq!(error.to_string(), "Server error: disk full");
    }

    #[test]
    fn timeout_message_names_the_deadline() {
        let error = Error::from(ExtractionError::Timeout {
            phase: "retrieval",
            seconds: 90,
        });
        assert_eq!(error.to_string(), "Download timed out after 90s");
    }

    #[test]
    fn api_error_serializes_as_flat_error_field() {
        let api_error: ApiError = Error::InvalidRequest("missing body".into()).into();
        let json = serde_json::to_value(&api_error).unwrap();
        assert_eq!(json, serde_json::json!({"error": "missing body"}));
    }
}
