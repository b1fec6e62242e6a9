//! Mapping of job outcomes and errors onto HTTP responses
//!
//! | Outcome                          | Status | Body                                   |
//! |----------------------------------|--------|----------------------------------------|
//! | completed                        | 200    | `{"status":"success","title","id"}`    |
//! | empty URL                        | 400    | `{"error":"URL is required"}`          |
//! | unsupported URL                  | 400    | `{"error":"Invalid YouTube URL"}`      |
//! | collaborator reported a failure  | 400    | `{"error":"Download error: <detail>"}` |
//! | anything else from the collaborator | 500 | `{"error":"Server error: <detail>"}`   |
//! | deadline exceeded                | 504    | `{"error":"Download timed out after Ns"}` |
//!
//! With [`ErrorDisclosure::Opaque`] the detail of a 500 is logged and the body
//! only names the error code.

use crate::config::ErrorDisclosure;
use crate::error::{ApiError, Error, ToHttpStatus};
use crate::service::JobOutcome;
use crate::types::DownloadResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Translate a finished job into a status code and payload
pub fn map_outcome(
    outcome: JobOutcome,
    disclosure: ErrorDisclosure,
) -> (StatusCode, DownloadResponse) {
    match outcome {
        JobOutcome::Completed { job_id, result } => (
            StatusCode::OK,
            DownloadResponse::success(result.title, job_id),
        ),
        JobOutcome::Rejected(e) => {
            let (status, message) = disclose(&Error::from(e), disclosure);
            (status, DownloadResponse::error(message))
        }
        JobOutcome::Failed { job_id, error } => {
            let error = Error::from(error);
            let (status, message) = disclose(&error, disclosure);
            if status.is_server_error() {
                tracing::error!(job_id = %job_id, code = error.error_code(), error = %error, "download request failed");
            }
            (status, DownloadResponse::error(message))
        }
    }
}

/// Render `error` as a JSON error response, honouring the disclosure policy
pub fn error_response(error: Error, disclosure: ErrorDisclosure) -> Response {
    let (status, message) = disclose(&error, disclosure);
    if status.is_server_error() {
        tracing::error!(code = error.error_code(), error = %error, "request failed");
    }
    (status, Json(ApiError::new(message))).into_response()
}

/// Status code and client-facing message for `error`
fn disclose(error: &Error, disclosure: ErrorDisclosure) -> (StatusCode, String) {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = match disclosure {
        ErrorDisclosure::Opaque if status == StatusCode::INTERNAL_SERVER_ERROR => {
            format!("Server error: {}", error.error_code())
        }
        _ => error.to_string(),
    };

    (status, message)
}

/// Implement IntoResponse for Error to automatically convert errors to HTTP responses
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error_response(self, ErrorDisclosure::Verbatim)
    }
}
