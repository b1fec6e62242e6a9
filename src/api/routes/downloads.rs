//! Download handlers.

use crate::api::AppState;
use crate::api::error_response::{error_response, map_outcome};
use crate::artifacts;
use crate::error::Error;
use crate::types::{DownloadRequest, JobId};
use axum::{
    Json,
    body::Body,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;

/// POST /api/download - Retrieve media for a URL
#[utoipa::path(
    post,
    path = "/api/download",
    tag = "downloads",
    request_body = DownloadRequest,
    responses(
        (status = 200, description = "Media retrieved", body = crate::types::DownloadResponse),
        (status = 400, description = "Missing or unsupported URL, or the source refused the download", body = crate::types::DownloadResponse),
        (status = 500, description = "Unexpected failure", body = crate::types::DownloadResponse),
        (status = 504, description = "The extraction collaborator exceeded its deadline", body = crate::types::DownloadResponse)
    )
)]
pub async fn create_download(
    State(state): State<AppState>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "malformed download request");
            return error_response(
                Error::InvalidRequest(rejection.body_text()),
                state.config.error_disclosure,
            );
        }
    };

    let outcome = state.service.handle(request).await;
    let (status, body) = map_outcome(outcome, state.config.error_disclosure);
    (status, Json(body)).into_response()
}

/// GET /api/download/:id - Fetch the artifact of a completed job
#[utoipa::path(
    get,
    path = "/api/download/{id}",
    tag = "downloads",
    params(
        ("id" = String, Path, description = "Job id returned by POST /api/download")
    ),
    responses(
        (status = 200, description = "Media file", content_type = "application/octet-stream"),
        (status = 400, description = "Malformed job id", body = crate::error::ApiError),
        (status = 404, description = "No artifact for this job (never existed, failed, or expired)", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn get_artifact(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let disclosure = state.config.error_disclosure;

    let Some(job_id) = JobId::parse(&id) else {
        return error_response(
            Error::InvalidRequest("Invalid download id".to_string()),
            disclosure,
        );
    };

    let download = &state.config.download;
    let path = match artifacts::find_artifact(&download.temp_dir, &download.file_prefix, &job_id)
        .await
    {
        Ok(Some(path)) => path,
        Ok(None) => return error_response(Error::NotFound(format!("download {}", job_id)), disclosure),
        Err(e) => return error_response(Error::Io(e), disclosure),
    };

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        // Swept between lookup and open
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return error_response(Error::NotFound(format!("download {}", job_id)), disclosure);
        }
        Err(e) => return error_response(Error::Io(e), disclosure),
    };
    let length = file.metadata().await.ok().map(|m| m.len());

    let mut response = Body::from_stream(ReaderStream::new(file)).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type_for(&path)),
    );
    if let Some(length) = length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    }
    let disposition = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|name| HeaderValue::from_str(&format!("attachment; filename=\"{}\"", name)).ok());
    if let Some(value) = disposition {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    tracing::debug!(job_id = %job_id, ?path, "serving artifact");
    response
}

/// Content type for the container formats yt-dlp commonly produces
fn content_type_for(path: &std::path::Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("m4a") => "audio/mp4",
        Some("mp3") => "audio/mpeg",
        Some("opus") => "audio/ogg",
        _ => "application/octet-stream",
    }
}
