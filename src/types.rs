//! Core types for media-dl

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::PathBuf;
use utoipa::ToSchema;

/// Length of a rendered job identifier in hex characters
pub const JOB_ID_LEN: usize = 12;

/// Opaque per-request identifier used to namespace the output artifact
///
/// Rendered as 12 lowercase hex characters (48 bits drawn from the thread-local
/// CSPRNG). Ids are never persisted and never reused.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Issue a fresh identifier
    pub fn issue() -> Self {
        let mut bytes = [0u8; JOB_ID_LEN / 2];
        rand::thread_rng().fill_bytes(&mut bytes);

        let mut rendered = String::with_capacity(JOB_ID_LEN);
        for byte in bytes {
            // Writing into a String cannot fail
            let _ = write!(rendered, "{:02x}", byte);
        }
        Self(rendered)
    }

    /// Accept an identifier supplied by a client
    ///
    /// Returns `None` unless the input is exactly 12 lowercase hex characters,
    /// so a parsed id is always safe to splice into a file name.
    pub fn parse(input: &str) -> Option<Self> {
        let well_formed = input.len() == JOB_ID_LEN
            && input
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        well_formed.then(|| Self(input.to_string()))
    }

    /// Borrow the rendered identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `POST /api/download`
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct DownloadRequest {
    /// Media page URL. A missing field is treated as empty input.
    #[serde(default)]
    pub url: String,
}

/// What the adapter learned and produced for one job
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Media title ("Unknown Video" when the source reports none)
    pub title: String,
    /// Format the collaborator selected for retrieval
    pub resolved_format: String,
    /// Location of the retrieved file, when it could be resolved
    pub artifact: Option<PathBuf>,
}

/// Outcome marker carried by [`DownloadResponse`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The media was retrieved
    Success,
    /// The request failed; the status field is omitted on the wire
    #[default]
    Error,
}

impl ResponseStatus {
    /// True for [`ResponseStatus::Error`]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

/// Response payload of `POST /api/download`
///
/// Success: `{"status":"success","title":"...","id":"<12-hex>"}`.
/// Failure: `{"error":"..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DownloadResponse {
    /// Outcome (present only on success)
    #[serde(default, skip_serializing_if = "ResponseStatus::is_error")]
    pub status: ResponseStatus,
    /// Resolved media title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Job identifier bound to the output artifact
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    /// Error message
    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl DownloadResponse {
    /// Successful download of `title` under `job_id`
    pub fn success(title: impl Into<String>, job_id: JobId) -> Self {
        Self {
            status: ResponseStatus::Success,
            title: Some(title.into()),
            job_id: Some(job_id),
            error_message: None,
        }
    }

    /// Failed request with a client-facing message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            title: None,
            job_id: None,
            error_message: Some(message.into()),
        }
    }
}

/// Lifecycle of one download request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    /// Request arrived, nothing checked yet
    Received,
    /// URL passed validation
    Validated,
    /// Job id issued and the adapter is running
    Extracting,
    /// Terminal: media retrieved
    Completed,
    /// Terminal: validation or extraction failed
    Failed,
}

impl JobState {
    /// Whether no further transitions are allowed
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether `self -> next` is a legal transition
    pub fn can_transition_to(self, next: JobState) -> bool {
        matches!(
            (self, next),
            (Self::Received, Self::Validated)
                | (Self::Received, Self::Failed)
                | (Self::Validated, Self::Extracting)
                | (Self::Extracting, Self::Completed)
                | (Self::Extracting, Self::Failed)
        )
    }

    /// Lowercase name used in log fields
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Extracting => "extracting",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
