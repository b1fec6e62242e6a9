//! Request handling for `POST /api/download`
//!
//! One call to [`DownloadService::handle`] walks a single job through
//! `received -> validated -> extracting -> completed | failed`. A request that
//! fails validation goes straight from `received` to `failed` and never gets a
//! job id.

use crate::config::Config;
use crate::error::{ExtractionError, ValidationError};
use crate::extractor::MediaExtractor;
use crate::fetcher::MediaFetcher;
use crate::types::{DownloadRequest, ExtractionResult, JobId, JobState};
use crate::validation::validate;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Terminal result of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The URL was rejected before any job id was issued
    Rejected(ValidationError),
    /// Media retrieved
    Completed {
        /// Id naming the artifact
        job_id: JobId,
        /// Title, format, and artifact location
        result: ExtractionResult,
    },
    /// The collaborator failed or timed out
    Failed {
        /// Id issued before the failure
        job_id: JobId,
        /// What went wrong
        error: ExtractionError,
    },
}

impl JobOutcome {
    /// Final state the job reached
    pub fn state(&self) -> JobState {
        match self {
            Self::Completed { .. } => JobState::Completed,
            Self::Rejected(_) | Self::Failed { .. } => JobState::Failed,
        }
    }

    /// Job id, if one was issued
    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            Self::Rejected(_) => None,
            Self::Completed { job_id, .. } | Self::Failed { job_id, .. } => Some(job_id),
        }
    }
}

/// Tracks one job's state and logs every transition
struct JobTracker {
    state: JobState,
    job_id: Option<JobId>,
}

impl JobTracker {
    fn new() -> Self {
        Self {
            state: JobState::Received,
            job_id: None,
        }
    }

    fn advance(&mut self, next: JobState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal job transition {} -> {}",
            self.state,
            next
        );
        debug!(
            job_id = self.job_id.as_ref().map(JobId::as_str),
            from = %self.state,
            to = %next,
            "job state changed"
        );
        self.state = next;
    }
}

/// Handles download requests; shared across all connections
pub struct DownloadService {
    config: Arc<Config>,
    fetcher: MediaFetcher,
}

impl DownloadService {
    /// Create a service that runs jobs through `extractor`
    pub fn new(config: Arc<Config>, extractor: Arc<dyn MediaExtractor>) -> Self {
        let fetcher = MediaFetcher::new(extractor, &config);
        Self { config, fetcher }
    }

    /// Active configuration
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Adapter used for extraction
    pub fn fetcher(&self) -> &MediaFetcher {
        &self.fetcher
    }

    /// Validate, issue a job id, and run the extraction
    ///
    /// Never fails: every failure is captured in the returned [`JobOutcome`].
    /// Concurrent calls share nothing but config, so they cannot observe each
    /// other's ids or artifacts.
    pub async fn handle(&self, request: DownloadRequest) -> JobOutcome {
        let mut job = JobTracker::new();

        let url = match validate(&request.url, self.config.sources.as_slice()) {
            Ok(url) => {
                job.advance(JobState::Validated);
                url
            }
            Err(e) => {
                job.advance(JobState::Failed);
                info!(reason = %e, "rejected download request");
                return JobOutcome::Rejected(e);
            }
        };

        let job_id = JobId::issue();
        job.job_id = Some(job_id.clone());
        job.advance(JobState::Extracting);
        info!(job_id = %job_id, url = %url, "download started");

        let started = Instant::now();
        match self.fetcher.run(&url, &job_id).await {
            Ok(result) => {
                job.advance(JobState::Completed);
                info!(
                    job_id = %job_id,
                    title = %result.title,
                    format = %result.resolved_format,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "download completed"
                );
                JobOutcome::Completed { job_id, result }
            }
            Err(error) => {
                job.advance(JobState::Failed);
                warn!(
                    job_id = %job_id,
                    error = %error,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "download failed"
                );
                JobOutcome::Failed { job_id, error }
            }
        }
    }
}
