//! Extraction adapter
//!
//! Turns a validated URL and a job id into an [`ExtractionResult`]:
//!
//! 1. Build the job's output template under the configured temp dir
//! 2. Metadata-only pass to learn the title (bounded by `info_timeout`)
//! 3. Retrieval pass with the same options (bounded by `download_timeout`)
//!
//! Any failure removes whatever the job left on disk, so a job either yields
//! a title plus a complete artifact or nothing at all.

use crate::artifacts;
use crate::config::{Config, DownloadConfig, ExtractorConfig};
use crate::error::ExtractionError;
use crate::extractor::{ExtractOptions, MediaExtractor};
use crate::types::{ExtractionResult, JobId};
use crate::validation::ValidUrl;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Title reported when the source has none
pub const UNKNOWN_TITLE: &str = "Unknown Video";

/// Format reported when the collaborator does not describe its choice
pub const UNKNOWN_FORMAT: &str = "unknown";

/// Drives the extraction collaborator for one job at a time
///
/// Holds no per-job state, so one instance serves concurrent requests.
pub struct MediaFetcher {
    extractor: Arc<dyn MediaExtractor>,
    extractor_config: ExtractorConfig,
    download_config: DownloadConfig,
}

impl MediaFetcher {
    /// Create a fetcher using the extractor and download settings from `config`
    pub fn new(extractor: Arc<dyn MediaExtractor>, config: &Config) -> Self {
        Self {
            extractor,
            extractor_config: config.extractor.clone(),
            download_config: config.download.clone(),
        }
    }

    /// The collaborator in use
    pub fn extractor(&self) -> &Arc<dyn MediaExtractor> {
        &self.extractor
    }

    /// Options handed to the collaborator for `job_id`
    pub fn options_for(&self, job_id: &JobId) -> ExtractOptions {
        let template = artifacts::output_template(
            &self.download_config.temp_dir,
            &self.download_config.file_prefix,
            job_id,
        );

        ExtractOptions {
            format: self.extractor_config.format_selector(),
            output_template: template.to_string_lossy().into_owned(),
            quiet: self.extractor_config.quiet,
            no_warnings: self.extractor_config.no_warnings,
            no_playlist: self.extractor_config.no_playlist,
        }
    }

    /// Run both phases for one job
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::Failed`] when the collaborator reports a source failure
    /// - [`ExtractionError::Timeout`] when a phase exceeds its deadline
    /// - [`ExtractionError::Unexpected`] for everything else
    pub async fn run(
        &self,
        url: &ValidUrl,
        job_id: &JobId,
    ) -> Result<ExtractionResult, ExtractionError> {
        match self.fetch(url, job_id).await {
            Ok(result) => Ok(result),
            Err(e) => {
                let removed = artifacts::remove_job_artifacts(
                    &self.download_config.temp_dir,
                    &self.download_config.file_prefix,
                    job_id,
                )
                .await;
                if removed > 0 {
                    debug!(job_id = %job_id, removed, "discarded partial artifacts");
                }
                Err(e)
            }
        }
    }

    async fn fetch(
        &self,
        url: &ValidUrl,
        job_id: &JobId,
    ) -> Result<ExtractionResult, ExtractionError> {
        let temp_dir = &self.download_config.temp_dir;
        tokio::fs::create_dir_all(temp_dir).await.map_err(|e| {
            ExtractionError::Unexpected(format!("cannot create {}: {}", temp_dir.display(), e))
        })?;

        let options = self.options_for(job_id);
        let started = Instant::now();

        let info = with_deadline(
            "metadata",
            self.download_config.info_timeout,
            self.extractor.extract_info(url, &options),
        )
        .await?;

        let title = info.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        let resolved_format = info
            .format
            .or(info.ext)
            .unwrap_or_else(|| UNKNOWN_FORMAT.to_string());

        debug!(
            job_id = %job_id,
            title = %title,
            format = %resolved_format,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "metadata resolved"
        );

        let reported = with_deadline(
            "retrieval",
            self.download_config.download_timeout,
            self.extractor.download(url, &options),
        )
        .await?;

        let artifact = match reported {
            Some(path) => Some(path),
            None => artifacts::find_artifact(temp_dir, &self.download_config.file_prefix, job_id)
                .await
                .map_err(|e| {
                    ExtractionError::Unexpected(format!("cannot inspect {}: {}", temp_dir.display(), e))
                })?,
        };

        if artifact.is_none() {
            warn!(job_id = %job_id, "retrieval finished but no artifact was found");
        }

        info!(
            job_id = %job_id,
            extractor = self.extractor.name(),
            artifact = ?artifact,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "retrieval complete"
        );

        Ok(ExtractionResult {
            title,
            resolved_format,
            artifact,
        })
    }
}

/// Await `fut`, converting deadline expiry into [`ExtractionError::Timeout`]
///
/// Dropping the future on expiry kills any child process it owns.
async fn with_deadline<T, F>(
    phase: &'static str,
    deadline: Duration,
    fut: F,
) -> Result<T, ExtractionError>
where
    F: Future<Output = Result<T, ExtractionError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(phase, deadline_secs = deadline.as_secs(), "extraction phase timed out");
            Err(ExtractionError::Timeout {
                phase,
                seconds: deadline.as_secs(),
            })
        }
    }
}
