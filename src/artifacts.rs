//! Output artifact placement and lifecycle
//!
//! Every job writes to `<temp_dir>/<prefix><job_id>.<ext>`. This module builds
//! that template, finds the file again by job id, removes leftovers of failed
//! jobs, and runs the retention sweeper that bounds disk usage.

use crate::config::DownloadConfig;
use crate::types::{JOB_ID_LEN, JobId};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Suffixes yt-dlp uses for files that are still being written
const INCOMPLETE_SUFFIXES: [&str; 3] = [".part", ".ytdl", ".temp"];

/// Build the yt-dlp output template for a job
///
/// `%(ext)s` is left for the collaborator to fill in with the resolved
/// extension.
pub fn output_template(temp_dir: &Path, prefix: &str, job_id: &JobId) -> PathBuf {
    temp_dir.join(format!("{}{}.%(ext)s", prefix, job_id))
}

fn job_stem(prefix: &str, job_id: &JobId) -> String {
    format!("{}{}", prefix, job_id)
}

fn is_incomplete(name: &str) -> bool {
    INCOMPLETE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Whether `name` is `<prefix><12-hex job id>...`
fn belongs_to_service(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.get(..JOB_ID_LEN))
        .and_then(JobId::parse)
        .is_some()
}

/// Locate the finished artifact of a job
///
/// Returns `Ok(None)` when the directory holds no complete file for the job.
pub async fn find_artifact(
    temp_dir: &Path,
    prefix: &str,
    job_id: &JobId,
) -> std::io::Result<Option<PathBuf>> {
    let wanted = format!("{}.", job_stem(prefix, job_id));

    let mut entries = match fs::read_dir(temp_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with(&wanted) && !is_incomplete(name) && entry.file_type().await?.is_file()
        {
            return Ok(Some(entry.path()));
        }
    }

    Ok(None)
}

/// Delete every file belonging to a job, including partial downloads
///
/// Errors are logged and skipped. Returns the number of files removed.
pub async fn remove_job_artifacts(temp_dir: &Path, prefix: &str, job_id: &JobId) -> usize {
    let stem = job_stem(prefix, job_id);

    let mut entries = match fs::read_dir(temp_dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!(?temp_dir, error = %e, "cannot list temp dir for cleanup");
            return 0;
        }
    };

    let mut removed = 0;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(&stem));
        if !matches {
            continue;
        }

        let path = entry.path();
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(job_id = %job_id, ?path, "removed job artifact");
                removed += 1;
            }
            Err(e) => warn!(job_id = %job_id, ?path, error = %e, "failed to remove job artifact"),
        }
    }

    removed
}

/// Delete service artifacts older than `retention`
///
/// Only files named `<prefix><12-hex>...` are considered; anything else in
/// the directory is left alone. Returns the number of files removed.
pub async fn sweep_expired(
    temp_dir: &Path,
    prefix: &str,
    retention: Duration,
) -> std::io::Result<usize> {
    let mut entries = match fs::read_dir(temp_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        let owned = entry
            .file_name()
            .to_str()
            .is_some_and(|name| belongs_to_service(name, prefix));
        if !owned {
            continue;
        }

        let metadata = match entry.metadata().await {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => continue,
        };

        // Clock skew makes elapsed() fail; treat that as fresh
        let expired = metadata
            .modified()
            .ok()
            .and_then(|modified| modified.elapsed().ok())
            .is_some_and(|age| age >= retention);
        if !expired {
            continue;
        }

        let path = entry.path();
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(?path, "removed expired artifact");
                removed += 1;
            }
            Err(e) => warn!(?path, error = %e, "failed to remove expired artifact"),
        }
    }

    Ok(removed)
}

/// Start the background task that enforces the retention window
///
/// Returns `None` when retention is disabled. The task stops when `cancel`
/// fires.
pub fn spawn_retention_sweeper(
    config: &DownloadConfig,
    cancel: CancellationToken,
) -> Option<JoinHandle<()>> {
    let retention = config.retention?;
    let temp_dir = config.temp_dir.clone();
    let prefix = config.file_prefix.clone();
    let sweep_interval = config.sweep_interval;

    info!(
        ?temp_dir,
        retention_secs = retention.as_secs(),
        interval_secs = sweep_interval.as_secs(),
        "starting artifact retention sweeper"
    );

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("artifact retention sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    match sweep_expired(&temp_dir, &prefix, retention).await {
                        Ok(0) => {}
                        Ok(removed) => info!(removed, "swept expired artifacts"),
                        Err(e) => warn!(?temp_dir, error = %e, "artifact sweep failed"),
                    }
                }
            }
        }
    }))
}
