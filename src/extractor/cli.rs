//! yt-dlp extractor using the external executable

use super::parser::{classify_failure, parse_downloaded_path, parse_info_json};
use super::traits::{ExtractOptions, MediaExtractor, MediaInfo};
use crate::error::ExtractionError;
use crate::validation::ValidUrl;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use tokio::process::Command;

/// Extractor backed by the external `yt-dlp` executable
///
/// Each phase spawns one process. Processes are killed when the future
/// driving them is dropped, so wrapping a call in `tokio::time::timeout`
/// releases the child on expiry.
///
/// # Examples
///
/// ```no_run
/// use media_dl::extractor::YtDlpExtractor;
/// use std::path::PathBuf;
///
/// // Explicit location
/// let extractor = YtDlpExtractor::new(PathBuf::from("/usr/local/bin/yt-dlp"));
///
/// // Or auto-discover from PATH
/// let extractor = YtDlpExtractor::from_path().expect("yt-dlp not found in PATH");
/// ```
pub struct YtDlpExtractor {
    binary_path: PathBuf,
}

impl YtDlpExtractor {
    /// Create an extractor with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Attempt to find yt-dlp in PATH
    pub fn from_path() -> Option<Self> {
        which::which("yt-dlp").ok().map(Self::new)
    }

    /// Path of the executable this extractor runs
    pub fn binary_path(&self) -> &PathBuf {
        &self.binary_path
    }

    /// Arguments shared by both phases, excluding the URL
    fn common_args(options: &ExtractOptions) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            options.format.clone(),
            "-o".to_string(),
            options.output_template.clone(),
        ];
        if options.quiet {
            args.push("--quiet".into());
        }
        if options.no_warnings {
            args.push("--no-warnings".into());
        }
        if options.no_playlist {
            args.push("--no-playlist".into());
        }
        args
    }

    /// Run yt-dlp to completion, treating a non-zero exit as a failure
    async fn run(&self, args: Vec<String>, url: &ValidUrl) -> Result<Output, ExtractionError> {
        tracing::debug!(binary = ?self.binary_path, ?args, url = %url, "running yt-dlp");

        let output = Command::new(&self.binary_path)
            .args(&args)
            // The URL comes from the client; keep it from being read as an option
            .arg("--")
            .arg(url.as_str())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ExtractionError::Unexpected(format!("failed to execute yt-dlp: {}", e)))?;

        if output.status.success() {
            Ok(output)
        } else {
            Err(classify_failure(&output.stderr, output.status.code()))
        }
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn extract_info(
        &self,
        url: &ValidUrl,
        options: &ExtractOptions,
    ) -> Result<MediaInfo, ExtractionError> {
        let mut args = Self::common_args(options);
        args.push("--dump-single-json".into());
        args.push("--skip-download".into());

        let output = self.run(args, url).await?;
        parse_info_json(&output.stdout)
    }

    async fn download(
        &self,
        url: &ValidUrl,
        options: &ExtractOptions,
    ) -> Result<Option<PathBuf>, ExtractionError> {
        let mut args = Self::common_args(options);
        args.push("--no-simulate".into());
        args.push("--print".into());
        args.push("after_move:filepath".into());

        let output = self.run(args, url).await?;
        Ok(parse_downloaded_path(&output.stdout))
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}
