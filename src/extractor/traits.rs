//! Traits and types for media extraction

use crate::error::ExtractionError;
use crate::validation::ValidUrl;
use async_trait::async_trait;
use std::path::PathBuf;

/// Settings passed to the collaborator for both phases of a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// yt-dlp format selector, e.g. `best[height<=720]`
    pub format: String,
    /// Output path template; `%(ext)s` is replaced by the resolved extension
    pub output_template: String,
    /// Suppress progress output
    pub quiet: bool,
    /// Suppress warnings
    pub no_warnings: bool,
    /// Ignore the playlist part of a watch URL
    pub no_playlist: bool,
}

/// Metadata returned by the info-only phase
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaInfo {
    /// Media title
    pub title: Option<String>,
    /// Human-readable description of the selected format
    pub format: Option<String>,
    /// File extension of the selected format
    pub ext: Option<String>,
}

/// Trait for the external media extraction collaborator
///
/// Both calls target the same URL with the same options. `extract_info` must
/// not fetch media bytes; `download` writes the media according to
/// `options.output_template`.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Resolve metadata without retrieving the media
    ///
    /// # Errors
    ///
    /// [`ExtractionError::Failed`] for source-specific failures, otherwise
    /// [`ExtractionError::Unexpected`].
    async fn extract_info(
        &self,
        url: &ValidUrl,
        options: &ExtractOptions,
    ) -> Result<MediaInfo, ExtractionError>;

    /// Retrieve the media
    ///
    /// Returns the path of the written file when the collaborator reports it.
    async fn download(
        &self,
        url: &ValidUrl,
        options: &ExtractOptions,
    ) -> Result<Option<PathBuf>, ExtractionError>;

    /// Whether the collaborator can actually run
    fn is_available(&self) -> bool {
        true
    }

    /// Short name for logs
    fn name(&self) -> &'static str;
}
