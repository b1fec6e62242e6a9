//! No-op extractor used when yt-dlp is unavailable

use super::traits::{ExtractOptions, MediaExtractor, MediaInfo};
use crate::error::ExtractionError;
use crate::validation::ValidUrl;
use async_trait::async_trait;
use std::path::PathBuf;

const UNAVAILABLE: &str =
    "yt-dlp is not available. Configure extractor.ytdlp_path or ensure yt-dlp is in PATH.";

/// Extractor used when no yt-dlp executable is available or configured
///
/// Every call fails with [`ExtractionError::Unexpected`], which maps to a 500
/// response.
///
/// # Examples
///
/// ```
/// use media_dl::extractor::{ExtractOptions, MediaExtractor, NoOpExtractor};
/// use media_dl::validation::{validate, DEFAULT_SOURCES};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let extractor = NoOpExtractor;
/// let url = validate("https://youtu.be/x", &DEFAULT_SOURCES)?;
/// let options = ExtractOptions {
///     format: "best".into(),
///     output_template: "/tmp/out.%(ext)s".into(),
///     quiet: true,
///     no_warnings: true,
///     no_playlist: true,
/// };
///
/// assert!(extractor.extract_info(&url, &options).await.is_err());
/// # Ok(())
/// # }
/// ```
pub struct NoOpExtractor;

#[async_trait]
impl MediaExtractor for NoOpExtractor {
    async fn extract_info(
        &self,
        _url: &ValidUrl,
        _options: &ExtractOptions,
    ) -> Result<MediaInfo, ExtractionError> {
        Err(ExtractionError::Unexpected(UNAVAILABLE.into()))
    }

    async fn download(
        &self,
        _url: &ValidUrl,
        _options: &ExtractOptions,
    ) -> Result<Option<PathBuf>, ExtractionError> {
        Err(ExtractionError::Unexpected(UNAVAILABLE.into()))
    }

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
