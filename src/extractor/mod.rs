//! Media extraction collaborator
//!
//! The service never parses media pages itself; it hands a validated URL to
//! an external extractor. The [`MediaExtractor`] trait is the seam:
//!
//! - [`YtDlpExtractor`]: runs the external `yt-dlp` executable
//! - [`NoOpExtractor`]: stand-in when no executable is available; every call
//!   fails as an unexpected error
//!
//! Implementations report source-specific failures (video unavailable,
//! geo-blocked, unsupported URL, format not available) as
//! [`ExtractionError::Failed`](crate::error::ExtractionError::Failed) and
//! everything else as
//! [`ExtractionError::Unexpected`](crate::error::ExtractionError::Unexpected).
//!
//! ## Usage
//!
//! ```no_run
//! use media_dl::config::ExtractorConfig;
//! use media_dl::extractor::{self, ExtractOptions, MediaExtractor};
//! use media_dl::validation::{validate, DEFAULT_SOURCES};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = extractor::from_config(&ExtractorConfig::default());
//! let url = validate("https://youtu.be/dQw4w9WgXcQ", &DEFAULT_SOURCES)?;
//! let options = ExtractOptions {
//!     format: "best[height<=720]".into(),
//!     output_template: "/tmp/yt_0123456789ab.%(ext)s".into(),
//!     quiet: true,
//!     no_warnings: true,
//!     no_playlist: true,
//! };
//!
//! let info = extractor.extract_info(&url, &options).await?;
//! println!("title: {:?}", info.title);
//! # Ok(())
//! # }
//! ```

mod cli;
mod noop;
mod parser;
mod traits;

pub use cli::YtDlpExtractor;
pub use noop::NoOpExtractor;
pub use parser::{classify_failure, parse_downloaded_path, parse_info_json};
pub use traits::{ExtractOptions, MediaExtractor, MediaInfo};

use crate::config::ExtractorConfig;
use std::sync::Arc;

/// Pick an extractor implementation based on config
///
/// An explicit `ytdlp_path` wins; otherwise PATH is searched when allowed.
/// Falls back to [`NoOpExtractor`] so the service still starts (and answers
/// `/health`) without the collaborator installed.
pub fn from_config(config: &ExtractorConfig) -> Arc<dyn MediaExtractor> {
    let extractor: Arc<dyn MediaExtractor> = if let Some(ref path) = config.ytdlp_path {
        Arc::new(YtDlpExtractor::new(path.clone()))
    } else if config.search_path {
        YtDlpExtractor::from_path()
            .map(|e| Arc::new(e) as Arc<dyn MediaExtractor>)
            .unwrap_or_else(|| Arc::new(NoOpExtractor))
    } else {
        Arc::new(NoOpExtractor)
    };

    if extractor.is_available() {
        tracing::info!(extractor = extractor.name(), "media extractor initialized");
    } else {
        tracing::warn!(
            extractor = extractor.name(),
            "yt-dlp not found; download requests will fail until it is installed"
        );
    }

    extractor
}
