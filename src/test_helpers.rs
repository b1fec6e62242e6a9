//! Shared test helpers: a scriptable extractor and a config rooted in a tempdir.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::config::Config;
use crate::error::ExtractionError;
use crate::extractor::{ExtractOptions, MediaExtractor, MediaInfo};
use crate::validation::ValidUrl;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Format description reported by [`MockExtractor`]
pub(crate) const MOCK_FORMAT: &str = "18 - 640x360";

/// What a [`MockExtractor`] does when called
#[derive(Debug, Clone)]
pub(crate) enum MockBehavior {
    /// Both phases succeed; `write_file` controls whether an artifact is written
    Succeed {
        title: Option<String>,
        write_file: bool,
    },
    /// The metadata phase fails
    FailInfo(ExtractionError),
    /// Retrieval leaves a partial file behind and then fails
    FailDownload(ExtractionError),
    /// Retrieval writes a partial file and never returns
    HangOnDownload,
}

/// In-process stand-in for yt-dlp
pub(crate) struct MockExtractor {
    behavior: MockBehavior,
    delay: Duration,
    calls: Mutex<Vec<&'static str>>,
    templates: Mutex<Vec<String>>,
}

impl MockExtractor {
    pub(crate) fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            templates: Mutex::new(Vec::new()),
        }
    }

    /// Succeeds with `title` and writes an `.mp4` artifact
    pub(crate) fn succeeding(title: &str) -> Self {
        Self::new(MockBehavior::Succeed {
            title: Some(title.to_string()),
            write_file: true,
        })
    }

    /// Sleep this long inside retrieval, to keep jobs in flight together
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Phases invoked so far, in order
    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    /// Output templates seen by the retrieval phase
    pub(crate) fn templates(&self) -> Vec<String> {
        self.templates.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

fn resolve(template: &str, ext: &str) -> PathBuf {
    PathBuf::from(template.replace("%(ext)s", ext))
}

#[async_trait]
impl MediaExtractor for MockExtractor {
    async fn extract_info(
        &self,
        _url: &ValidUrl,
        _options: &ExtractOptions,
    ) -> Result<MediaInfo, ExtractionError> {
        self.record("info");

        match &self.behavior {
            MockBehavior::FailInfo(e) => Err(e.clone()),
            MockBehavior::Succeed { title, .. } => Ok(MediaInfo {
                title: title.clone(),
                format: Some(MOCK_FORMAT.to_string()),
                ext: Some("mp4".to_string()),
            }),
            _ => Ok(MediaInfo {
                title: Some("Mock".to_string()),
                format: Some(MOCK_FORMAT.to_string()),
                ext: Some("mp4".to_string()),
            }),
        }
    }

    async fn download(
        &self,
        _url: &ValidUrl,
        options: &ExtractOptions,
    ) -> Result<Option<PathBuf>, ExtractionError> {
        self.record("download");
        self.templates
            .lock()
            .unwrap()
            .push(options.output_template.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.behavior {
            MockBehavior::Succeed { write_file, .. } => {
                if !write_file {
                    return Ok(None);
                }
                let path = resolve(&options.output_template, "mp4");
                tokio::fs::write(&path, b"mock media").await.unwrap();
                Ok(Some(path))
            }
            MockBehavior::FailDownload(e) => {
                let partial = resolve(&options.output_template, "mp4.part");
                tokio::fs::write(&partial, b"partial").await.unwrap();
                Err(e.clone())
            }
            MockBehavior::HangOnDownload => {
                let partial = resolve(&options.output_template, "mp4.part");
                tokio::fs::write(&partial, b"partial").await.unwrap();
                std::future::pending().await
            }
            MockBehavior::FailInfo(_) => unreachable!("retrieval runs only after metadata"),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Default config with artifacts written under `temp_dir`
pub(crate) fn test_config(temp_dir: &Path) -> Config {
    let mut config = Config::default();
    config.download.temp_dir = temp_dir.to_path_buf();
    config
}
