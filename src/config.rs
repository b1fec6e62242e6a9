//! Configuration types for media-dl
//!
//! A [`Config`] is resolved once at process start (JSON file, then command
//! line / environment overrides), validated, wrapped in an `Arc`, and never
//! mutated afterwards.

use crate::error::{Error, Result};
use crate::validation::DEFAULT_SOURCES;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::Path, path::PathBuf, time::Duration};

/// Main configuration for the service
///
/// - [`api`](ApiConfig): bind address, CORS, Swagger UI
/// - [`sources`](Config::sources): accepted source hosts
/// - [`extractor`](ExtractorConfig): yt-dlp binary and format constraints
/// - [`download`](DownloadConfig): output placement, deadlines, retention
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Host substrings a submitted URL must contain (default: youtube.com, youtu.be)
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,

    /// Extraction collaborator settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Output artifact settings
    #[serde(default)]
    pub download: DownloadConfig,

    /// How much internal error detail reaches clients
    #[serde(default)]
    pub error_disclosure: ErrorDisclosure,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            sources: default_sources(),
            extractor: ExtractorConfig::default(),
            download: DownloadConfig::default(),
            error_disclosure: ErrorDisclosure::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, or defaults when no path is given
    ///
    /// Missing fields fall back to their defaults. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
                    message: format!("failed to read {}: {}", path.display(), e),
                    key: None,
                })?;
                serde_json::from_str(&raw).map_err(|e| Error::Config {
                    message: format!("failed to parse {}: {}", path.display(), e),
                    key: None,
                })?
            }
            None => Config::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() || self.sources.iter().any(|s| s.trim().is_empty()) {
            return Err(config_error("sources", "must list at least one non-empty host"));
        }

        if self.extractor.max_height == 0 {
            return Err(config_error("extractor.max_height", "must be greater than zero"));
        }

        if self.download.file_prefix.contains(['/', '\\']) {
            return Err(config_error(
                "download.file_prefix",
                "must not contain path separators",
            ));
        }

        if self.download.info_timeout.is_zero() {
            return Err(config_error("download.info_timeout", "must be greater than zero"));
        }

        if self.download.download_timeout.is_zero() {
            return Err(config_error(
                "download.download_timeout",
                "must be greater than zero",
            ));
        }

        if self.download.sweep_interval.is_zero() {
            return Err(config_error(
                "download.sweep_interval",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}

fn config_error(key: &str, message: &str) -> Error {
    Error::Config {
        message: format!("{} {}", key, message),
        key: Some(key.to_string()),
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:5000)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// Extraction collaborator (yt-dlp) configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Path to the yt-dlp executable (auto-detected if None)
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Whether to search PATH for yt-dlp if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// Maximum video height to select (default: 720)
    #[serde(default = "default_max_height")]
    pub max_height: u32,

    /// Suppress progress output (default: true)
    #[serde(default = "default_true")]
    pub quiet: bool,

    /// Suppress warnings (default: true)
    #[serde(default = "default_true")]
    pub no_warnings: bool,

    /// Download a single video even when the URL points into a playlist (default: true)
    #[serde(default = "default_true")]
    pub no_playlist: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            search_path: true,
            max_height: default_max_height(),
            quiet: true,
            no_warnings: true,
            no_playlist: true,
        }
    }
}

impl ExtractorConfig {
    /// yt-dlp format selector honoring the height limit
    pub fn format_selector(&self) -> String {
        format!("best[height<={}]", self.max_height)
    }
}

/// Output artifact configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory receiving retrieved media (default: OS temp dir)
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// File name prefix placed before the job id (default: "yt_")
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Deadline for the metadata phase in seconds (default: 60)
    #[serde(default = "default_info_timeout", with = "duration_serde")]
    pub info_timeout: Duration,

    /// Deadline for the retrieval phase in seconds (default: 1800)
    #[serde(default = "default_download_timeout", with = "duration_serde")]
    pub download_timeout: Duration,

    /// How long artifacts are kept before the sweeper deletes them, in seconds
    /// (default: 3600, null = keep forever)
    #[serde(default = "default_retention", with = "optional_duration_serde")]
    pub retention: Option<Duration>,

    /// How often the sweeper runs, in seconds (default: 300)
    #[serde(default = "default_sweep_interval", with = "duration_serde")]
    pub sweep_interval: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
            file_prefix: default_file_prefix(),
            info_timeout: default_info_timeout(),
            download_timeout: default_download_timeout(),
            retention: default_retention(),
            sweep_interval: default_sweep_interval(),
        }
    }
}

/// How internal (5xx) error detail is reported to clients
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorDisclosure {
    /// Pass the underlying message through ("Server error: disk full")
    #[default]
    Verbatim,
    /// Replace it with the error code ("Server error: unexpected_error") and log the detail
    Opaque,
}

fn default_sources() -> Vec<String> {
    DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect()
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

fn default_true() -> bool {
    true
}

fn default_max_height() -> u32 {
    720
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir()
}

fn default_file_prefix() -> String {
    "yt_".into()
}

fn default_info_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_download_timeout() -> Duration {
    Duration::from_secs(30 * 60)
}

fn default_retention() -> Option<Duration> {
    Some(Duration::from_secs(60 * 60))
}

fn default_sweep_interval() -> Duration {
    Duration::from_secs(5 * 60)
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
