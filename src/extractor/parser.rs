//! Parsers for yt-dlp output

use super::traits::MediaInfo;
use crate::error::ExtractionError;
use serde::Deserialize;
use std::path::PathBuf;

/// Longest stderr excerpt carried in an unexpected-failure message
const MAX_DETAIL_CHARS: usize = 500;

/// Prefix yt-dlp puts on the line describing a source failure
const ERROR_PREFIX: &str = "ERROR:";

/// Subset of the `--dump-single-json` document we care about
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawInfo {
    title: Option<String>,
    format: Option<String>,
    format_id: Option<String>,
    ext: Option<String>,
}

/// Parse the JSON document printed by `yt-dlp --dump-single-json`
///
/// A blank title is treated as missing. The format falls back to
/// `format_id` when the descriptive `format` field is absent.
///
/// # Errors
///
/// [`ExtractionError::Unexpected`] if stdout is not a JSON object.
pub fn parse_info_json(stdout: &[u8]) -> Result<MediaInfo, ExtractionError> {
    let raw: RawInfo = serde_json::from_slice(stdout).map_err(|e| {
        ExtractionError::Unexpected(format!("yt-dlp returned invalid JSON: {}", e))
    })?;

    Ok(MediaInfo {
        title: raw.title.filter(|t| !t.trim().is_empty()),
        format: raw.format.or(raw.format_id),
        ext: raw.ext,
    })
}

/// Classify a failed yt-dlp run
///
/// yt-dlp reports source-specific problems (unavailable video, geo block,
/// unsupported URL, missing format) on an `ERROR:` line. The last such line,
/// minus the prefix, becomes [`ExtractionError::Failed`]. A failure without
/// one is [`ExtractionError::Unexpected`] and carries the exit status and a
/// bounded stderr excerpt.
pub fn classify_failure(stderr: &[u8], exit_code: Option<i32>) -> ExtractionError {
    let text = String::from_utf8_lossy(stderr);

    if let Some(line) = text
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| line.starts_with(ERROR_PREFIX))
    {
        let message = line[ERROR_PREFIX.len()..].trim();
        return ExtractionError::Failed(message.to_string());
    }

    let trimmed = text.trim();
    let detail = if trimmed.is_empty() {
        "no output".to_string()
    } else {
        trimmed.chars().take(MAX_DETAIL_CHARS).collect()
    };

    match exit_code {
        Some(code) => {
            ExtractionError::Unexpected(format!("yt-dlp exited with status {}: {}", code, detail))
        }
        None => ExtractionError::Unexpected(format!("yt-dlp was terminated: {}", detail)),
    }
}

/// Extract the final file path printed by `--print after_move:filepath`
pub fn parse_downloaded_path(stdout: &[u8]) -> Option<PathBuf> {
    String::from_utf8_lossy(stdout)
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(PathBuf::from)
}
