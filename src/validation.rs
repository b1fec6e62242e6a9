//! Source URL validation
//!
//! The check is intentionally shallow: the input must be non-empty after
//! trimming and must contain one of the configured source hosts as a
//! substring. No URL parsing, normalization, or percent-decoding happens, so
//! a host that only appears in a query string is still accepted.

use crate::error::ValidationError;
use std::fmt;

/// Hosts accepted when no allowlist is configured
pub const DEFAULT_SOURCES: [&str; 2] = ["youtube.com", "youtu.be"];

/// A URL that passed [`validate`]
///
/// Holds the trimmed input exactly as submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidUrl(String);

impl ValidUrl {
    /// Borrow the URL
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ValidUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate a submitted URL against a source allowlist
///
/// # Errors
///
/// - [`ValidationError::EmptyInput`] if the trimmed input is empty
/// - [`ValidationError::UnsupportedSource`] if no allowlist entry occurs in it
pub fn validate<S: AsRef<str>>(input: &str, sources: &[S]) -> Result<ValidUrl, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    if !sources.iter().any(|host| trimmed.contains(host.as_ref())) {
        return Err(ValidationError::UnsupportedSource);
    }

    Ok(ValidUrl(trimmed.to_string()))
}
