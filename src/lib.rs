//! # media-dl
//!
//! HTTP service that accepts a media page URL, checks it against an allowlist
//! of source hosts, and retrieves the media (capped at 720p) through yt-dlp.
//!
//! ## Flow
//!
//! 1. [`validation`] rejects empty or unsupported URLs before any work happens
//! 2. [`service::DownloadService`] issues a [`JobId`] that namespaces the output file
//! 3. [`fetcher::MediaFetcher`] drives the [`extractor`] in two phases (metadata, then retrieval)
//! 4. [`api`] maps the outcome to a JSON response and status code
//!
//! ## Quick Start
//!
//! ```no_run
//! use media_dl::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None)?;
//!
//!     // Serves until SIGINT / SIGTERM
//!     media_dl::run(config).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// HTTP API module
pub mod api;
/// Artifact placement, lookup, and retention
pub mod artifacts;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// External extraction collaborator
pub mod extractor;
/// Two-phase extraction adapter
pub mod fetcher;
/// Request handling and job lifecycle
pub mod service;
/// Core types
pub mod types;
/// Source URL validation
pub mod validation;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use config::{Config, ErrorDisclosure};
pub use error::{Error, ExtractionError, Result, ValidationError};
pub use service::{DownloadService, JobOutcome};
pub use types::{DownloadRequest, DownloadResponse, JobId, JobState};

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Run the service until a shutdown signal arrives
///
/// Selects the extractor, starts the retention sweeper, serves the API with
/// graceful shutdown on SIGINT / SIGTERM, then stops the sweeper.
///
/// # Errors
///
/// Returns an error if the config is invalid, the bind address is unavailable,
/// or the server fails.
pub async fn run(config: Config) -> Result<()> {
    config.validate()?;
    let config = Arc::new(config);

    let extractor = extractor::from_config(&config.extractor);
    let service = Arc::new(DownloadService::new(config.clone(), extractor));

    let cancel = CancellationToken::new();
    let sweeper = artifacts::spawn_retention_sweeper(&config.download, cancel.clone());

    let result = api::start_api_server(service, config, shutdown_signal()).await;

    cancel.cancel();
    if let Some(sweeper) = sweeper
        && let Err(e) = sweeper.await
    {
        tracing::warn!(error = %e, "retention sweeper ended abnormally");
    }

    result
}

/// Wait for a shutdown signal (SIGTERM or SIGINT)
///
/// On non-Unix platforms only Ctrl+C is observed.
pub async fn shutdown_signal() {
    wait_for_signal().await;
    tracing::info!("Shutdown signal received, draining in-flight requests");
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
