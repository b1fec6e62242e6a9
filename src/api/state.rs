//! Application state for the API server

use crate::{Config, DownloadService};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned per request; both fields are `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Request handler for `POST /api/download`
    pub service: Arc<DownloadService>,

    /// Read-only configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service: Arc<DownloadService>, config: Arc<Config>) -> Self {
        Self { service, config }
    }
}
