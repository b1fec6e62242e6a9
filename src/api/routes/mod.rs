//! Route handlers for the REST API
//!
//! - [`downloads`]: submit a URL, fetch a finished artifact
//! - [`system`]: landing page, health, OpenAPI

mod downloads;
mod system;

// Re-export all handlers so `routes::function_name` works
pub use downloads::*;
pub use system::*;
