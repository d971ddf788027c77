//! Error types
//!
//! Startup failures abort the process; API errors are rendered as JSON responses.

pub mod types;

pub use types::{ApiError, StartupError};
