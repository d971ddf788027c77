//! SelectFlow API library

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod server;

// Re-export commonly used types
pub use config::Settings;
pub use error::{ApiError, StartupError};
pub use server::{create_app, App};
