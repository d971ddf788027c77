//! Server module
//!
//! Contains the application factory, cross-origin policy, handler groups
//! and shared state.

pub mod app;
pub mod cors;
pub mod routes;
pub mod state;

pub use app::{create_app, create_app_with, App, RegisteredGroup};
pub use cors::CorsPolicy;
pub use routes::{HandlerGroup, MainRoutes, Route};
pub use state::AppState;
