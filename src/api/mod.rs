//! API endpoint handlers module
//!
//! Contains all HTTP endpoint handler implementations.

pub mod dashboard;
pub mod health;
