//! Route handler groups
//!
//! A [`HandlerGroup`] is a named bundle of routes attached to an application
//! under a mount point. The crate ships one group, [`MainRoutes`].

use axum::routing::{get, MethodRouter};

use crate::api::{dashboard, health};
use crate::server::state::AppState;

/// One path in a handler group, relative to the group's mount point
pub struct Route {
    pub path: &'static str,
    pub handler: MethodRouter<AppState>,
}

impl Route {
    pub fn new(path: &'static str, handler: MethodRouter<AppState>) -> Self {
        Self { path, handler }
    }
}

/// A named group of request handlers that can be registered on an [`App`].
///
/// [`App`]: crate::server::App
pub trait HandlerGroup {
    /// Unique name of the group within one application
    fn name(&self) -> &str;

    /// Prefix every route of the group is mounted under
    fn mount_point(&self) -> &str {
        "/"
    }

    fn routes(&self) -> Vec<Route>;
}

/// The default handler group: service index, probes and dashboard data
#[derive(Debug, Clone, Copy, Default)]
pub struct MainRoutes;

impl HandlerGroup for MainRoutes {
    fn name(&self) -> &str {
        "main"
    }

    fn routes(&self) -> Vec<Route> {
        vec![
            Route::new("/", get(health::index)),
            // Health check routes
            Route::new("/health", get(health::health_check)),
            Route::new("/ready", get(health::readiness)),
            Route::new("/liveness", get(health::liveness)),
            Route::new("/api/dashboard/metrics", get(dashboard::metrics)),
        ]
    }
}

/// Join a mount point and a group-relative path
pub(crate) fn join_path(mount_point: &str, path: &str) -> String {
    let prefix = mount_point.trim_end_matches('/');
    match (prefix.is_empty(), path) {
        (true, _) => path.to_string(),
        (false, "/") => prefix.to_string(),
        (false, _) => format!("{}{}", prefix, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/", "/health"), "/health");
        assert_eq!(join_path("/", "/"), "/");
        assert_eq!(join_path("/api", "/"), "/api");
        assert_eq!(join_path("/api/", "/jobs"), "/api/jobs");
    }

    #[test]
    fn test_main_routes_paths() {
        let group = MainRoutes;
        let paths: Vec<_> = group.routes().iter().map(|r| r.path).collect();
        assert_eq!(group.name(), "main");
        assert_eq!(group.mount_point(), "/");
        assert!(paths.contains(&"/health"));
        assert!(paths.contains(&"/api/dashboard/metrics"));
    }
}
