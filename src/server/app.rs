//! Application factory and server
//!
//! [`create_app`] is the only way to obtain an [`App`]: it binds the secret
//! key, applies the cross-origin policy and registers the handler group
//! before handing the instance back.

use crate::{
    config::{SecretKey, Settings},
    error::{ApiError, StartupError},
    middleware::log_request,
    server::{
        cors::CorsPolicy,
        routes::{join_path, HandlerGroup, MainRoutes},
        state::AppState,
    },
};
use axum::{http::Uri, middleware, Router};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;

/// A handler group as recorded in the application's routing table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredGroup {
    pub name: String,
    pub mount_point: String,
    /// Absolute paths served by the group
    pub paths: Vec<String>,
}

/// A fully configured, ready-to-serve application
pub struct App {
    settings: Arc<Settings>,
    state: AppState,
    secret_key: SecretKey,
    cors: CorsPolicy,
    router: Router<AppState>,
    groups: Vec<RegisteredGroup>,
}

/// Build the application with the default handler group.
pub fn create_app(settings: Settings) -> Result<App, StartupError> {
    create_app_with(settings, MainRoutes)
}

/// Build the application with a caller-supplied handler group.
///
/// Fails without returning an instance when the settings are invalid or the
/// group cannot be registered.
pub fn create_app_with<G: HandlerGroup>(settings: Settings, group: G) -> Result<App, StartupError> {
    settings.validate()?;

    let settings = Arc::new(settings);
    let cors = CorsPolicy::new(settings.allowed_origins.iter().cloned(), true)?;

    let mut app = App {
        state: AppState::new(settings.clone()),
        secret_key: settings.secret_key.clone(),
        cors,
        router: Router::new(),
        groups: Vec::new(),
        settings,
    };
    app.register(group)?;

    tracing::debug!(
        groups = app.groups.len(),
        origins = ?app.cors.allowed_origins(),
        "Application created"
    );

    Ok(app)
}

impl App {
    /// Attach a handler group under its mount point.
    ///
    /// Nothing is attached unless the whole group is valid.
    pub fn register<G: HandlerGroup>(&mut self, group: G) -> Result<(), StartupError> {
        let name = group.name().trim().to_string();
        let mount_point = group.mount_point().to_string();

        if name.is_empty() {
            return Err(StartupError::registration(&name, "group name is empty"));
        }
        if self.groups.iter().any(|g| g.name == name) {
            return Err(StartupError::registration(&name, "a group with this name is already registered"));
        }
        if !mount_point.starts_with('/') {
            return Err(StartupError::registration(
                &name,
                format!("mount point {:?} must start with '/'", mount_point),
            ));
        }

        let routes = group.routes();
        if routes.is_empty() {
            return Err(StartupError::registration(&name, "group has no routes"));
        }

        // `Router::route` panics on any path its matcher rejects, so every
        // path is tried against the same matcher first.
        let mut table = matchit::Router::new();
        for existing in self.groups.iter().flat_map(|g| g.paths.iter()) {
            table
                .insert(existing.as_str(), ())
                .map_err(|e| StartupError::registration(&name, format!("routing table is inconsistent: {}", e)))?;
        }

        let mut paths = Vec::with_capacity(routes.len());
        for route in &routes {
            if !route.path.starts_with('/') {
                return Err(StartupError::registration(
                    &name,
                    format!("path {:?} must start with '/'", route.path),
                ));
            }
            let full = join_path(&mount_point, route.path);
            table.insert(full.as_str(), ()).map_err(|e| {
                StartupError::registration(&name, format!("path {} cannot be routed: {}", full, e))
            })?;
            paths.push(full);
        }

        let mut router = std::mem::take(&mut self.router);
        for (route, path) in routes.into_iter().zip(&paths) {
            router = router.route(path, route.handler);
        }
        self.router = router;

        tracing::info!(group = %name, mount_point = %mount_point, routes = paths.len(), "Registered handler group");

        self.groups.push(RegisteredGroup {
            name,
            mount_point,
            paths,
        });

        Ok(())
    }

    /// Build the servable router: handlers, fallback, CORS and request logging
    pub fn router(&self) -> Router {
        self.router
            .clone()
            .fallback(not_found)
            // Last added = outermost, so requests are logged before CORS runs
            .layer(self.cors.layer())
            .layer(middleware::from_fn(log_request))
            .with_state(self.state.clone())
    }

    /// Run the server with graceful shutdown support
    ///
    /// The server will shut down gracefully when receiving SIGINT (Ctrl+C)
    /// or SIGTERM signals.
    pub async fn run_with_graceful_shutdown(self) -> anyhow::Result<()> {
        let addr = self.settings.server_addr().parse::<SocketAddr>()?;
        let router = self.router();

        tracing::info!("Starting server on {} with graceful shutdown enabled", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    pub fn cors_policy(&self) -> &CorsPolicy {
        &self.cors
    }

    /// The routing table, one entry per registered group
    pub fn routes(&self) -> &[RegisteredGroup] {
        &self.groups
    }

    /// Whether any registered group serves `path`
    pub fn has_route(&self, path: &str) -> bool {
        self.groups.iter().any(|g| g.paths.iter().any(|p| p == path))
    }

    /// Get a reference to the application state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a reference to the settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}

/// Create a future that completes when a shutdown signal is received
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
