//! Cross-origin policy
//!
//! Only the configured origins may make credentialed cross-origin requests.
//! The decision is kept in [`CorsPolicy::permits`]; the HTTP header mechanics
//! are delegated to `tower_http`'s [`CorsLayer`].

use axum::http::{header, HeaderName, HeaderValue, Method};
use std::collections::BTreeSet;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::error::StartupError;

/// Headers exposed to the frontend
const EXPOSED_HEADERS: [&str; 2] = ["x-trace-id", "x-request-id"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    allowed_origins: BTreeSet<String>,
    allow_credentials: bool,
}

impl CorsPolicy {
    /// Build a policy, rejecting origins that cannot be sent as a header value.
    ///
    /// A wildcard origin is refused when credentials are allowed, browsers
    /// ignore `Access-Control-Allow-Origin: *` on credentialed requests.
    pub fn new<I, S>(origins: I, allow_credentials: bool) -> Result<Self, StartupError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed_origins: BTreeSet<String> = origins.into_iter().map(Into::into).collect();

        for origin in &allowed_origins {
            if allow_credentials && origin == "*" {
                return Err(StartupError::Configuration(
                    "wildcard origin cannot be combined with credentials".to_string(),
                ));
            }
            if HeaderValue::from_str(origin).is_err() {
                return Err(StartupError::Configuration(format!(
                    "invalid CORS origin: {:?}",
                    origin
                )));
            }
        }

        Ok(Self {
            allowed_origins,
            allow_credentials,
        })
    }

    /// Whether `origin` may make a credentialed cross-origin request.
    ///
    /// Exact, case-sensitive match.
    pub fn permits(&self, origin: &str) -> bool {
        self.allow_credentials && self.allowed_origins.contains(origin)
    }

    pub fn allowed_origins(&self) -> &BTreeSet<String> {
        &self.allowed_origins
    }

    pub fn allows_credentials(&self) -> bool {
        self.allow_credentials
    }

    /// Build the tower-http layer enforcing this policy
    pub fn layer(&self) -> CorsLayer {
        // Origins were validated in `new`
        let origins: Vec<HeaderValue> = self
            .allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::ACCEPT,
                HeaderName::from_static("x-requested-with"),
            ])
            .expose_headers(EXPOSED_HEADERS.map(HeaderName::from_static))
            .allow_credentials(self.allow_credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ALLOWED_ORIGINS;

    #[test]
    fn test_permits_exact_origins_only() {
        let policy = CorsPolicy::new(DEFAULT_ALLOWED_ORIGINS, true).unwrap();

        assert!(policy.permits("http://localhost:5173"));
        assert!(policy.permits("https://localhost:5173"));
        assert!(!policy.permits("https://evil.example"));
        assert!(!policy.permits("http://localhost:5174"));
        assert!(!policy.permits("http://LOCALHOST:5173"));
        assert!(!policy.permits("http://localhost:5173/"));
    }

    #[test]
    fn test_without_credentials_nothing_is_permitted() {
        let policy = CorsPolicy::new(DEFAULT_ALLOWED_ORIGINS, false).unwrap();
        assert!(!policy.permits("http://localhost:5173"));
        assert!(!policy.allows_credentials());
    }

    #[test]
    fn test_wildcard_with_credentials_rejected() {
        let err = CorsPolicy::new(["*"], true).unwrap_err();
        assert!(matches!(err, StartupError::Configuration(_)));
    }

    #[test]
    fn test_invalid_header_value_rejected() {
        assert!(CorsPolicy::new(["http://bad\norigin"], true).is_err());
    }

    #[test]
    fn test_duplicate_origins_collapse() {
        let policy = CorsPolicy::new(
            ["http://localhost:5173", "http://localhost:5173"],
            true,
        )
        .unwrap();
        assert_eq!(policy.allowed_origins().len(), 1);
    }
}
