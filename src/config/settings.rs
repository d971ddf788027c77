//! Application settings and configuration
//!
//! This module provides configuration management for the application,
//! loading settings from environment variables with sensible defaults.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::env;
use std::fmt;

use crate::error::StartupError;

/// Origins of the React dev server, served over plain and TLS
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "https://localhost:5173"];

/// Application environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[value(alias = "dev")]
    Development,
    #[value(alias = "stage")]
    Staging,
    #[value(alias = "prod")]
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = StartupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(StartupError::Configuration(format!(
                "Invalid environment: {}. Expected: development, staging, or production",
                s
            ))),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    #[value(alias = "text")]
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = StartupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            _ => Err(StartupError::Configuration(format!(
                "Invalid log format: {}. Expected: json or pretty",
                s
            ))),
        }
    }
}

/// Key used to sign session cookies and other tokens.
///
/// Never printed: `Debug` and `Display` both redact the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    /// Wrap a secret, rejecting empty or whitespace-only values
    pub fn new(value: impl Into<String>) -> Result<Self, StartupError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(StartupError::Configuration(
                "SECRET_KEY must not be empty".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Expose the raw secret to code that signs or verifies with it
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Main application settings
#[derive(Debug, Clone)]
pub struct Settings {
    // App settings
    pub app_name: String,
    pub app_version: String,
    pub environment: Environment,
    pub log_level: String,
    pub log_format: LogFormat,

    // Server settings
    pub host: String,
    pub port: u16,

    // Security
    pub secret_key: SecretKey,

    /// Origins allowed to make credentialed cross-origin requests
    pub allowed_origins: BTreeSet<String>,
}

impl Settings {
    /// Build settings around a secret, everything else at its default
    pub fn new(secret_key: SecretKey) -> Self {
        Self {
            app_name: "select-flow".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: Environment::Development,
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            host: "127.0.0.1".to_string(),
            port: 5000,
            secret_key,
            allowed_origins: default_allowed_origins(),
        }
    }

    /// Load settings from environment variables with defaults
    pub fn load() -> Result<Self, StartupError> {
        // Load .env file if it exists (ignored in production typically)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings from an arbitrary key lookup
    ///
    /// `load` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let secret_key = lookup("SECRET_KEY").ok_or_else(|| {
            StartupError::Configuration("SECRET_KEY is not set".to_string())
        })?;

        let allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(raw) => parse_origins(&raw),
            None => default_allowed_origins(),
        };

        let port = var_or("PORT", "5000");

        let settings = Self {
            app_name: var_or("APP_NAME", "select-flow"),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: var_or("ENVIRONMENT", "development").parse()?,
            log_level: var_or("LOG_LEVEL", "info"),
            log_format: var_or("LOG_FORMAT", "json").parse()?,
            host: var_or("HOST", "127.0.0.1"),
            port: port.parse().map_err(|_| {
                StartupError::Configuration(format!("Invalid PORT value: {}", port))
            })?,
            secret_key: SecretKey::new(secret_key)?,
            allowed_origins,
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), StartupError> {
        if self.port == 0 {
            return Err(StartupError::Configuration("Port cannot be 0".to_string()));
        }

        if self.allowed_origins.iter().any(|origin| origin == "*") {
            return Err(StartupError::Configuration(
                "CORS_ALLOWED_ORIGINS cannot contain '*' when credentials are allowed".to_string(),
            ));
        }

        if self.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured, cross-origin requests will be refused");
        }

        if self.is_production()
            && self
                .allowed_origins
                .iter()
                .any(|origin| origin.contains("localhost"))
        {
            tracing::warn!("Running in production with localhost CORS origins");
        }

        Ok(())
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Get the server address string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_allowed_origins() -> BTreeSet<String> {
    DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect()
}

/// Split a comma separated origin list, dropping blanks and trailing slashes
fn parse_origins(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_only_secret() {
        let settings = Settings::from_lookup(lookup_from(&[("SECRET_KEY", "s3cret")])).unwrap();
        assert_eq!(settings.secret_key.expose(), "s3cret");
        assert_eq!(settings.port, 5000);
        assert_eq!(settings.server_addr(), "127.0.0.1:5000");
        assert_eq!(settings.environment, Environment::Development);
        assert_eq!(
            settings.allowed_origins,
            ["http://localhost:5173", "https://localhost:5173"]
                .into_iter()
                .map(String::from)
                .collect::<BTreeSet<String>>()
        );
    }

    #[test]
    fn test_missing_secret_is_configuration_error() {
        let err = Settings::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, StartupError::Configuration(_)));
    }

    #[test]
    fn test_blank_secret_rejected() {
        let err = Settings::from_lookup(lookup_from(&[("SECRET_KEY", "   ")])).unwrap_err();
        assert!(err.to_string().contains("SECRET_KEY"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = Settings::from_lookup(lookup_from(&[("SECRET_KEY", "k"), ("PORT", "http")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));

        let err = Settings::from_lookup(lookup_from(&[("SECRET_KEY", "k"), ("PORT", "0")]))
            .unwrap_err();
        assert!(matches!(err, StartupError::Configuration(_)));
    }

    #[test]
    fn test_origins_override() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("SECRET_KEY", "k"),
            ("CORS_ALLOWED_ORIGINS", "https://app.selectflow.io/, ,https://admin.selectflow.io"),
        ]))
        .unwrap();
        assert_eq!(settings.allowed_origins.len(), 2);
        assert!(settings.allowed_origins.contains("https://app.selectflow.io"));
        assert!(settings.allowed_origins.contains("https://admin.selectflow.io"));
    }

    #[test]
    fn test_wildcard_origin_rejected() {
        let err = Settings::from_lookup(lookup_from(&[
            ("SECRET_KEY", "k"),
            ("CORS_ALLOWED_ORIGINS", "*"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("'*'"));
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("development".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!("moon".parse::<Environment>().is_err());
    }

    #[test]
    fn test_log_format_aliases_agree() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!(
            <LogFormat as ValueEnum>::from_str("text", false).unwrap(),
            LogFormat::Pretty
        );
        assert_eq!(
            <LogFormat as ValueEnum>::from_str("json", false).unwrap(),
            LogFormat::Json
        );
        assert_eq!(LogFormat::default(), LogFormat::Json);
        assert_eq!(Environment::default(), Environment::Development);
    }

    #[test]
    fn test_secret_is_redacted() {
        let key = SecretKey::new("hunter2").unwrap();
        assert_eq!(format!("{:?}", key), "SecretKey(***)");
        assert_eq!(key.to_string(), "***");
        let settings = Settings::new(key);
        assert!(!format!("{:?}", settings).contains("hunter2"));
    }
}
