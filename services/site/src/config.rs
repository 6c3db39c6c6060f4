//! services/site/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

pub const DEFAULT_SNAPSHOT_PATH: &str = "data/therapy-analytics.json";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Deployment environment. Only `Development` relaxes cookie security.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub environment: Environment,
    pub admin_password: Option<String>,
    pub admin_cookie_secret: Option<String>,
    pub snapshot_path: PathBuf,
    pub cors_origin: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("log_level", &self.log_level)
            .field("environment", &self.environment)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<set>"))
            .field("admin_cookie_secret", &self.admin_cookie_secret.as_ref().map(|_| "<set>"))
            .field("snapshot_path", &self.snapshot_path)
            .field("cors_origin", &self.cors_origin)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let environment = match std::env::var("APP_ENV") {
            Ok(value) => parse_environment(&value)?,
            Err(_) => Environment::Production,
        };

        // --- Load Admin Settings (as optional) ---
        // Without these the admin area stays locked rather than failing startup.
        let admin_password = non_empty_var("ADMIN_PASSWORD");
        let admin_cookie_secret = non_empty_var("ADMIN_COOKIE_SECRET");

        let snapshot_path = std::env::var("SNAPSHOT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SNAPSHOT_PATH));

        let cors_origin = non_empty_var("CORS_ORIGIN");

        Ok(Self {
            bind_address,
            log_level,
            environment,
            admin_password,
            admin_cookie_secret,
            snapshot_path,
            cors_origin,
        })
    }

    /// Whether cookies are sent with the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.environment != Environment::Development
    }
}

fn parse_environment(value: &str) -> Result<Environment, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "development" | "dev" | "local" => Ok(Environment::Development),
        "production" | "prod" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidValue(
            "APP_ENV".to_string(),
            format!("'{}' is not a known environment", other),
        )),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_names_are_case_insensitive() {
        assert_eq!(parse_environment("Development").unwrap(), Environment::Development);
        assert_eq!(parse_environment(" prod ").unwrap(), Environment::Production);
        assert!(matches!(
            parse_environment("staging"),
            Err(ConfigError::InvalidValue(name, _)) if name == "APP_ENV"
        ));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = Config {
            bind_address: "127.0.0.1:3000".parse().unwrap(),
            log_level: Level::INFO,
            environment: Environment::Development,
            admin_password: Some("hunter2".to_string()),
            admin_cookie_secret: Some("s3cret".to_string()),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            cors_origin: None,
        };
        let printed = format!("{:?}", config);

        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("s3cret"));
        assert!(!config.secure_cookies());
    }
}
