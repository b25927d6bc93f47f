//! Server configuration for the patient REST API.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `REST_SERVER_PORT` | 8080 | Server port |
//! | `REST_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `REST_LOG_LEVEL` | info | Log level |
//! | `REST_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `REST_ENABLE_CORS` | true | Enable CORS |
//! | `REST_CORS_ORIGINS` | * | Allowed origins |
//! | `REST_CORS_METHODS` | GET,PUT,OPTIONS | Allowed methods |
//! | `REST_CORS_HEADERS` | Content-Type,Authorization,Accept,X-Patient-ID | Allowed headers |
//! | `REST_BASE_URL` | http://localhost:8080 | Resource server URL |
//! | `REST_API_VERSION` | dstu2 | API version tag used in routes and URLs |
//! | `REST_RESOURCE_TYPE` | Patient | Resource type served |
//! | `REST_ENFORCE_READ_OWNERSHIP` | true | Apply patient scope to lookup-by-id results |
//! | `REST_SCOPE_HEADER` | X-Patient-ID | Header carrying the caller's patient scope |
//!
//! Boolean flags take an explicit value on the command line, for example
//! `--enforce-read-ownership false`.
//!
//! # Example
//!
//! ```rust
//! use patient_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     base_url: "https://fhir.example.com".to_string(),
//!     ..Default::default()
//! };
//! assert_eq!(config.socket_addr(), "127.0.0.1:3000");
//! ```

use clap::{ArgAction, Parser};

/// Server configuration for the patient REST API.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "patient-server")]
#[command(about = "FHIR Patient API Server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "REST_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "REST_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "REST_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "REST_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "REST_ENABLE_CORS", default_value = "true", action = ArgAction::Set)]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "REST_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(long, env = "REST_CORS_METHODS", default_value = "GET,PUT,OPTIONS")]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "REST_CORS_HEADERS",
        default_value = "Content-Type,Authorization,Accept,X-Patient-ID"
    )]
    pub cors_headers: String,

    /// Resource server URL (used in fullUrl, Location and Content-Location).
    #[arg(long, env = "REST_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// API version tag, e.g. `dstu2`.
    #[arg(long, env = "REST_API_VERSION", default_value = "dstu2")]
    pub api_version: String,

    /// Resource type served by this deployment.
    #[arg(long, env = "REST_RESOURCE_TYPE", default_value = "Patient")]
    pub resource_type: String,

    /// Deny lookup-by-id results owned by a different patient than the caller's scope.
    #[arg(
        long,
        env = "REST_ENFORCE_READ_OWNERSHIP",
        default_value = "true",
        action = ArgAction::Set
    )]
    pub enforce_read_ownership: bool,

    /// Request header carrying the authenticated patient identity.
    #[arg(long, env = "REST_SCOPE_HEADER", default_value = "X-Patient-ID")]
    pub scope_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,PUT,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization,Accept,X-Patient-ID".to_string(),
            base_url: "http://localhost:8080".to_string(),
            api_version: "dstu2".to_string(),
            resource_type: "Patient".to_string(),
            enforce_read_ownership: true,
            scope_header: "X-Patient-ID".to_string(),
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the route prefix for the served resource type, e.g. `/dstu2/Patient`.
    pub fn resource_path(&self) -> String {
        format!("/{}/{}", self.api_version, self.resource_type)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if let Err(e) = url::Url::parse(&self.base_url) {
            errors.push(format!("Base URL '{}' is invalid: {}", self.base_url, e));
        }

        if self.api_version.is_empty() || self.api_version.contains('/') {
            errors.push("API version must be a single non-empty path segment".to_string());
        }

        if self.resource_type.is_empty() || self.resource_type.contains('/') {
            errors.push("Resource type must be a single non-empty path segment".to_string());
        }

        if self.scope_header.is_empty() {
            errors.push("Scope header cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0 and disables features that might interfere
    /// with tests.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            base_url: "http://localhost:0".to_string(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_version, "dstu2");
        assert_eq!(config.resource_type, "Patient");
        assert!(config.enforce_read_ownership);
    }

    #[test]
    fn test_resource_path() {
        let config = ServerConfig::default();
        assert_eq!(config.resource_path(), "/dstu2/Patient");
    }

    #[test]
    fn test_validate_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_base_url() {
        let config = ServerConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("Base URL")));
    }

    #[test]
    fn test_validate_rejects_nested_version() {
        let config = ServerConfig {
            api_version: "fhir/dstu2".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_for_testing() {
        let config = ServerConfig::for_testing();
        assert_eq!(config.port, 0);
        assert!(!config.enable_cors);
    }

    #[test]
    fn test_boolean_flags_can_be_turned_off() {
        let config = ServerConfig::try_parse_from([
            "patient-server",
            "--enforce-read-ownership",
            "false",
            "--enable-cors",
            "false",
        ])
        .unwrap();
        assert!(!config.enforce_read_ownership);
        assert!(!config.enable_cors);

        let defaults = ServerConfig::try_parse_from(["patient-server"]).unwrap();
        assert!(defaults.enforce_read_ownership);
        assert!(defaults.enable_cors);
    }
}
