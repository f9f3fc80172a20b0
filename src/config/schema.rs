//! Configuration schema types
//!
//! This module defines the TOML file structure for Rollcall. These structs are
//! the raw, as-loaded form; the HTTP client only ever sees the validated
//! [`ClientConfig`](super::ClientConfig) built from them.

use crate::config::SecretString;
use serde::Deserialize;

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Authentication scheme used against the export API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthStrategy {
    /// `Authorization: Bearer <token>` header
    #[default]
    Token,
    /// `apikey` query parameter, HMAC-signed when a secret is configured
    ApiKey,
}

impl std::str::FromStr for AuthStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "token" => Ok(AuthStrategy::Token),
            "api_key" | "apikey" => Ok(AuthStrategy::ApiKey),
            other => Err(format!(
                "Invalid auth_strategy '{other}'. Must be one of: token, api_key"
            )),
        }
    }
}

/// Main Rollcall configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct RollcallConfig {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Export API connection settings
    pub service: ServiceConfig,

    /// Export defaults
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RollcallConfig {
    /// Validates the configuration
    ///
    /// Credential and numeric-bound checks are performed by
    /// [`ClientConfig::from_config`](super::ClientConfig::from_config), which
    /// the loader runs as part of validation.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.export.validate()?;
        self.logging.validate()?;

        if self.environment == Environment::Production && self.service.trust_all_certificates {
            return Err(
                "service.trust_all_certificates cannot be enabled in production environments"
                    .to_string(),
            );
        }

        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Export API connection and credential settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the export API (e.g. `https://events.example.org`)
    pub address: String,

    /// Authentication scheme
    #[serde(default)]
    pub auth_strategy: AuthStrategy,

    /// Bearer token (token strategy)
    #[serde(default)]
    pub api_token: Option<SecretString>,

    /// API key (api_key strategy)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Signing secret (api_key strategy). An empty secret sends unsigned requests.
    #[serde(default)]
    pub api_secret: Option<SecretString>,

    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: i64,

    /// Per-attempt read timeout in milliseconds
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: i64,

    /// Disable TLS certificate validation
    ///
    /// **SECURITY WARNING**: exposes the client to man-in-the-middle attacks.
    /// Only for development against self-signed servers; rejected in production.
    #[serde(default)]
    pub trust_all_certificates: bool,

    /// Retries after the first attempt for 429, 5xx and network failures
    #[serde(default = "default_retry_max")]
    pub retry_max: i64,

    /// Base of the exponential backoff in milliseconds (0 disables sleeping)
    #[serde(default = "default_retry_backoff_base_ms")]
    pub retry_backoff_base_ms: i64,
}

/// Export defaults
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Event searched when neither filter nor option names one
    #[serde(default)]
    pub default_event_id: Option<i64>,

    /// Page size requested when the caller gives no hint
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(event_id) = self.default_event_id {
            if event_id <= 0 {
                return Err(format!(
                    "export.default_event_id must be a positive integer, got {event_id}"
                ));
            }
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_event_id: None,
            page_size: default_page_size(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to rolling files
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly, never)
    #[serde(default = "default_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_connect_timeout_ms() -> i64 {
    10_000
}

fn default_read_timeout_ms() -> i64 {
    30_000
}

fn default_retry_max() -> i64 {
    3
}

fn default_retry_backoff_base_ms() -> i64 {
    1_000
}

fn default_page_size() -> i64 {
    200
}

fn default_log_path() -> String {
    "./logs".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}
