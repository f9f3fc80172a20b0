//! Configuration management for Rollcall.
//!
//! # Overview
//!
//! Rollcall reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `ROLLCALL_*` environment overrides
//! - Default values for optional settings
//! - Validation before any request is made
//!
//! The loaded [`RollcallConfig`] is converted into an immutable
//! [`ClientConfig`] that the HTTP client consumes.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rollcall::config::{load_config, ClientConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("rollcall.toml")?;
//! let client_config = ClientConfig::from_config(&config)?;
//! println!("Export API: {}", client_config.service_address());
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "development"
//!
//! [application]
//! log_level = "info"
//!
//! [service]
//! address = "https://events.example.org"
//! auth_strategy = "api_key"
//! api_key = "${ROLLCALL_API_KEY}"
//! api_secret = "${ROLLCALL_API_SECRET}"
//! retry_max = 3
//! retry_backoff_base_ms = 1000
//!
//! [export]
//! default_event_id = 42
//! page_size = 200
//! ```

pub mod client;
pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use client::{ClientConfig, ClientConfigBuilder, Credentials};
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, AuthStrategy, Environment, ExportConfig, LoggingConfig, RollcallConfig,
    ServiceConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
