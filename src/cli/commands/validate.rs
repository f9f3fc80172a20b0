//! Validate config command implementation
//!
//! This module implements the `validate-config` command. The printed summary
//! never includes tokens, keys or secrets.

use crate::config::{load_config, ClientConfig, Credentials};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let client = match ClientConfig::from_config(&config) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Export API: {}", client.service_address());
        println!("  Authentication: {}", describe_credentials(client.credentials()));
        println!("  Connect Timeout: {:?}", client.connect_timeout());
        println!("  Read Timeout: {:?}", client.read_timeout());
        println!(
            "  Retries: {} (backoff base {} ms)",
            client.retry_max(),
            client.retry_backoff_base_ms()
        );
        if client.trust_all_certificates() {
            println!("  ⚠️  TLS certificate validation disabled");
        }
        match client.default_event_id() {
            Some(event_id) => println!("  Default Event: {event_id}"),
            None => println!("  Default Event: (none)"),
        }
        println!("  Page Size: {}", client.page_size());
        if config.logging.local_enabled {
            println!(
                "  Log Files: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();
        Ok(0)
    }
}

fn describe_credentials(credentials: &Credentials) -> &'static str {
    use secrecy::ExposeSecret;

    match credentials {
        Credentials::Token { .. } => "bearer token",
        Credentials::ApiKey { secret, .. } if secret.expose_secret().is_empty() => {
            "API key (unsigned)"
        }
        Credentials::ApiKey { .. } => "API key (HMAC-SHA256 signed)",
    }
}
