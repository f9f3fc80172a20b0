//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "rollcall.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Rollcall configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your export API address", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - ROLLCALL_API_KEY and ROLLCALL_API_SECRET, or");
                println!("     - ROLLCALL_API_TOKEN with auth_strategy = \"token\"");
                println!("  3. Validate configuration: rollcall validate-config");
                println!("  4. Check connectivity: rollcall test-connection");
                println!("  5. Run export: rollcall export --event-id <ID>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }
}

/// Sample configuration with every setting and its default
pub fn sample_config() -> &'static str {
    r#"# Rollcall Configuration File
# Event registration export client

# Runtime environment (development, staging, production)
environment = "development"

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

[service]
# Base address of the event registration server
address = "https://events.example.org"

# Authentication: "api_key" (signed query) or "token" (bearer header)
auth_strategy = "api_key"
api_key = "${ROLLCALL_API_KEY}"
# Leave the secret empty to send unsigned requests
api_secret = "${ROLLCALL_API_SECRET}"
# api_token = "${ROLLCALL_API_TOKEN}"

connect_timeout_ms = 10000
read_timeout_ms = 30000

# Never enable outside development; rejected in production
trust_all_certificates = false

# Retries for HTTP 429, 5xx and network failures, with exponential backoff
retry_max = 3
retry_backoff_base_ms = 1000

[export]
# Used when no event id is given on the command line
# default_event_id = 42
page_size = 200

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"  # daily | hourly | never
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RollcallConfig;
    use tempfile::TempDir;

    #[test]
    fn test_sample_config_parses() {
        let contents = sample_config()
            .replace("${ROLLCALL_API_KEY}", "key")
            .replace("${ROLLCALL_API_SECRET}", "secret");
        let config: RollcallConfig = toml::from_str(&contents).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.service.address, "https://events.example.org");
        assert_eq!(config.export.page_size, 200);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rollcall.toml");
        fs::write(&path, "existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "existing");

        let forced = InitArgs {
            output: path.to_string_lossy().to_string(),
            force: true,
        };
        assert_eq!(forced.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&path).unwrap().contains("[service]"));
    }
}
