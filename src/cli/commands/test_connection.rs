//! Test-connection command implementation
//!
//! Sends one signed request to the export API's category listing to check
//! reachability and credentials without exporting anything.

use crate::cli::exit_code;
use crate::config::{load_config, ClientConfig};
use crate::core::export::ExportCoordinator;
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the test-connection command
#[derive(Args, Debug)]
pub struct TestConnectionArgs {}

impl TestConnectionArgs {
    /// Execute the test-connection command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let config = match load_config(config_path).and_then(|c| ClientConfig::from_config(&c)) {
            Ok(c) => Arc::new(c),
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(exit_code(&e));
            }
        };

        println!("🔌 Testing connection to {}", config.service_address());

        let coordinator = match ExportCoordinator::new(config, shutdown_signal) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to initialize HTTP client");
                println!("   Error: {e}");
                return Ok(exit_code(&e));
            }
        };

        match coordinator.test_connection().await {
            Ok(()) => {
                println!("✅ Export API reachable, credentials accepted");
                Ok(0)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Connection test failed");
                println!("❌ Connection test failed");
                println!("   Error: {e}");
                Ok(exit_code(&e))
            }
        }
    }
}
