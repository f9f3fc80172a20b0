//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Rollcall using clap.

pub mod commands;

use crate::domain::{ExportApiError, RollcallError};
use clap::{Parser, Subcommand};

/// Rollcall - event registration export client
#[derive(Parser, Debug)]
#[command(name = "rollcall")]
#[command(version, about, long_about = None)]
#[command(author = "Rollcall Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "rollcall.toml", env = "ROLLCALL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ROLLCALL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export registrants as JSON lines
    Export(commands::export::ExportArgs),

    /// Check connectivity and credentials against the export API
    TestConnection(commands::test_connection::TestConnectionArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Process exit code for a failed operation
///
/// - 2: configuration or invalid input
/// - 3: not found
/// - 4: connection, transport or authorization failure
/// - 5: anything else
pub fn exit_code(error: &RollcallError) -> i32 {
    match error {
        RollcallError::Configuration(_) | RollcallError::InvalidInput(_) => 2,
        RollcallError::NotFound(_) => 3,
        RollcallError::ExportApi(api) => match api {
            ExportApiError::InvalidInput { .. } => 2,
            ExportApiError::NotFound(_) => 3,
            ExportApiError::InvalidFormat(_) => 5,
            _ => 4,
        },
        RollcallError::Serialization(_) | RollcallError::Io(_) => 5,
    }
}
