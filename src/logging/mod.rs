//! Logging and observability
//!
//! Structured logging via `tracing`:
//! - Human-readable console output on stderr
//! - Optional JSON log files with daily or hourly rotation
//! - `RUST_LOG` takes precedence over the configured level
//!
//! Credentials and signed query strings are never passed to these macros.
//!
//! # Example
//!
//! ```no_run
//! use rollcall::logging::init_logging;
//! use rollcall::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log a fetched page of registrants
///
/// # Example
///
/// ```no_run
/// use rollcall::log_page_fetched;
///
/// log_page_fetched!(42, 1, 200, true);
/// ```
#[macro_export]
macro_rules! log_page_fetched {
    ($event_id:expr, $page:expr, $records:expr, $has_next:expr) => {
        tracing::debug!(
            event_id = %$event_id,
            page = $page,
            records = $records,
            has_next = $has_next,
            "Fetched registrant page"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use rollcall::log_retry_attempt;
///
/// log_retry_attempt!(1, 4, 1000, "HTTP 503 from /export/categories.json");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $delay_ms:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay_ms as u64,
            reason = %$reason,
            "Retrying export API request"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use rollcall::log_error_with_context;
/// use rollcall::domain::RollcallError;
///
/// let error = RollcallError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            http_status = ?$error.http_status(),
            context = $context,
            "Error occurred"
        );
    };
}
