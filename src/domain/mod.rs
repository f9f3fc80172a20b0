//! Domain models and types for Rollcall.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`EventId`])
//! - **Domain models** ([`RegistrationRecord`], [`RegistrationPage`], [`ExportQuery`])
//! - **Error types** ([`RollcallError`], [`ExportApiError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, RollcallError>`]:
//!
//! ```rust
//! use rollcall::domain::{RollcallError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = rollcall::config::load_config("rollcall.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod registration;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{ExportApiError, RollcallError};
pub use ids::EventId;
pub use registration::{ExportQuery, RegistrationPage, RegistrationRecord};
pub use result::Result;
