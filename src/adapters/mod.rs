//! External system integrations for Rollcall.
//!
//! - [`export_api`] - the event registration export API
//!
//! # Design Pattern
//!
//! Adapters isolate the HTTP stack behind the
//! [`RegistrationSource`](export_api::RegistrationSource) trait so the
//! pagination logic in [`core`](crate::core) can be tested with in-memory
//! sources.
//!
//! ```rust,no_run
//! use rollcall::adapters::export_api::{RegistrationService, RegistrationSource};
//! use rollcall::config::ClientConfig;
//! use rollcall::domain::{EventId, ExportQuery};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::builder("https://events.example.org")
//!     .api_key("key", "secret")
//!     .build()?;
//! let service = RegistrationService::from_config(&config, None)?;
//!
//! let query = ExportQuery::new(EventId::new(42)?).limit(Some(100));
//! let page = service.fetch_registrations(&query).await?;
//! println!("{} registrants", page.records().len());
//! # Ok(())
//! # }
//! ```

pub mod export_api;
