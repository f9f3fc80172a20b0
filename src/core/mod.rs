//! Core business logic for Rollcall.
//!
//! # Modules
//!
//! - [`export`] - Search resolution, pagination and reporting
//!
//! # Search Workflow
//!
//! 1. **Resolve**: Combine the filter, options and configured defaults into a query
//! 2. **Fetch**: Request one page from the export API
//! 3. **Filter**: Drop records that miss the registration id or email
//! 4. **Deliver**: Hand each remaining record to the consumer, in order
//! 5. **Advance**: Follow the continuation token until it runs out, the
//!    consumer stops, or a point lookup finds its match
//!
//! # Example
//!
//! ```rust,no_run
//! use rollcall::config::{load_config, ClientConfig};
//! use rollcall::core::export::{ExportCoordinator, SearchFilter, SearchOptions};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("rollcall.toml")?;
//! let client_config = Arc::new(ClientConfig::from_config(&config)?);
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let coordinator = ExportCoordinator::new(client_config, shutdown_rx)?;
//!
//! let filter = SearchFilter::new().email("alice@example.org");
//! let summary = coordinator
//!     .execute_query(filter, SearchOptions::default(), |record| {
//!         println!("{}", record.registration_id);
//!         true
//!     })
//!     .await?;
//!
//! println!("Delivered: {}", summary.records_delivered);
//! # Ok(())
//! # }
//! ```

pub mod export;
