// Rollcall - Event Registration Export Client
// Copyright (c) 2025 Rollcall Contributors
// Licensed under the MIT License

//! # Rollcall - Event Registration Export Client
//!
//! Rollcall pulls registrant records out of an event-management server's HTTP
//! export API and streams them to a consumer, one page at a time.
//!
//! ## Overview
//!
//! This library provides:
//! - **Authenticating** requests with a bearer token or an HMAC-SHA256 signed API key
//! - **Retrying** rate-limited, failing and unreachable requests with exponential backoff
//! - **Mapping** loosely-shaped JSON responses into normalized registration records
//! - **Paginating** through results with local filtering and early termination
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Search resolution and pagination
//! - [`adapters`] - The export API client (signing, transport, mapping)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rollcall::config::ClientConfig;
//! use rollcall::core::export::ExportCoordinator;
//! use rollcall::domain::{EventId, ExportQuery};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder("https://events.example.org")
//!         .api_key("my-key", "my-secret")
//!         .retry_max(2)
//!         .build()?;
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     let coordinator = ExportCoordinator::new(Arc::new(config), shutdown_rx)?;
//!
//!     let query = ExportQuery::new(EventId::new(42)?).limit(Some(100));
//!     let summary = coordinator
//!         .search(query, |record| {
//!             println!("{} {:?}", record.registration_id, record.email);
//!             true
//!         })
//!         .await?;
//!
//!     println!("Exported {} registrants", summary.records_delivered);
//!     Ok(())
//! }
//! ```
//!
//! ## Point Lookups
//!
//! A query with a registration id stops paging as soon as the page containing
//! the match has been delivered, and fails with
//! [`RollcallError::NotFound`](domain::RollcallError::NotFound) when no page
//! contains it.
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`], built on [`domain::RollcallError`]:
//!
//! ```rust,no_run
//! use rollcall::domain::RollcallError;
//!
//! fn example() -> Result<(), RollcallError> {
//!     let config = rollcall::config::load_config("rollcall.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! Only an exhausted HTTP 429 is reported as retryable
//! ([`RollcallError::is_retryable`](domain::RollcallError::is_retryable)).
//!
//! ## Logging
//!
//! Rollcall logs through `tracing`. Tokens, secrets and signed query strings
//! are never logged.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
