//! Export orchestration
//!
//! This module provides the core search logic for Rollcall, including:
//! - Resolution of search filters and options into a query
//! - Pagination and local filtering
//! - Summary reporting

pub mod coordinator;
pub mod search;
pub mod summary;

pub use coordinator::ExportCoordinator;
pub use search::{resolve_query, SearchFilter, SearchOptions};
pub use summary::SearchSummary;
