//! Search inputs accepted by the export coordinator
//!
//! A [`SearchFilter`] says *which* registrants to return; [`SearchOptions`]
//! say *how* to page through them. Both are resolved against the client
//! configuration into a single [`ExportQuery`].

use crate::config::ClientConfig;
use crate::domain::{EventId, ExportQuery, Result, RollcallError};
use std::str::FromStr;

/// Which registrants a search should return
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub event_id: Option<EventId>,
    pub registration_id: Option<String>,
    pub email: Option<String>,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_id(mut self, event_id: EventId) -> Self {
        self.event_id = Some(event_id);
        self
    }

    pub fn registration_id(mut self, registration_id: impl Into<String>) -> Self {
        self.registration_id = Some(registration_id.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Paging controls for a search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Event id supplied as free text, e.g. from a command line or caller option map
    pub event_id: Option<String>,
    /// Page size hint; falls back to the configured page size
    pub page_size: Option<u32>,
    /// Continuation token of a previous search, used as the first page token
    pub paged_results_cookie: Option<String>,
}

/// Build the first-page query for `filter` and `options`
///
/// The event id comes from the filter, then the options, then the configured
/// default.
///
/// # Errors
///
/// Returns [`RollcallError::InvalidInput`] when the options carry an event id
/// that is not a positive integer, or when no event id is available at all.
pub fn resolve_query(
    config: &ClientConfig,
    filter: SearchFilter,
    options: SearchOptions,
) -> Result<ExportQuery> {
    let event_id = match (filter.event_id, options.event_id.as_deref()) {
        (Some(event_id), _) => event_id,
        (None, Some(raw)) => EventId::from_str(raw).map_err(|_| {
            RollcallError::InvalidInput("eventId option must be a positive integer".to_string())
        })?,
        (None, None) => config.default_event_id().ok_or_else(|| {
            RollcallError::InvalidInput("eventId is required for registrant searches".to_string())
        })?,
    };

    let limit = options.page_size.unwrap_or_else(|| config.page_size());

    let query = ExportQuery::new(event_id)
        .registration_id(filter.registration_id)
        .email(filter.email)
        .limit(Some(limit));

    Ok(match options.paged_results_cookie {
        Some(cookie) => query.with_page_token(cookie),
        None => query,
    })
}
