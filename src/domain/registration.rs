//! Registration domain models
//!
//! Normalized registrant records, the pages they arrive in, and the query
//! that selects them.

use super::ids::EventId;
use serde::{Deserialize, Serialize};

/// A single registrant, normalized from whatever shape the export API returned
///
/// Optional fields that were absent upstream stay `None` and are omitted from
/// serialized output rather than defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    /// Registration identifier (unique within an event)
    pub registration_id: String,

    /// Event the registration belongs to
    pub event_id: EventId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    /// Registration state as reported upstream (e.g. "complete", "pending")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_in: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,

    /// Slash-separated category path of the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_path: Option<String>,
}

impl RegistrationRecord {
    /// Create a record with only the required fields set
    pub fn new(registration_id: impl Into<String>, event_id: EventId) -> Self {
        Self {
            registration_id: registration_id.into(),
            event_id,
            email: None,
            first_name: None,
            last_name: None,
            full_name: None,
            state: None,
            checked_in: None,
            paid: None,
            created_at: None,
            modified_at: None,
            category_path: None,
        }
    }

    /// Set the email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Case-insensitive email comparison; records without an email never match
    pub fn email_matches(&self, email: &str) -> bool {
        self.email
            .as_deref()
            .map(|own| own.to_lowercase() == email.to_lowercase())
            .unwrap_or(false)
    }
}

/// One page of registrants plus the token for the next page, if any
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegistrationPage {
    records: Vec<RegistrationRecord>,
    next_page_token: Option<String>,
}

impl RegistrationPage {
    pub fn new(records: Vec<RegistrationRecord>, next_page_token: Option<String>) -> Self {
        Self {
            records,
            next_page_token,
        }
    }

    pub fn records(&self) -> &[RegistrationRecord] {
        &self.records
    }

    /// Consume the page, yielding its records in upstream order
    pub fn into_records(self) -> Vec<RegistrationRecord> {
        self.records
    }

    pub fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }

    /// A page has more iff its token is present and non-empty
    pub fn has_next_page(&self) -> bool {
        self.next_page_token
            .as_deref()
            .map(|token| !token.is_empty())
            .unwrap_or(false)
    }
}

/// Parameters of a single registrant export request
///
/// Immutable: moving to the next page produces a new query via
/// [`ExportQuery::with_page_token`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportQuery {
    event_id: EventId,
    registration_id: Option<String>,
    email: Option<String>,
    limit: Option<u32>,
    page_token: Option<String>,
}

impl ExportQuery {
    /// Query for the first page of an event's registrants
    pub fn new(event_id: EventId) -> Self {
        Self {
            event_id,
            registration_id: None,
            email: None,
            limit: None,
            page_token: None,
        }
    }

    /// Restrict to a single registration id
    pub fn registration_id(mut self, registration_id: Option<String>) -> Self {
        self.registration_id = registration_id;
        self
    }

    /// Restrict to an email address
    pub fn email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    /// Page-size hint sent upstream
    pub fn limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    /// Same query positioned at another page
    pub fn with_page_token(&self, page_token: impl Into<String>) -> Self {
        Self {
            page_token: Some(page_token.into()),
            ..self.clone()
        }
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn registration_id_filter(&self) -> Option<&str> {
        self.registration_id.as_deref()
    }

    pub fn email_filter(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn page_limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn page_token(&self) -> Option<&str> {
        self.page_token.as_deref()
    }
}
