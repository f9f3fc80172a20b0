//! Domain identifier types with validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Event identifier newtype wrapper
///
/// Identifies the event whose registrants are exported. Always positive.
///
/// # Examples
///
/// ```
/// use rollcall::domain::ids::EventId;
/// use std::str::FromStr;
///
/// let event_id = EventId::from_str("42").unwrap();
/// assert_eq!(event_id.value(), 42);
/// assert!(EventId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct EventId(i64);

impl EventId {
    /// Creates a new EventId, rejecting zero and negative values
    pub fn new(id: i64) -> Result<Self, String> {
        if id <= 0 {
            return Err(format!("Event ID must be a positive integer, got {id}"));
        }
        Ok(Self(id))
    }

    /// Returns the raw identifier
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("Event ID must be a number, got '{s}'"))?;
        Self::new(id)
    }
}

impl TryFrom<i64> for EventId {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EventId> for i64 {
    fn from(id: EventId) -> Self {
        id.0
    }
}
