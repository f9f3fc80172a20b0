//! Search summary and reporting

use std::time::Duration;

/// Outcome of one pagination run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSummary {
    /// Pages requested from the export API
    pub pages_fetched: usize,

    /// Records handed to the consumer
    pub records_delivered: usize,

    /// Records dropped by the registration id or email filter
    pub records_filtered: usize,

    /// The consumer asked to stop before pagination finished
    pub stopped_by_consumer: bool,

    /// Wall-clock duration of the search
    pub duration: Duration,
}

impl SearchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Records seen across all fetched pages
    pub fn records_seen(&self) -> usize {
        self.records_delivered + self.records_filtered
    }
}
