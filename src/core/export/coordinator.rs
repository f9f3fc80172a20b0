//! Export coordinator - drives pagination over the export API
//!
//! The coordinator owns the paging loop: it fetches one page at a time from a
//! [`RegistrationSource`], applies the registration id and email filters
//! locally, and streams matching records to a caller-supplied consumer in
//! upstream order. Nothing is buffered beyond the current page.

use crate::adapters::export_api::{RegistrationService, RegistrationSource};
use crate::config::ClientConfig;
use crate::core::export::search::{resolve_query, SearchFilter, SearchOptions};
use crate::core::export::summary::SearchSummary;
use crate::domain::{ExportApiError, ExportQuery, RegistrationRecord, Result, RollcallError};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Export coordinator
pub struct ExportCoordinator {
    config: Arc<ClientConfig>,
    source: Arc<dyn RegistrationSource>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl ExportCoordinator {
    /// Create a coordinator backed by the export API
    ///
    /// `shutdown` aborts retry backoff and stops pagination between pages.
    pub fn new(config: Arc<ClientConfig>, shutdown: watch::Receiver<bool>) -> Result<Self> {
        let service = RegistrationService::from_config(&config, Some(shutdown.clone()))?;
        tracing::debug!(
            base_url = %service.transport().base_url(),
            auth_strategy = ?config.credentials().strategy(),
            "Export coordinator ready"
        );
        Ok(Self {
            config,
            source: Arc::new(service),
            shutdown: Some(shutdown),
        })
    }

    /// Create a coordinator over an arbitrary source
    pub fn with_source(config: Arc<ClientConfig>, source: Arc<dyn RegistrationSource>) -> Self {
        Self {
            config,
            source,
            shutdown: None,
        }
    }

    /// Check that the export API is reachable and accepts the credentials
    pub async fn test_connection(&self) -> Result<()> {
        tracing::info!("Testing export API connection");
        self.source.probe().await
    }

    /// Resolve `filter` and `options` into a query and run [`search`](Self::search)
    ///
    /// # Errors
    ///
    /// Returns [`RollcallError::InvalidInput`] when no usable event id can be
    /// resolved, plus every error [`search`](Self::search) can return.
    pub async fn execute_query<F>(
        &self,
        filter: SearchFilter,
        options: SearchOptions,
        consumer: F,
    ) -> Result<SearchSummary>
    where
        F: FnMut(RegistrationRecord) -> bool + Send,
    {
        let query = resolve_query(&self.config, filter, options)?;
        self.search(query, consumer).await
    }

    /// Page through every registrant matching `query`
    ///
    /// Records are delivered in upstream order. The consumer returns `false`
    /// to stop; no further pages are fetched after that. A point lookup (a
    /// query with a registration id) stops after the first page that yields a
    /// match.
    ///
    /// # Errors
    ///
    /// - [`RollcallError::NotFound`] when a point lookup exhausts all pages
    ///   without a match
    /// - [`ExportApiError::Interrupted`] when shutdown is requested between pages
    /// - any transport or mapping error, unchanged
    pub async fn search<F>(&self, query: ExportQuery, mut consumer: F) -> Result<SearchSummary>
    where
        F: FnMut(RegistrationRecord) -> bool + Send,
    {
        let start_time = Instant::now();
        let mut summary = SearchSummary::new();

        let registration_id = query.registration_id_filter().map(str::to_owned);
        let email = query.email_filter().map(str::to_owned);
        let mut found = false;
        let mut current = query;

        tracing::info!(
            event_id = %current.event_id(),
            point_lookup = registration_id.is_some(),
            email_filter = email.is_some(),
            "Starting registrant search"
        );

        loop {
            self.check_shutdown()?;

            let page = self.source.fetch_registrations(&current).await?;
            summary.pages_fetched += 1;

            let next_token = page
                .has_next_page()
                .then(|| page.next_page_token().map(str::to_owned))
                .flatten();

            crate::log_page_fetched!(
                current.event_id(),
                summary.pages_fetched,
                page.records().len(),
                next_token.is_some()
            );

            for record in page.into_records() {
                if let Some(id) = &registration_id {
                    if record.registration_id != *id {
                        summary.records_filtered += 1;
                        continue;
                    }
                }
                if let Some(email) = &email {
                    if !record.email_matches(email) {
                        summary.records_filtered += 1;
                        continue;
                    }
                }

                summary.records_delivered += 1;
                if !consumer(record) {
                    summary.stopped_by_consumer = true;
                    tracing::info!(
                        pages = summary.pages_fetched,
                        delivered = summary.records_delivered,
                        "Consumer stopped the search"
                    );
                    return Ok(summary.with_duration(start_time.elapsed()));
                }
                found = true;
            }

            if registration_id.is_some() && found {
                break;
            }

            match next_token {
                Some(token) => current = current.with_page_token(token),
                None => break,
            }
        }

        if let Some(id) = registration_id {
            if !found {
                return Err(RollcallError::NotFound(id));
            }
        }

        let summary = summary.with_duration(start_time.elapsed());
        tracing::info!(
            pages = summary.pages_fetched,
            delivered = summary.records_delivered,
            filtered = summary.records_filtered,
            duration_ms = summary.duration.as_millis() as u64,
            "Registrant search completed"
        );
        Ok(summary)
    }

    fn check_shutdown(&self) -> Result<()> {
        match &self.shutdown {
            Some(rx) if *rx.borrow() => Err(ExportApiError::Interrupted(
                "shutdown requested between pages".to_string(),
            )
            .into()),
            _ => Ok(()),
        }
    }
}
