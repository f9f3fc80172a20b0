//! Registrant export service
//!
//! [`RegistrationSource`] is the seam between pagination logic and the HTTP
//! stack. [`RegistrationService`] is the production implementation: it turns
//! an [`ExportQuery`] into a signed GET and maps the response.

use super::mapper::RegistrationMapper;
use super::params::QueryParams;
use super::transport::ExportApiTransport;
use crate::config::ClientConfig;
use crate::domain::{ExportQuery, RegistrationPage, Result};
use async_trait::async_trait;
use tokio::sync::watch;

/// Path of the lightweight endpoint used to check connectivity and credentials
pub const PROBE_PATH: &str = "/export/categories.json";

/// Source of registrant pages
///
/// Implementations fetch exactly one page per call; pagination is driven by
/// the caller through [`ExportQuery::with_page_token`].
#[async_trait]
pub trait RegistrationSource: Send + Sync {
    /// Fetch the page selected by `query`
    async fn fetch_registrations(&self, query: &ExportQuery) -> Result<RegistrationPage>;

    /// Issue a minimal authenticated request, failing if the API is unreachable
    /// or rejects the credentials
    async fn probe(&self) -> Result<()>;
}

/// Export API backed [`RegistrationSource`]
pub struct RegistrationService {
    transport: ExportApiTransport,
    mapper: RegistrationMapper,
}

impl RegistrationService {
    pub fn new(transport: ExportApiTransport, mapper: RegistrationMapper) -> Self {
        Self { transport, mapper }
    }

    /// Build the transport from `config`, wiring in the optional shutdown signal
    pub fn from_config(
        config: &ClientConfig,
        shutdown: Option<watch::Receiver<bool>>,
    ) -> Result<Self> {
        let mut transport = ExportApiTransport::new(config)?;
        if let Some(shutdown) = shutdown {
            transport = transport.with_shutdown(shutdown);
        }
        Ok(Self::new(transport, RegistrationMapper::new()))
    }

    pub fn transport(&self) -> &ExportApiTransport {
        &self.transport
    }
}

/// `/export/registrants/{event}.json`
pub fn registrants_path(query: &ExportQuery) -> String {
    format!("/export/registrants/{}.json", query.event_id())
}

/// Query parameters for one page fetch, in the order they are sent
pub fn registrants_params(query: &ExportQuery) -> QueryParams {
    let mut params = QueryParams::new();
    if let Some(limit) = query.page_limit() {
        params.insert("limit", limit.to_string());
    }
    if let Some(token) = query.page_token().filter(|t| !t.is_empty()) {
        params.insert("page", token);
    }
    if let Some(registration_id) = query.registration_id_filter() {
        params.insert("registration_id", registration_id);
    }
    if let Some(email) = query.email_filter() {
        params.insert("email", email);
    }
    params
}

#[async_trait]
impl RegistrationSource for RegistrationService {
    async fn fetch_registrations(&self, query: &ExportQuery) -> Result<RegistrationPage> {
        let path = registrants_path(query);
        let body = self.transport.get(&path, &registrants_params(query)).await?;
        self.mapper.map_page(&body, query.event_id())
    }

    async fn probe(&self) -> Result<()> {
        let params: QueryParams = [("limit", "1")].into_iter().collect();
        self.transport.get(PROBE_PATH, &params).await?;
        tracing::debug!(base_url = %self.transport.base_url(), "Export API probe succeeded");
        Ok(())
    }
}
