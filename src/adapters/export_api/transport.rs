//! Resilient HTTP transport for the export API
//!
//! Every call goes through [`ExportApiTransport::get`], which signs the
//! request, retries transient failures (429, 5xx, network errors) with
//! exponential backoff, and translates everything else into
//! [`ExportApiError`] variants on the first occurrence.

use super::params::QueryParams;
use super::policy::{FailureKind, Outcome, RetryPolicy};
use super::signer::RequestSigner;
use crate::config::ClientConfig;
use crate::domain::{ExportApiError, Result, RollcallError};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::watch;

/// Longest response body excerpt carried in an error message
const BODY_EXCERPT_CHARS: usize = 512;

/// Signed, retrying GET client bound to one export API base address
///
/// # Example
///
/// ```no_run
/// use rollcall::adapters::export_api::{ExportApiTransport, QueryParams};
/// use rollcall::config::ClientConfig;
///
/// # async fn example() -> rollcall::domain::Result<()> {
/// let config = ClientConfig::builder("https://events.example.org")
///     .token("token")
///     .build()?;
/// let transport = ExportApiTransport::new(&config)?;
///
/// let params: QueryParams = [("limit", "1")].into_iter().collect();
/// let body = transport.get("/export/categories.json", &params).await?;
/// # Ok(())
/// # }
/// ```
pub struct ExportApiTransport {
    base_url: String,
    client: Client,
    signer: RequestSigner,
    policy: RetryPolicy,
    read_timeout: Duration,
    shutdown: Option<watch::Receiver<bool>>,
}

impl ExportApiTransport {
    /// Build a transport from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`RollcallError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let address = config.service_address();
        let base_url = address.strip_suffix('/').unwrap_or(address).to_string();

        let mut client_builder = Client::builder().connect_timeout(config.connect_timeout());
        if config.trust_all_certificates() {
            tracing::warn!(
                base_url = %base_url,
                "Accepting invalid TLS certificates for the export API"
            );
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }
        let client = client_builder.build().map_err(|e| {
            RollcallError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url,
            client,
            signer: RequestSigner::from_config(config),
            policy: RetryPolicy::from_config(config),
            read_timeout: config.read_timeout(),
            shutdown: None,
        })
    }

    /// Abort backoff sleeps as soon as `shutdown` flips to `true`
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Base address with any single trailing slash removed
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for `path` and already-enriched `params`
    pub fn build_url(&self, path: &str, params: &QueryParams) -> String {
        let query = params.encoded();
        if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        }
    }

    /// Issue a signed GET and return the raw body of the first 2xx response
    ///
    /// # Errors
    ///
    /// - [`ExportApiError::InvalidInput`] for 400/422
    /// - [`ExportApiError::Unauthorized`] for 401/403
    /// - [`ExportApiError::NotFound`] for 404
    /// - [`ExportApiError::RateLimited`] when 429 persists past the retry budget
    /// - [`ExportApiError::ServerError`] when 5xx persists past the retry budget
    /// - [`ExportApiError::ConnectionFailed`] when network failures exhaust the budget
    /// - [`ExportApiError::Interrupted`] when shutdown is requested during backoff
    /// - [`ExportApiError::UnexpectedStatus`] for any other status
    pub async fn get(&self, path: &str, params: &QueryParams) -> Result<String> {
        let path = normalize_path(path);
        let enriched = self.signer.enrich_query(&path, params)?;
        let headers = self.signer.default_headers()?;
        let url = self.build_url(&path, &enriched);
        let max_attempts = self.policy.max_attempts();

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            tracing::debug!(path = %path, attempt = attempt, "GET export API");

            let response = self
                .client
                .get(&url)
                .headers(headers.clone())
                .timeout(self.read_timeout)
                .send()
                .await;

            let resp = match response {
                Ok(resp) => resp,
                Err(e) => {
                    self.handle_network_failure(&path, attempt, e).await?;
                    continue;
                }
            };

            let status = resp.status().as_u16();
            match self.policy.classify(status, attempt) {
                Outcome::Success => match resp.text().await {
                    Ok(body) => return Ok(body),
                    Err(e) => self.handle_network_failure(&path, attempt, e).await?,
                },
                Outcome::Retry => {
                    let delay_ms = self.delay_ms(attempt);
                    crate::log_retry_attempt!(
                        attempt,
                        max_attempts,
                        delay_ms,
                        format!("HTTP {status} from {path}")
                    );
                    self.wait_before_retry(attempt).await?;
                }
                Outcome::Fail(kind) => {
                    // The status is final; an unreadable body only loses the excerpt
                    let body = resp.text().await.unwrap_or_else(|e| {
                        tracing::debug!(path = %path, status = status, error = %describe(e), "Failed to read error body");
                        String::new()
                    });
                    let message = format!("HTTP {status} calling {path}: {}", excerpt(&body));
                    tracing::debug!(path = %path, status = status, attempt = attempt, "Export API request failed");
                    return Err(failure(kind, status, message).into());
                }
            }
        }
    }

    async fn handle_network_failure(
        &self,
        path: &str,
        attempt: u32,
        error: reqwest::Error,
    ) -> Result<()> {
        let cause = describe(error);
        if !self.policy.retry_network_failure(attempt) {
            return Err(ExportApiError::ConnectionFailed(format!(
                "I/O error calling {path} after {attempt} attempt(s): {cause}"
            ))
            .into());
        }

        crate::log_retry_attempt!(
            attempt,
            self.policy.max_attempts(),
            self.delay_ms(attempt),
            cause.as_str()
        );
        self.wait_before_retry(attempt).await
    }

    fn delay_ms(&self, attempt: u32) -> u128 {
        self.policy
            .backoff(attempt)
            .map(|d| d.as_millis())
            .unwrap_or(0)
    }

    /// Sleep out the backoff for `attempt`, unless shutdown intervenes
    async fn wait_before_retry(&self, attempt: u32) -> Result<()> {
        let mut shutdown = self.shutdown.clone();
        if let Some(rx) = &shutdown {
            if *rx.borrow() {
                return Err(interrupted());
            }
        }

        let Some(delay) = self.policy.backoff(attempt) else {
            return Ok(());
        };

        match shutdown.as_mut() {
            None => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            Some(rx) => {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => Ok(()),
                    _ = shutdown_requested(rx) => Err(interrupted()),
                }
            }
        }
    }
}

/// Resolves once the flag is set; never resolves if the sender is gone
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

fn interrupted() -> RollcallError {
    ExportApiError::Interrupted("shutdown requested during retry backoff".to_string()).into()
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn failure(kind: FailureKind, status: u16, message: String) -> ExportApiError {
    match kind {
        FailureKind::InvalidInput => ExportApiError::InvalidInput { status, message },
        FailureKind::Unauthorized => ExportApiError::Unauthorized { status, message },
        FailureKind::NotFound => ExportApiError::NotFound(message),
        FailureKind::RateLimited => ExportApiError::RateLimited { message },
        FailureKind::ServerError => ExportApiError::ServerError { status, message },
        FailureKind::Unexpected => ExportApiError::UnexpectedStatus { status, message },
    }
}

fn excerpt(body: &str) -> String {
    if body.chars().count() <= BODY_EXCERPT_CHARS {
        body.to_string()
    } else {
        let head: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
        format!("{head}...")
    }
}

/// Error text with its cause chain, minus the request URL (it carries the signature)
fn describe(error: reqwest::Error) -> String {
    let error = error.without_url();
    let mut text = error.to_string();
    let mut source = std::error::Error::source(&error);
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
