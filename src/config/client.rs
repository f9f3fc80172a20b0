//! Validated client configuration
//!
//! [`ClientConfig`] is the immutable, validated form of the connection
//! settings. It can only be obtained through [`ClientConfigBuilder::build`]
//! (or [`ClientConfig::from_config`]), which rejects unusable credential
//! combinations and numeric bounds up front. Nothing can be changed once it
//! exists, so a single instance is shared read-only by every search.

use super::schema::{AuthStrategy, RollcallConfig};
use super::secret::{secret_string, SecretString};
use crate::domain::{EventId, Result, RollcallError};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Credentials for the selected authentication strategy
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Bearer token sent in the `Authorization` header
    Token { token: SecretString },

    /// API key sent as a query parameter, HMAC-signed when `secret` is non-empty
    ApiKey { key: String, secret: SecretString },
}

impl Credentials {
    pub fn strategy(&self) -> AuthStrategy {
        match self {
            Credentials::Token { .. } => AuthStrategy::Token,
            Credentials::ApiKey { .. } => AuthStrategy::ApiKey,
        }
    }
}

/// Immutable, validated connection settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    service_address: String,
    credentials: Credentials,
    connect_timeout: Duration,
    read_timeout: Duration,
    trust_all_certificates: bool,
    retry_max: u32,
    retry_backoff_base_ms: u64,
    default_event_id: Option<EventId>,
    page_size: u32,
}

impl ClientConfig {
    /// Start building a configuration for the given service address
    pub fn builder(service_address: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(service_address)
    }

    /// Build the validated client configuration from a loaded configuration file
    ///
    /// # Errors
    ///
    /// Returns [`RollcallError::Configuration`] when credentials are missing for
    /// the selected strategy or a numeric bound is violated.
    pub fn from_config(config: &RollcallConfig) -> Result<Self> {
        let service = &config.service;
        let mut builder = ClientConfigBuilder::new(service.address.clone())
            .auth_strategy(service.auth_strategy)
            .connect_timeout_ms(service.connect_timeout_ms)
            .read_timeout_ms(service.read_timeout_ms)
            .trust_all_certificates(service.trust_all_certificates)
            .retry_max(service.retry_max)
            .retry_backoff_base_ms(service.retry_backoff_base_ms)
            .page_size(config.export.page_size);

        builder.api_token = service.api_token.clone();
        builder.api_key = service.api_key.clone();
        builder.api_secret = service.api_secret.clone();
        if let Some(event_id) = config.export.default_event_id {
            builder = builder.default_event_id(event_id);
        }

        builder.build()
    }

    pub fn service_address(&self) -> &str {
        &self.service_address
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    pub fn trust_all_certificates(&self) -> bool {
        self.trust_all_certificates
    }

    /// Retries allowed after the first attempt
    pub fn retry_max(&self) -> u32 {
        self.retry_max
    }

    pub fn retry_backoff_base_ms(&self) -> u64 {
        self.retry_backoff_base_ms
    }

    pub fn default_event_id(&self) -> Option<EventId> {
        self.default_event_id
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

/// Builder for [`ClientConfig`]
///
/// # Example
///
/// ```rust
/// use rollcall::config::ClientConfig;
///
/// # fn example() -> rollcall::domain::Result<()> {
/// let config = ClientConfig::builder("https://events.example.org")
///     .api_key("my-key", "my-secret")
///     .retry_max(2)
///     .build()?;
/// assert_eq!(config.retry_max(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    service_address: String,
    auth_strategy: AuthStrategy,
    api_token: Option<SecretString>,
    api_key: Option<String>,
    api_secret: Option<SecretString>,
    connect_timeout_ms: i64,
    read_timeout_ms: i64,
    trust_all_certificates: bool,
    retry_max: i64,
    retry_backoff_base_ms: i64,
    default_event_id: Option<i64>,
    page_size: i64,
}

impl ClientConfigBuilder {
    fn new(service_address: impl Into<String>) -> Self {
        Self {
            service_address: service_address.into(),
            auth_strategy: AuthStrategy::Token,
            api_token: None,
            api_key: None,
            api_secret: None,
            connect_timeout_ms: 10_000,
            read_timeout_ms: 30_000,
            trust_all_certificates: false,
            retry_max: 3,
            retry_backoff_base_ms: 1_000,
            default_event_id: None,
            page_size: 200,
        }
    }

    pub fn auth_strategy(mut self, strategy: AuthStrategy) -> Self {
        self.auth_strategy = strategy;
        self
    }

    /// Use bearer-token authentication
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.auth_strategy = AuthStrategy::Token;
        self.api_token = Some(secret_string(token.into()));
        self
    }

    /// Use API-key authentication; an empty secret sends unsigned requests
    pub fn api_key(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.auth_strategy = AuthStrategy::ApiKey;
        self.api_key = Some(key.into());
        self.api_secret = Some(secret_string(secret.into()));
        self
    }

    pub fn connect_timeout_ms(mut self, ms: i64) -> Self {
        self.connect_timeout_ms = ms;
        self
    }

    pub fn read_timeout_ms(mut self, ms: i64) -> Self {
        self.read_timeout_ms = ms;
        self
    }

    pub fn trust_all_certificates(mut self, trust_all: bool) -> Self {
        self.trust_all_certificates = trust_all;
        self
    }

    pub fn retry_max(mut self, retry_max: i64) -> Self {
        self.retry_max = retry_max;
        self
    }

    pub fn retry_backoff_base_ms(mut self, base_ms: i64) -> Self {
        self.retry_backoff_base_ms = base_ms;
        self
    }

    pub fn default_event_id(mut self, event_id: i64) -> Self {
        self.default_event_id = Some(event_id);
        self
    }

    pub fn page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Validate and freeze the configuration
    ///
    /// # Errors
    ///
    /// Returns [`RollcallError::Configuration`] describing the first invalid setting.
    pub fn build(self) -> Result<ClientConfig> {
        let service_address = self.service_address.trim().to_string();
        if service_address.is_empty() {
            return Err(config_error("service.address cannot be empty"));
        }
        let parsed = url::Url::parse(&service_address)
            .map_err(|e| config_error(format!("service.address is not a valid URL: {e}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(config_error(
                "service.address must start with http:// or https://",
            ));
        }

        let credentials = match self.auth_strategy {
            AuthStrategy::Token => {
                let token = self.api_token.ok_or_else(|| {
                    config_error("service.api_token is required when auth_strategy is 'token'")
                })?;
                Credentials::Token { token }
            }
            AuthStrategy::ApiKey => {
                let key = self
                    .api_key
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| {
                        config_error("service.api_key is required when auth_strategy is 'api_key'")
                    })?;
                let secret = self.api_secret.ok_or_else(|| {
                    config_error("service.api_secret is required when auth_strategy is 'api_key'")
                })?;
                if secret.expose_secret().is_empty() {
                    tracing::warn!("service.api_secret is empty, requests will be sent unsigned");
                }
                Credentials::ApiKey { key, secret }
            }
        };

        if self.connect_timeout_ms <= 0 {
            return Err(config_error(format!(
                "service.connect_timeout_ms must be positive, got {}",
                self.connect_timeout_ms
            )));
        }
        if self.read_timeout_ms <= 0 {
            return Err(config_error(format!(
                "service.read_timeout_ms must be positive, got {}",
                self.read_timeout_ms
            )));
        }
        let retry_max = u32::try_from(self.retry_max).map_err(|_| {
            config_error(format!(
                "service.retry_max must be zero or positive, got {}",
                self.retry_max
            ))
        })?;
        let retry_backoff_base_ms = u64::try_from(self.retry_backoff_base_ms).map_err(|_| {
            config_error(format!(
                "service.retry_backoff_base_ms must be zero or positive, got {}",
                self.retry_backoff_base_ms
            ))
        })?;
        let page_size = u32::try_from(self.page_size)
            .ok()
            .filter(|size| *size > 0)
            .ok_or_else(|| {
                config_error(format!(
                    "export.page_size must be a positive integer, got {}",
                    self.page_size
                ))
            })?;
        let default_event_id = self
            .default_event_id
            .map(EventId::new)
            .transpose()
            .map_err(config_error)?;

        if self.trust_all_certificates {
            tracing::warn!(
                "TLS certificate validation is disabled for the export API, \
                 use only against trusted development servers"
            );
        }

        Ok(ClientConfig {
            service_address,
            credentials,
            connect_timeout: Duration::from_millis(self.connect_timeout_ms as u64),
            read_timeout: Duration::from_millis(self.read_timeout_ms as u64),
            trust_all_certificates: self.trust_all_certificates,
            retry_max,
            retry_backoff_base_ms,
            default_event_id,
            page_size,
        })
    }
}

fn config_error(message: impl Into<String>) -> RollcallError {
    RollcallError::Configuration(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "https://events.example.org";

    #[test]
    fn test_token_strategy_requires_token() {
        let err = ClientConfig::builder(ADDRESS).build().unwrap_err();
        assert!(matches!(err, RollcallError::Configuration(ref m) if m.contains("api_token")));

        let config = ClientConfig::builder(ADDRESS).token("token").build().unwrap();
        assert_eq!(config.credentials().strategy(), AuthStrategy::Token);
    }

    #[test]
    fn test_api_key_strategy_requires_key_and_secret() {
        let mut builder = ClientConfig::builder(ADDRESS).auth_strategy(AuthStrategy::ApiKey);
        builder.api_key = Some("key".to_string());
        let err = builder.clone().build().unwrap_err();
        assert!(err.to_string().contains("api_secret"));

        builder.api_secret = Some(secret_string("secret".to_string()));
        assert!(builder.build().is_ok());

        let blank_key = ClientConfig::builder(ADDRESS).api_key("  ", "secret").build();
        assert!(blank_key.unwrap_err().to_string().contains("api_key"));
    }

    #[test]
    fn test_empty_secret_allowed_for_unsigned_requests() {
        let config = ClientConfig::builder(ADDRESS)
            .api_key("key", "")
            .build()
            .unwrap();
        match config.credentials() {
            Credentials::ApiKey { key, secret } => {
                assert_eq!(key, "key");
                assert!(secret.expose_secret().is_empty());
            }
            other => panic!("unexpected credentials: {other:?}"),
        }
    }

    #[test]
    fn test_negative_bounds_rejected() {
        let base = ClientConfig::builder(ADDRESS).token("t");
        assert!(base.clone().retry_max(-1).build().is_err());
        assert!(base.clone().retry_backoff_base_ms(-1).build().is_err());
        assert!(base.clone().page_size(0).build().is_err());
        assert!(base.clone().page_size(-5).build().is_err());
        assert!(base.clone().connect_timeout_ms(0).build().is_err());
        assert!(base.clone().read_timeout_ms(-1).build().is_err());
        assert!(base.clone().default_event_id(0).build().is_err());
        assert!(base.retry_max(0).retry_backoff_base_ms(0).build().is_ok());
    }

    #[test]
    fn test_service_address_validated() {
        assert!(ClientConfig::builder("").token("t").build().is_err());
        assert!(ClientConfig::builder("ftp://host").token("t").build().is_err());
        assert!(ClientConfig::builder("not a url").token("t").build().is_err());
    }

    #[test]
    fn test_values_preserved() {
        let config = ClientConfig::builder(ADDRESS)
            .token("t")
            .connect_timeout_ms(1_500)
            .read_timeout_ms(2_500)
            .retry_max(4)
            .retry_backoff_base_ms(10)
            .page_size(50)
            .default_event_id(7)
            .build()
            .unwrap();

        assert_eq!(config.service_address(), ADDRESS);
        assert_eq!(config.connect_timeout(), Duration::from_millis(1_500));
        assert_eq!(config.read_timeout(), Duration::from_millis(2_500));
        assert_eq!(config.retry_max(), 4);
        assert_eq!(config.retry_backoff_base_ms(), 10);
        assert_eq!(config.page_size(), 50);
        assert_eq!(config.default_event_id().map(|id| id.value()), Some(7));
        assert!(!config.trust_all_certificates());
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let config = ClientConfig::builder(ADDRESS)
            .api_key("key", "very-secret-value")
            .build()
            .unwrap();
        assert!(!format!("{config:?}").contains("very-secret-value"));
    }

    #[test]
    fn test_from_config() {
        let file: RollcallConfig = toml::from_str(
            r#"
[service]
address = "https://events.example.org/"
auth_strategy = "api_key"
api_key = "key"
api_secret = "secret"
retry_max = 1

[export]
default_event_id = 42
page_size = 25
"#,
        )
        .unwrap();

        let config = ClientConfig::from_config(&file).unwrap();
        assert_eq!(config.credentials().strategy(), AuthStrategy::ApiKey);
        assert_eq!(config.retry_max(), 1);
        assert_eq!(config.page_size(), 25);
        assert_eq!(config.default_event_id().unwrap().value(), 42);
    }
}
