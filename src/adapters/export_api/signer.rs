//! Request authentication for the export API
//!
//! The signer turns the configured [`Credentials`] into per-request material:
//!
//! - **Token**: an `Authorization: Bearer <token>` header.
//! - **API key**: an `apikey` query parameter. When a secret is configured the
//!   request also carries a `timestamp` and a `signature`, the base64
//!   HMAC-SHA256 of `path + "?" + canonical_query` keyed by the secret.
//!
//! Secrets are exposed only while a header value or signature is computed.

use super::params::QueryParams;
use crate::config::{ClientConfig, Credentials};
use crate::domain::{Result, RollcallError};
use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use secrecy::ExposeSecret;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Value of the `User-Agent` header sent with every request
pub const USER_AGENT_VALUE: &str = concat!("rollcall/", env!("CARGO_PKG_VERSION"));

/// Computes authentication headers and query parameters for a request
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Credentials,
}

impl RequestSigner {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.credentials().clone())
    }

    /// Return `params` enriched with the API key and, when a secret is set,
    /// `timestamp` and `signature`
    ///
    /// An existing `timestamp` parameter is kept, which makes the signature
    /// reproducible for a fixed input.
    ///
    /// # Errors
    ///
    /// Returns [`RollcallError::Configuration`] if the MAC cannot be initialised.
    pub fn enrich_query(&self, path: &str, params: &QueryParams) -> Result<QueryParams> {
        let mut enriched = params.clone();

        if let Credentials::ApiKey { key, secret } = &self.credentials {
            enriched.insert("apikey", key.as_str());

            let secret = secret.expose_secret();
            if !secret.is_empty() {
                enriched.insert_if_absent("timestamp", chrono::Utc::now().timestamp().to_string());
                let signature = sign(path, &enriched, secret.as_str().as_bytes())?;
                enriched.insert("signature", signature);
            }
        }

        Ok(enriched)
    }

    /// Headers sent with every request
    ///
    /// # Errors
    ///
    /// Returns [`RollcallError::Configuration`] if the token contains characters
    /// that cannot appear in a header.
    pub fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        if let Credentials::Token { token } = &self.credentials {
            let token = token.expose_secret();
            if !token.is_empty() {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                    .map_err(|_| {
                        RollcallError::Configuration(
                            "service.api_token contains characters not allowed in a header"
                                .to_string(),
                        )
                    })?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
        }

        Ok(headers)
    }
}

/// Base64 HMAC-SHA256 of `path?canonical_query`
///
/// # Errors
///
/// Returns [`RollcallError::Configuration`] if the MAC rejects the key.
pub fn sign(path: &str, params: &QueryParams, secret: &[u8]) -> Result<String> {
    let payload = format!("{path}?{}", params.canonical());
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|e| {
        RollcallError::Configuration(format!("Cannot initialise request signing: {e}"))
    })?;
    mac.update(payload.as_bytes());
    Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}
