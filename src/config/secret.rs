//! Secret-protected credentials
//!
//! API tokens and signing secrets are held in [`SecretString`], a `secrecy`
//! container whose inner value is zeroized on drop and redacted from `Debug`.
//! Reading the value requires an explicit `expose_secret()` call, which the
//! request signer performs only at the moment a header or signature is built.
//!
//! # Example
//!
//! ```rust
//! use rollcall::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let secret = secret_string("s3cr3t".to_string());
//! assert_eq!(secret.expose_secret().as_str(), "s3cr3t");
//! assert!(!format!("{secret:?}").contains("s3cr3t"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret};
use serde::{Deserialize, Deserializer};
use zeroize::Zeroize;

/// String newtype that satisfies the `secrecy` marker traits
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the plain value; callers must not retain or log it
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Zeroize-on-drop, Debug-redacted string secret
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain string as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("token-123".to_string());
        assert_eq!(secret.expose_secret(), "token-123");
        assert!(!secret.expose_secret().is_empty());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-data".to_string());
        let debug_output = format!("{secret:?}");

        assert!(!debug_output.contains("sensitive-data"));
        assert!(debug_output.contains("REDACTED"));
    }

    #[test]
    fn test_secret_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Holder {
            api_secret: SecretString,
        }

        let holder: Holder = toml::from_str(r#"api_secret = "abc""#).unwrap();
        assert_eq!(holder.api_secret.expose_secret(), "abc");
    }

    #[test]
    fn test_secret_as_str() {
        let secret = secret_string("key".to_string());
        assert_eq!(secret.expose_secret().as_str().as_bytes(), b"key");
    }
}
