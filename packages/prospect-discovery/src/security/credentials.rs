//! Search-provider API keys.
//!
//! Held in a `secrecy` box and redacted from `Debug`/`Display`, so a key
//! cannot leak through a `tracing` field or an error message. The only way
//! out is [`ApiKey::bearer`] when building the request.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

use crate::error::{DiscoveryError, Result};

pub struct ApiKey(SecretBox<str>);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        let value: String = value.into();
        Self(SecretBox::new(Box::from(value.trim())))
    }

    /// Read a key from the environment (a `.env` file counts).
    pub fn from_env(var: &str) -> Result<Self> {
        let value = dotenvy::var(var)
            .map_err(|_| DiscoveryError::Config(format!("{var} is not set")))?;
        let key = Self::new(value);
        if key.is_blank() {
            return Err(DiscoveryError::Config(format!("{var} is empty")));
        }
        Ok(key)
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }

    pub fn is_blank(&self) -> bool {
        self.0.expose_secret().is_empty()
    }
}

impl Clone for ApiKey {
    fn clone(&self) -> Self {
        Self::new(self.0.expose_secret())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&"[REDACTED]").finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_never_formatted() {
        let key = ApiKey::new("tvly-super-secret-key");
        assert!(!format!("{:?}", key).contains("tvly"));
        assert_eq!(key.to_string(), "[REDACTED]");
    }

    #[test]
    fn test_bearer_and_blank() {
        let key = ApiKey::from(" tvly-key ");
        assert_eq!(key.bearer(), "Bearer tvly-key");
        assert!(!key.is_blank());
        assert!(ApiKey::from("  ").is_blank());
    }

    #[test]
    fn test_missing_env_var_is_config_error() {
        let err = ApiKey::from_env("PROSPECT_TEST_KEY_THAT_IS_NEVER_SET").unwrap_err();
        assert!(matches!(err, DiscoveryError::Config(_)));
    }
}
