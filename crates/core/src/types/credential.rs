//! Platform credentials.
//!
//! Credentials are immutable once handed to an adapter's `initialize` and are
//! owned by that adapter instance. `Debug` redacts every secret.

use secrecy::{ExposeSecret, SecretString};

use crate::error::MarketplaceError;

/// Credentials for a single marketplace store.
#[derive(Clone)]
pub struct Credentials {
    store: String,
    access_token: SecretString,
    api_key: Option<String>,
    api_secret: Option<SecretString>,
    api_version: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("store", &self.store)
            .field("access_token", &"[REDACTED]")
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[REDACTED]"))
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl Credentials {
    /// Create credentials from a store identifier and access token.
    #[must_use]
    pub fn new(store: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            store: store.into(),
            access_token: SecretString::from(access_token.into()),
            api_key: None,
            api_secret: None,
            api_version: None,
        }
    }

    /// Attach an API key/secret pair.
    #[must_use]
    pub fn with_key_pair(mut self, api_key: impl Into<String>, api_secret: SecretString) -> Self {
        self.api_key = Some(api_key.into());
        self.api_secret = Some(api_secret);
        self
    }

    /// Pin an API version, overriding the adapter's configured default.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Store or shop identifier (e.g. `your-store.myshopify.com`).
    #[must_use]
    pub fn store(&self) -> &str {
        &self.store
    }

    /// Access token.
    #[must_use]
    pub const fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    /// API key, if a key pair was supplied.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// API secret, if a key pair was supplied.
    #[must_use]
    pub const fn api_secret(&self) -> Option<&SecretString> {
        self.api_secret.as_ref()
    }

    /// Pinned API version, if any.
    #[must_use]
    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    /// Check that the required fields are present.
    ///
    /// # Errors
    ///
    /// Returns `MarketplaceError::Initialization` naming the first missing field.
    pub fn validate(&self) -> Result<(), MarketplaceError> {
        if self.store.trim().is_empty() {
            return Err(MarketplaceError::Initialization(
                "store identifier is required".to_string(),
            ));
        }
        if self.access_token.expose_secret().trim().is_empty() {
            return Err(MarketplaceError::Initialization(
                "access token is required".to_string(),
            ));
        }
        if self.api_key.is_some()
            && self
                .api_secret
                .as_ref()
                .is_none_or(|s| s.expose_secret().is_empty())
        {
            return Err(MarketplaceError::Initialization(
                "api secret is required when an api key is set".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::new("shop.myshopify.com", "shpat_abc123")
            .with_key_pair("key", SecretString::from("hunter2"));
        let debug = format!("{creds:?}");
        assert!(debug.contains("shop.myshopify.com"));
        assert!(!debug.contains("shpat_abc123"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_validate_missing_fields() {
        assert!(Credentials::new("", "token").validate().is_err());
        assert!(Credentials::new("shop", " ").validate().is_err());
        assert!(
            Credentials::new("shop", "token")
                .with_key_pair("key", SecretString::from(""))
                .validate()
                .is_err()
        );
        assert!(Credentials::new("shop", "token").validate().is_ok());
    }

    #[test]
    fn test_api_version_override() {
        let creds = Credentials::new("shop", "token").with_api_version("2024-07");
        assert_eq!(creds.api_version(), Some("2024-07"));
    }
}
