//! Configuration types for the DDNS handles
//!
//! This module defines the settings needed to build a handle. Where the
//! values come from (environment, files) is up to the caller.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for building one handle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandleConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Timeout applied to every remote request (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl HandleConfig {
    /// Create a configuration with the default timeout
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// The request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("Request timeout must be > 0"));
        }

        self.provider.validate()
    }
}

/// DNS provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Cloudflare provider
    Cloudflare {
        /// Cloudflare API token
        api_token: String,
        /// Restrict zone lookups to one account (optional)
        #[serde(default)]
        account_id: Option<String>,
        /// API base URL override (optional)
        #[serde(default)]
        base_url: Option<String>,
    },
}

impl ProviderConfig {
    /// Cloudflare configuration with the default base URL
    pub fn cloudflare(api_token: impl Into<String>, account_id: Option<String>) -> Self {
        ProviderConfig::Cloudflare {
            api_token: api_token.into(),
            account_id,
            base_url: None,
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Cloudflare {
                api_token,
                account_id,
                base_url,
            } => {
                if api_token.trim().is_empty() {
                    return Err(crate::Error::config("Cloudflare API token cannot be empty"));
                }
                if account_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
                    return Err(crate::Error::config(
                        "Cloudflare account ID cannot be blank when set",
                    ));
                }
                if let Some(url) = base_url
                    && !(url.starts_with("https://") || url.starts_with("http://"))
                {
                    return Err(crate::Error::config(format!(
                        "Cloudflare base URL must be an http(s) URL, got {:?}",
                        url
                    )));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Cloudflare { .. } => "cloudflare",
        }
    }
}

// The API token must never show up in logs
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Cloudflare {
                account_id,
                base_url,
                ..
            } => f
                .debug_struct("Cloudflare")
                .field("api_token", &"<REDACTED>")
                .field("account_id", account_id)
                .field("base_url", base_url)
                .finish(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let config: HandleConfig = serde_json::from_value(serde_json::json!({
            "provider": { "type": "cloudflare", "api_token": "token123" }
        }))
        .unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.provider.type_name(), "cloudflare");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_token_rejected() {
        let config = HandleConfig::new(ProviderConfig::cloudflare("  ", None));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config =
            HandleConfig::new(ProviderConfig::cloudflare("token123", None)).with_timeout_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let provider = ProviderConfig::Cloudflare {
            api_token: "token123".to_string(),
            account_id: None,
            base_url: Some("ftp://example.org".to_string()),
        };
        assert!(provider.validate().is_err());
    }

    #[test]
    fn test_token_not_exposed_in_debug() {
        let provider = ProviderConfig::cloudflare("secret_token_12345", Some("acct".into()));
        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_token"));
        assert!(debug_str.contains("acct"));
    }
}
