//! Cloudflare credentials and handle construction

use async_trait::async_trait;
use ddns_core::config::ProviderConfig;
use ddns_core::{Auth, Diagnostics, DnsHandle, Error, Result, Tag};
use std::time::Duration;
use tracing::info;

use crate::client::{ApiClient, ApiError, CLOUDFLARE_API_BASE};
use crate::handle::CloudflareHandle;

/// Status reported for a usable token
const TOKEN_ACTIVE: &str = "active";

/// Cloudflare API credentials
///
/// Turned into a [`CloudflareHandle`] by [`CloudflareAuth::connect`], which
/// verifies the token once.
#[derive(Clone)]
pub struct CloudflareAuth {
    /// ⚠️ NEVER log this value
    token: String,
    account_id: Option<String>,
    base_url: String,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareAuth")
            .field("token", &"<REDACTED>")
            .field("account_id", &self.account_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareAuth {
    /// Credentials for the public API
    ///
    /// `account_id` restricts zone lookups to one account.
    pub fn new(token: impl Into<String>, account_id: Option<String>) -> Self {
        Self {
            token: token.into(),
            account_id,
            base_url: CLOUDFLARE_API_BASE.to_string(),
        }
    }

    /// Talk to another API endpoint (a test server, for instance)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Credentials from a provider configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        match config {
            ProviderConfig::Cloudflare {
                api_token,
                account_id,
                base_url,
            } => {
                config.validate()?;
                let auth = Self::new(api_token.clone(), account_id.clone());
                Ok(match base_url {
                    Some(url) => auth.with_base_url(url.clone()),
                    None => auth,
                })
            }
        }
    }

    /// Verify the token and build a handle
    pub async fn connect(&self, diag: &dyn Diagnostics, timeout: Duration) -> Result<CloudflareHandle> {
        if self.token.trim().is_empty() {
            diag.error(
                Tag::UserError,
                "Failed to prepare the Cloudflare authentication: the API token is empty",
            );
            return Err(Error::auth("Cloudflare API token is empty"));
        }

        let client = ApiClient::new(self.token.clone(), self.account_id.clone(), self.base_url.clone(), timeout)
            .map_err(|e| {
                diag.error(
                    Tag::Error,
                    &format!("Failed to prepare the Cloudflare authentication: {}", e),
                );
                Error::http(e.to_string())
            })?;

        let reason = match client.verify_token().await {
            Ok(token) if token.status == TOKEN_ACTIVE => {
                info!("Cloudflare API token verified");
                return Ok(CloudflareHandle::new(client));
            }
            Ok(token) => format!("the token is {:?}", token.status),
            Err(
                err @ (ApiError::Unauthorized { .. }
                | ApiError::Rejected { .. }
                | ApiError::Unsuccessful { .. }
                | ApiError::NotFound(_)),
            ) => err.to_string(),
            Err(err) => {
                diag.error(
                    Tag::Error,
                    &format!("Failed to reach Cloudflare to verify the API token: {}", err),
                );
                return Err(Error::http(err.to_string()));
            }
        };

        diag.error(
            Tag::UserError,
            &format!("The Cloudflare API token could not be verified: {}", reason),
        );
        diag.error(Tag::UserError, "Please double-check CF_API_TOKEN or CF_API_TOKEN_FILE");
        Err(Error::auth(reason))
    }
}

#[async_trait]
impl Auth for CloudflareAuth {
    async fn new_handle(&self, diag: &dyn Diagnostics, timeout: Duration) -> Result<Box<dyn DnsHandle>> {
        let handle = self.connect(diag, timeout).await?;
        Ok(Box::new(handle))
    }
}
