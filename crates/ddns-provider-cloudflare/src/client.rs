//! HTTP client for the Cloudflare API v4
//!
//! One method per endpoint. List endpoints follow `result_info.total_pages`
//! until every page is fetched; any failing page fails the whole call.
//! Nothing here caches or retries.

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::wire::{self, DnsRecord, Envelope, ErrorBody, NewRecord, RecordPatch, TokenStatus, Zone};

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Page size requested when looking up zones
const ZONES_PER_PAGE: u32 = 50;

/// Longest raw body excerpt kept in an error message
const MAX_DETAIL_LEN: usize = 200;

/// Failure of a single API call
#[derive(Debug, Error)]
pub(crate) enum ApiError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("authentication failed: invalid API token or insufficient permissions (HTTP {status}): {detail}")]
    Unauthorized { status: StatusCode, detail: String },

    #[error("not found (HTTP 404): {0}")]
    NotFound(String),

    #[error("rate limit exceeded (HTTP 429): {0}")]
    RateLimited(String),

    #[error("Cloudflare server error (HTTP {status}): {detail}")]
    Server { status: StatusCode, detail: String },

    #[error("request rejected (HTTP {status}): {detail}")]
    Rejected {
        status: StatusCode,
        detail: String,
        missing: bool,
    },

    #[error("API reported failure: {detail}")]
    Unsuccessful { detail: String, missing: bool },

    #[error("failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response is missing the {0}")]
    Incomplete(&'static str),
}

impl ApiError {
    /// Whether the API says the targeted object does not exist
    pub fn is_missing(&self) -> bool {
        match self {
            ApiError::NotFound(_) => true,
            ApiError::Rejected { missing, .. } | ApiError::Unsuccessful { missing, .. } => *missing,
            _ => false,
        }
    }

    fn from_status(status: StatusCode, body: &str) -> Self {
        let errors = serde_json::from_str::<ErrorBody>(body)
            .unwrap_or_default()
            .errors;
        let missing = errors.iter().any(|e| e.code == wire::CODE_RECORD_MISSING);
        let detail = if errors.is_empty() {
            excerpt(body)
        } else {
            wire::summarize(&errors)
        };

        match status.as_u16() {
            401 | 403 => ApiError::Unauthorized { status, detail },
            404 => ApiError::NotFound(detail),
            429 => ApiError::RateLimited(detail),
            500..=599 => ApiError::Server { status, detail },
            _ => ApiError::Rejected {
                status,
                detail,
                missing,
            },
        }
    }
}

fn excerpt(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "empty response body".to_string();
    }
    match body.char_indices().nth(MAX_DETAIL_LEN) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

/// Authenticated Cloudflare API client
#[derive(Clone)]
pub(crate) struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    /// ⚠️ NEVER log this value
    token: String,
    account_id: Option<String>,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("token", &"<REDACTED>")
            .field("account_id", &self.account_id)
            .finish()
    }
}

impl ApiClient {
    /// Build a client whose every request is bounded by `timeout`
    pub fn new(
        token: impl Into<String>,
        account_id: Option<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            account_id,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request and unwrap the envelope
    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Envelope<T>, ApiError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_status(status, &body));
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        if !envelope.success {
            return Err(ApiError::Unsuccessful {
                detail: envelope.error_summary(),
                missing: envelope.reports_missing_record(),
            });
        }

        Ok(envelope)
    }

    /// Fetch every page of a list endpoint
    async fn paginate<T, F>(&self, path: &str, mut query_for_page: F) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned,
        F: FnMut(u32) -> Vec<(&'static str, String)>,
    {
        let url = self.url(path);
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            debug!("GET {} (page {})", path, page);
            let query = query_for_page(page);
            let envelope: Envelope<Vec<T>> = self.call(self.http.get(&url).query(&query)).await?;

            let total_pages = envelope.result_info.map_or(0, |info| info.total_pages);
            items.extend(envelope.result.ok_or(ApiError::Incomplete("result list"))?);

            if page >= total_pages {
                return Ok(items);
            }
            page += 1;
        }
    }

    /// `GET /user/tokens/verify`
    pub async fn verify_token(&self) -> Result<TokenStatus, ApiError> {
        debug!("GET /user/tokens/verify");
        let envelope: Envelope<TokenStatus> =
            self.call(self.http.get(self.url("/user/tokens/verify"))).await?;
        envelope.result.ok_or(ApiError::Incomplete("token status"))
    }

    /// `GET /zones?name=<name>`, restricted to the configured account
    ///
    /// The first page is requested without a `page` parameter.
    pub async fn list_zones(&self, name: &str) -> Result<Vec<Zone>, ApiError> {
        self.paginate("/zones", |page| {
            let mut query = Vec::with_capacity(4);
            if let Some(account_id) = &self.account_id {
                query.push(("account.id", account_id.clone()));
            }
            query.push(("name", name.to_string()));
            query.push(("per_page", ZONES_PER_PAGE.to_string()));
            if page > 1 {
                query.push(("page", page.to_string()));
            }
            query
        })
        .await
    }

    /// `GET /zones/{zone}/dns_records?name=<name>&type=<type>`
    pub async fn list_records(
        &self,
        zone_id: &str,
        name: &str,
        record_type: &str,
    ) -> Result<Vec<DnsRecord>, ApiError> {
        let path = format!("/zones/{}/dns_records", zone_id);
        self.paginate(&path, |page| {
            vec![
                ("name", name.to_string()),
                ("page", page.to_string()),
                ("type", record_type.to_string()),
            ]
        })
        .await
    }

    /// `POST /zones/{zone}/dns_records`
    pub async fn create_record(&self, zone_id: &str, record: &NewRecord<'_>) -> Result<DnsRecord, ApiError> {
        let path = format!("/zones/{}/dns_records", zone_id);
        debug!("POST {}", path);
        let envelope: Envelope<DnsRecord> = self.call(self.http.post(self.url(&path)).json(record)).await?;

        match envelope.result {
            Some(created) if !created.id.is_empty() => Ok(created),
            _ => Err(ApiError::Incomplete("ID of the new record")),
        }
    }

    /// `PATCH /zones/{zone}/dns_records/{id}`
    pub async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        patch: &RecordPatch<'_>,
    ) -> Result<(), ApiError> {
        let path = format!("/zones/{}/dns_records/{}", zone_id, record_id);
        debug!("PATCH {}", path);
        let _: Envelope<serde_json::Value> = self.call(self.http.patch(self.url(&path)).json(patch)).await?;
        Ok(())
    }

    /// `DELETE /zones/{zone}/dns_records/{id}`
    pub async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<(), ApiError> {
        let path = format!("/zones/{}/dns_records/{}", zone_id, record_id);
        debug!("DELETE {}", path);
        let _: Envelope<serde_json::Value> = self.call(self.http.delete(self.url(&path))).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized { .. }
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream"),
            ApiError::Server { .. }
        ));
        assert!(ApiError::from_status(StatusCode::NOT_FOUND, "").is_missing());
    }

    #[test]
    fn test_missing_record_code_detected_on_other_status() {
        let body = r#"{"success":false,"errors":[{"code":81044,"message":"Record does not exist."}]}"#;
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, body);
        assert!(err.is_missing());
        assert!(err.to_string().contains("Record does not exist."));
    }

    #[test]
    fn test_other_rejections_are_not_missing() {
        let body = r#"{"success":false,"errors":[{"code":9109,"message":"Invalid access token"}]}"#;
        assert!(!ApiError::from_status(StatusCode::BAD_REQUEST, body).is_missing());
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let long = "x".repeat(MAX_DETAIL_LEN + 50);
        let detail = excerpt(&long);
        assert!(detail.ends_with("..."));
        assert_eq!(detail.len(), MAX_DETAIL_LEN + 3);
        assert_eq!(excerpt("  "), "empty response body");
    }

    #[test]
    fn test_token_not_exposed_in_debug() {
        let client = ApiClient::new(
            "secret_token_12345",
            None,
            CLOUDFLARE_API_BASE,
            Duration::from_secs(5),
        )
        .unwrap();

        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("secret_token"));
        assert!(debug_str.contains("ApiClient"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("t", None, "http://127.0.0.1:1/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url("/zones"), "http://127.0.0.1:1/zones");
    }
}
