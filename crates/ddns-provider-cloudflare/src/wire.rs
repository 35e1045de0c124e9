//! Cloudflare API v4 wire types
//!
//! Every response is wrapped in the same envelope:
//!
//! ```json
//! {
//!   "success": true,
//!   "errors": [],
//!   "messages": [],
//!   "result": { ... },
//!   "result_info": { "page": 1, "per_page": 50, "total_pages": 1, "count": 1, "total": 1 }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Error code Cloudflare uses for "Record does not exist"
pub(crate) const CODE_RECORD_MISSING: u32 = 81044;

/// Response envelope shared by all endpoints
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ResponseInfo>,
    pub result: Option<T>,
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

impl<T> Envelope<T> {
    /// The API-reported errors, joined for a message
    pub fn error_summary(&self) -> String {
        summarize(&self.errors)
    }

    /// Whether the API reported the targeted record as missing
    pub fn reports_missing_record(&self) -> bool {
        self.errors.iter().any(|e| e.code == CODE_RECORD_MISSING)
    }
}

/// Body used only to pull `errors` out of a failed response
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub errors: Vec<ResponseInfo>,
}

/// One entry of `errors` or `messages`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ResponseInfo {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub message: String,
}

pub(crate) fn summarize(errors: &[ResponseInfo]) -> String {
    if errors.is_empty() {
        return "no error details".to_string();
    }
    errors
        .iter()
        .map(|e| format!("{} (code {})", e.message, e.code))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Pagination info attached to list responses
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct ResultInfo {
    #[serde(default)]
    pub total_pages: u32,
}

/// `GET /user/tokens/verify`
#[derive(Debug, Deserialize)]
pub(crate) struct TokenStatus {
    #[serde(default)]
    pub status: String,
}

/// One element of `GET /zones`
#[derive(Debug, Deserialize)]
pub(crate) struct Zone {
    pub id: String,
    #[serde(default)]
    pub status: String,
}

/// One DNS record as returned by the API
#[derive(Debug, Deserialize)]
pub(crate) struct DnsRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub content: String,
}

/// Body of `POST /zones/{zone}/dns_records`
#[derive(Debug, Serialize)]
pub(crate) struct NewRecord<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub content: String,
    pub ttl: u32,
    pub proxied: bool,
}

/// Body of `PATCH /zones/{zone}/dns_records/{id}`
#[derive(Debug, Serialize)]
pub(crate) struct RecordPatch<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub content: String,
}
