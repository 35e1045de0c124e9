//! A mock Cloudflare API for handle contract tests
//!
//! Zone lookups for names without a mounted answer return an empty list, the
//! way the real API answers for names it has never seen.

#![allow(dead_code)]

use ddns_core::MemoryDiagnostics;
use ddns_provider_cloudflare::{CloudflareAuth, CloudflareHandle};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-token";

/// Successful envelope around `result`
pub fn envelope(result: Value) -> Value {
    json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": result,
    })
}

/// Successful list envelope for one page out of `total_pages`
pub fn page(result: Value, page: u32, total_pages: u32) -> Value {
    let count = result.as_array().map_or(0, Vec::len);
    json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": result,
        "result_info": {
            "page": page,
            "per_page": 50,
            "total_pages": total_pages,
            "count": count,
            "total": count,
        },
    })
}

/// Failed envelope carrying one API error
pub fn failure(code: u32, message: &str) -> Value {
    json!({
        "success": false,
        "errors": [{ "code": code, "message": message }],
        "messages": [],
        "result": null,
    })
}

pub fn zones_json(zones: &[(&str, &str)]) -> Value {
    Value::Array(
        zones
            .iter()
            .map(|(id, status)| json!({ "id": id, "name": "ignored", "status": status }))
            .collect(),
    )
}

pub fn records_json(records: &[(&str, &str)]) -> Value {
    Value::Array(
        records
            .iter()
            .map(|(id, content)| json!({ "id": id, "type": "A", "content": content }))
            .collect(),
    )
}

pub struct CloudflareMock {
    pub server: MockServer,
}

impl CloudflareMock {
    /// A server that accepts [`TOKEN`] and knows no zones
    pub async fn start() -> Self {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/tokens/verify"))
            .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "id": "token-id",
                "status": "active",
            }))))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/zones"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]), 1, 1)))
            .with_priority(200)
            .mount(&server)
            .await;

        Self { server }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Answer zone lookups of `name` with a single page of `(id, status)` zones
    pub async fn zones(&self, name: &str, zones: &[(&str, &str)]) {
        Mock::given(method("GET"))
            .and(path("/zones"))
            .and(query_param("name", name))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(zones_json(zones), 1, 1)))
            .mount(&self.server)
            .await;
    }

    /// Answer record listings of `name` in `zone_id` with a single page
    pub async fn records(&self, zone_id: &str, name: &str, record_type: &str, records: &[(&str, &str)]) {
        Mock::given(method("GET"))
            .and(path(format!("/zones/{}/dns_records", zone_id)))
            .and(query_param("name", name))
            .and(query_param("type", record_type))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(records_json(records), 1, 1)))
            .mount(&self.server)
            .await;
    }

    /// Build a verified handle talking to this server
    pub async fn handle(&self) -> CloudflareHandle {
        self.handle_with(CloudflareAuth::new(TOKEN, None)).await
    }

    pub async fn handle_with(&self, auth: CloudflareAuth) -> CloudflareHandle {
        auth.with_base_url(self.uri())
            .connect(&MemoryDiagnostics::new(), Duration::from_secs(5))
            .await
            .expect("handle should build against the mock server")
    }

    /// `(method, path)` of every request after token verification
    pub async fn calls(&self) -> Vec<(String, String)> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() != "/user/tokens/verify")
            .map(|r| (r.method.to_string(), r.url.path().to_string()))
            .collect()
    }

    pub async fn call_count(&self) -> usize {
        self.calls().await.len()
    }

    /// The `name` queried by every zone lookup, in order
    pub async fn zone_queries(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == "/zones")
            .map(|r| {
                r.url
                    .query_pairs()
                    .find(|(key, _)| key == "name")
                    .map(|(_, value)| value.into_owned())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Number of record listing requests (pages counted separately)
    pub async fn record_queries(&self) -> usize {
        self.calls()
            .await
            .iter()
            .filter(|(method, path)| method == "GET" && path.ends_with("/dns_records"))
            .count()
    }
}
