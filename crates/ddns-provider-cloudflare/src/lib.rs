// # Cloudflare DNS Handle
//
// This crate implements the `DnsHandle` capability for Cloudflare.
//
// ## Components
//
// - `client`: one method per Cloudflare API v4 endpoint, with pagination
// - `zone_cache`: per-name memo of zone lookups, shared in-flight queries
// - `zone`: zone status classification and suffix-descent resolution
// - `record_store`: write-through cache of address records per domain and family
// - `handle`: `CloudflareHandle`, tying the above together
// - `auth`: `CloudflareAuth`, which verifies the token and builds a handle
//
// ## Caching Rules
//
// - A zone lookup is cached per exact name until `flush_cache`
// - A record listing is cached per (domain, family) for the handle's lifetime
// - Successful mutations patch a cached listing in place; failed ones leave it alone
// - Failures are never cached
//
// ## Security Requirements
//
// - API token NEVER appears in logs or `Debug` output
// - Handle construction fails if the token is empty or not active
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - Verify Token: GET `/user/tokens/verify`
// - List Zones: GET `/zones?name=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...&type=...`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Update DNS Record: PATCH `/zones/:zone_id/dns_records/:record_id`
// - Delete DNS Record: DELETE `/zones/:zone_id/dns_records/:record_id`
//
// ## Example
//
// ```rust,no_run
// use ddns_core::{AddressFamily, DnsHandle, Domain, TracingDiagnostics};
// use ddns_provider_cloudflare::CloudflareAuth;
// use std::time::Duration;
//
// #[tokio::main]
// async fn main() -> ddns_core::Result<()> {
//     let auth = CloudflareAuth::new(std::env::var("CF_API_TOKEN").unwrap_or_default(), None);
//     let handle = auth.connect(&TracingDiagnostics, Duration::from_secs(30)).await?;
//
//     let domain = Domain::parse("home.example.org")?;
//     let records = handle
//         .list_records(&TracingDiagnostics, &domain, AddressFamily::V4)
//         .await?;
//     println!("{:?}", records);
//     Ok(())
// }
// ```

mod auth;
mod client;
mod handle;
mod record_store;
mod wire;
mod zone;
mod zone_cache;

pub use auth::CloudflareAuth;
pub use client::CLOUDFLARE_API_BASE;
pub use handle::CloudflareHandle;
