// # DNS Handle Trait
//
// Defines the capability interface for managing address records at a DNS
// provider.
//
// ## Implementations
//
// - Cloudflare: `ddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{AddressFamily, Domain, DnsHandle, TracingDiagnostics};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let handle = /* DnsHandle implementation */;
//     let domain = Domain::parse("home.example.org")?;
//
//     let records = handle
//         .list_records(&TracingDiagnostics, &domain, AddressFamily::V4)
//         .await?;
//     for (id, ip) in records {
//         println!("{id}: {ip}");
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::time::Duration;

use crate::diagnostics::Diagnostics;
use crate::domain::Domain;
use crate::error::Result;
use crate::family::AddressFamily;
use crate::ttl::Ttl;

/// Address records at one name, keyed by provider record ID
pub type RecordMap = BTreeMap<String, IpAddr>;

/// Trait for DNS provider handles
///
/// A handle is long-lived and shared: update workers for different domains
/// may call it concurrently. Each operation first resolves the zone owning
/// `domain`, then talks to the provider.
///
/// # Failure Model
///
/// - Every failure is returned as an [`Error`](crate::Error) after a
///   diagnostic message has been emitted to `diag`.
/// - Exactly one remote attempt per request (pagination aside). Retry policy
///   belongs to the caller.
/// - Caches are only changed by successful operations.
#[async_trait]
pub trait DnsHandle: Send + Sync {
    /// List the address records of `family` at `domain`
    ///
    /// A second call with no intervening mutation is answered from the cache.
    async fn list_records(
        &self,
        diag: &dyn Diagnostics,
        domain: &Domain,
        family: AddressFamily,
    ) -> Result<RecordMap>;

    /// Create one record and return its provider ID
    async fn create_record(
        &self,
        diag: &dyn Diagnostics,
        domain: &Domain,
        family: AddressFamily,
        ip: IpAddr,
        ttl: Ttl,
        proxied: bool,
    ) -> Result<String>;

    /// Point the record `id` at a new address
    async fn update_record(
        &self,
        diag: &dyn Diagnostics,
        domain: &Domain,
        family: AddressFamily,
        id: &str,
        ip: IpAddr,
    ) -> Result<()>;

    /// Delete the record `id`
    async fn delete_record(
        &self,
        diag: &dyn Diagnostics,
        domain: &Domain,
        family: AddressFamily,
        id: &str,
    ) -> Result<()>;

    /// Forget every cached zone lookup
    ///
    /// Cached record listings are kept.
    fn flush_cache(&self);
}

/// Authentication information that can be turned into a [`DnsHandle`]
///
/// Construction verifies the credentials once; a returned handle is ready
/// to use.
#[async_trait]
pub trait Auth: Send + Sync {
    /// Verify the credentials and build a handle whose requests time out
    /// after `timeout`
    async fn new_handle(
        &self,
        diag: &dyn Diagnostics,
        timeout: Duration,
    ) -> Result<Box<dyn DnsHandle>>;
}
