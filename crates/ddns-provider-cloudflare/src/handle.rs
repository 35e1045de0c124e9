// # Cloudflare Handle
//
// Implements `DnsHandle` on top of the API client, the zone cache and the
// record store.
//
// ## Request Flow
//
// 1. Resolve the zone owning the domain (zone cache, then API)
// 2. List: answer from the record store when warm, else query and fill it
// 3. Create/Update/Delete: one API call, then patch the record store if warm
//
// ## Failure Rules
//
// - Exactly one remote attempt per call (pagination aside); no retries
// - Every failure emits one diagnostic message before returning
// - Caches are only touched after a successful remote call

use async_trait::async_trait;
use ddns_core::{
    AddressFamily, Diagnostics, DnsHandle, Domain, Error, Mutation, RecordMap, Result, Tag, Ttl,
};
use std::net::IpAddr;
use tracing::{debug, info};

use crate::client::{ApiClient, ApiError};
use crate::record_store::RecordStore;
use crate::wire::{NewRecord, RecordPatch};
use crate::zone::ZoneResolver;
use crate::zone_cache::ZoneCache;

/// A verified connection to the Cloudflare API with its caches
///
/// Built by [`CloudflareAuth`](crate::CloudflareAuth). Share it behind an
/// `Arc`; every method takes `&self`.
#[derive(Debug)]
pub struct CloudflareHandle {
    client: ApiClient,
    zones: ZoneCache,
    records: RecordStore,
}

impl CloudflareHandle {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self {
            client,
            zones: ZoneCache::new(),
            records: RecordStore::new(),
        }
    }

    /// ID of the zone owning `domain`
    pub async fn resolve_zone(&self, diag: &dyn Diagnostics, domain: &Domain) -> Result<String> {
        ZoneResolver::new(&self.zones, &self.client).resolve(diag, domain).await
    }

    /// Fetch and parse every record, without touching the record store
    async fn fetch_records(
        &self,
        diag: &dyn Diagnostics,
        zone_id: &str,
        domain: &Domain,
        family: AddressFamily,
    ) -> Result<RecordMap> {
        let name = domain.wire_name();

        let raw = match self.client.list_records(zone_id, &name, family.record_type()).await {
            Ok(raw) => raw,
            Err(err) => {
                diag.warning(
                    Tag::Error,
                    &format!("Failed to retrieve records of {:?}: {}", name, err),
                );
                return Err(Error::record_list(name, err.to_string()));
            }
        };

        let mut records = RecordMap::new();
        for record in raw {
            match family.parse_addr(&record.content) {
                Ok(ip) => {
                    records.insert(record.id, ip);
                }
                Err(err) => {
                    diag.warning(
                        Tag::Impossible,
                        &format!("Failed to parse the IP address in records of {:?}: {}", name, err),
                    );
                    return Err(Error::record_parse(
                        name,
                        format!("{:?} is not an {} address: {}", record.content, family, err),
                    ));
                }
            }
        }

        Ok(records)
    }

    /// The remote failure of a mutation, reported and converted
    fn mutation_failed(
        diag: &dyn Diagnostics,
        op: Mutation,
        domain: &Domain,
        family: AddressFamily,
        id: &str,
        err: ApiError,
    ) -> Error {
        let name = domain.wire_name();
        let record_type = family.record_type();

        if err.is_missing() {
            diag.warning(
                Tag::Error,
                &format!(
                    "Failed to {} a {} record of {:?} (ID: {}) because it no longer exists: {}",
                    op, record_type, name, id, err
                ),
            );
            Error::stale_record(op, name, id, err.to_string())
        } else {
            diag.warning(
                Tag::Error,
                &format!(
                    "Failed to {} a {} record of {:?} (ID: {}): {}",
                    op, record_type, name, id, err
                ),
            );
            Error::mutation(op, name, err.to_string())
        }
    }
}

/// Reject an address of the wrong family before any remote call
fn check_family(diag: &dyn Diagnostics, family: AddressFamily, ip: IpAddr) -> Result<()> {
    if family.matches(ip) {
        return Ok(());
    }
    let message = format!("{} is not an {} address", ip, family);
    diag.warning(Tag::Impossible, &message);
    Err(Error::invalid_input(message))
}

#[async_trait]
impl DnsHandle for CloudflareHandle {
    async fn list_records(
        &self,
        diag: &dyn Diagnostics,
        domain: &Domain,
        family: AddressFamily,
    ) -> Result<RecordMap> {
        if let Some(records) = self.records.get(domain, family).await {
            debug!("Record cache hit for {} ({})", domain, family.record_type());
            return Ok(records);
        }

        let zone_id = self.resolve_zone(diag, domain).await?;
        let records = self.fetch_records(diag, &zone_id, domain, family).await?;

        debug!(
            "Found {} {} record(s) of {}",
            records.len(),
            family.record_type(),
            domain
        );
        self.records.replace(domain, family, records.clone()).await;
        Ok(records)
    }

    async fn create_record(
        &self,
        diag: &dyn Diagnostics,
        domain: &Domain,
        family: AddressFamily,
        ip: IpAddr,
        ttl: Ttl,
        proxied: bool,
    ) -> Result<String> {
        check_family(diag, family, ip)?;
        let zone_id = self.resolve_zone(diag, domain).await?;

        let name = domain.wire_name();
        let body = NewRecord {
            name: &name,
            record_type: family.record_type(),
            content: ip.to_string(),
            ttl: ttl.seconds(),
            proxied,
        };

        let created = match self.client.create_record(&zone_id, &body).await {
            Ok(created) => created,
            Err(err) => {
                diag.warning(
                    Tag::Error,
                    &format!(
                        "Failed to add a new {} record of {:?}: {}",
                        family.record_type(),
                        name,
                        err
                    ),
                );
                return Err(Error::mutation(Mutation::Create, name, err.to_string()));
            }
        };

        let patched = self.records.upsert_if_warm(domain, family, &created.id, ip).await;
        info!(
            "Created {} record of {} -> {} (ID {}, TTL {}, proxied {}, cache {})",
            family.record_type(),
            domain,
            ip,
            created.id,
            ttl,
            proxied,
            if patched { "patched" } else { "cold" }
        );
        Ok(created.id)
    }

    async fn update_record(
        &self,
        diag: &dyn Diagnostics,
        domain: &Domain,
        family: AddressFamily,
        id: &str,
        ip: IpAddr,
    ) -> Result<()> {
        check_family(diag, family, ip)?;
        let zone_id = self.resolve_zone(diag, domain).await?;

        let name = domain.wire_name();
        let patch = RecordPatch {
            name: &name,
            record_type: family.record_type(),
            content: ip.to_string(),
        };

        if let Err(err) = self.client.update_record(&zone_id, id, &patch).await {
            return Err(Self::mutation_failed(diag, Mutation::Update, domain, family, id, err));
        }

        self.records.upsert_if_warm(domain, family, id, ip).await;
        info!("Updated {} record of {} -> {} (ID {})", family.record_type(), domain, ip, id);
        Ok(())
    }

    async fn delete_record(
        &self,
        diag: &dyn Diagnostics,
        domain: &Domain,
        family: AddressFamily,
        id: &str,
    ) -> Result<()> {
        let zone_id = self.resolve_zone(diag, domain).await?;

        if let Err(err) = self.client.delete_record(&zone_id, id).await {
            return Err(Self::mutation_failed(diag, Mutation::Delete, domain, family, id, err));
        }

        self.records.remove_if_warm(domain, family, id).await;
        info!("Deleted {} record of {} (ID {})", family.record_type(), domain, id);
        Ok(())
    }

    fn flush_cache(&self) {
        self.zones.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddns_core::MemoryDiagnostics;
    use std::time::Duration;

    fn handle() -> CloudflareHandle {
        // Nothing listens here; tests below never reach the network.
        let client = ApiClient::new("token", None, "http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        CloudflareHandle::new(client)
    }

    #[tokio::test]
    async fn test_family_mismatch_rejected_before_remote_call() {
        let handle = handle();
        let diag = MemoryDiagnostics::new();
        let domain = Domain::literal("sub.test.org").unwrap();

        let err = handle
            .create_record(&diag, &domain, AddressFamily::V4, "::1".parse().unwrap(), Ttl::AUTO, false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = handle
            .update_record(&diag, &domain, AddressFamily::V6, "r1", "1.2.3.4".parse().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        assert_eq!(
            diag.texts(),
            vec!["::1 is not an IPv4 address", "1.2.3.4 is not an IPv6 address"]
        );
        assert_eq!(handle.zones.populated(), 0);
    }

    #[tokio::test]
    async fn test_warm_list_needs_no_network() {
        let handle = handle();
        let domain = Domain::literal("sub.test.org").unwrap();
        let mut records = RecordMap::new();
        records.insert("record1".to_string(), "1.2.3.4".parse().unwrap());
        handle.records.replace(&domain, AddressFamily::V4, records.clone()).await;

        let diag = MemoryDiagnostics::new();
        let listed = handle.list_records(&diag, &domain, AddressFamily::V4).await.unwrap();

        assert_eq!(listed, records);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_token_not_exposed_in_debug() {
        let client = ApiClient::new(
            "secret_token_12345",
            None,
            crate::CLOUDFLARE_API_BASE,
            Duration::from_secs(5),
        )
        .unwrap();

        let debug_str = format!("{:?}", CloudflareHandle::new(client));
        assert!(!debug_str.contains("secret_token"));
        assert!(debug_str.contains("CloudflareHandle"));
    }
}
