// # Record Store
//
// Last known address records per (domain, address family).
//
// ## States
//
// - Cold: no entry; the next list call queries the API
// - Warm: an entry holding every record ID and address seen by the last
//   successful list, patched by successful mutations since
//
// Mutations never warm a cold entry. A list only replaces an entry after
// every record of every page parsed.

use std::collections::HashMap;
use std::net::IpAddr;
use tokio::sync::RwLock;

use ddns_core::{AddressFamily, Domain, RecordMap};

type Key = (Domain, AddressFamily);

/// In-memory write-through record cache
#[derive(Debug, Default)]
pub(crate) struct RecordStore {
    inner: RwLock<HashMap<Key, RecordMap>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the warm entry, or `None` if cold
    pub async fn get(&self, domain: &Domain, family: AddressFamily) -> Option<RecordMap> {
        self.inner.read().await.get(&(domain.clone(), family)).cloned()
    }

    /// Warm (or re-warm) an entry with a complete listing
    pub async fn replace(&self, domain: &Domain, family: AddressFamily, records: RecordMap) {
        self.inner.write().await.insert((domain.clone(), family), records);
    }

    /// Record `id -> ip` if the entry is warm; inserts or overwrites
    ///
    /// Returns whether the entry was warm.
    pub async fn upsert_if_warm(&self, domain: &Domain, family: AddressFamily, id: &str, ip: IpAddr) -> bool {
        match self.inner.write().await.get_mut(&(domain.clone(), family)) {
            Some(records) => {
                records.insert(id.to_string(), ip);
                true
            }
            None => false,
        }
    }

    /// Drop `id` if the entry is warm
    ///
    /// Returns whether the entry was warm.
    pub async fn remove_if_warm(&self, domain: &Domain, family: AddressFamily, id: &str) -> bool {
        match self.inner.write().await.get_mut(&(domain.clone(), family)) {
            Some(records) => {
                records.remove(id);
                true
            }
            None => false,
        }
    }

    /// Number of warm entries
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
