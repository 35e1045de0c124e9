//! Test doubles for handle contract tests
//!
//! A minimal in-memory `DnsHandle` and an `Auth` that builds it, counting
//! calls so tests can verify how callers use the traits.

#![allow(dead_code)]

use async_trait::async_trait;
use ddns_core::{
    AddressFamily, Auth, Diagnostics, DnsHandle, Domain, Error, Mutation, RecordMap, Result, Tag,
    Ttl,
};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records per (domain, family), with no zones and no network
#[derive(Default)]
pub struct InMemoryHandle {
    records: Mutex<HashMap<(Domain, AddressFamily), RecordMap>>,
    next_id: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub mutation_calls: AtomicUsize,
    pub flushes: AtomicUsize,
}

impl InMemoryHandle {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DnsHandle for InMemoryHandle {
    async fn list_records(
        &self,
        _diag: &dyn Diagnostics,
        domain: &Domain,
        family: AddressFamily,
    ) -> Result<RecordMap> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let records = self.records.lock().unwrap();
        Ok(records.get(&(domain.clone(), family)).cloned().unwrap_or_default())
    }

    async fn create_record(
        &self,
        diag: &dyn Diagnostics,
        domain: &Domain,
        family: AddressFamily,
        ip: IpAddr,
        _ttl: Ttl,
        _proxied: bool,
    ) -> Result<String> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if !family.matches(ip) {
            let message = format!("{} is not an {} address", ip, family);
            diag.warning(Tag::Impossible, &message);
            return Err(Error::invalid_input(message));
        }

        let id = format!("record{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.records
            .lock()
            .unwrap()
            .entry((domain.clone(), family))
            .or_default()
            .insert(id.clone(), ip);
        Ok(id)
    }

    async fn update_record(
        &self,
        diag: &dyn Diagnostics,
        domain: &Domain,
        family: AddressFamily,
        id: &str,
        ip: IpAddr,
    ) -> Result<()> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        match records.get_mut(&(domain.clone(), family)).and_then(|r| r.get_mut(id)) {
            Some(current) => {
                *current = ip;
                Ok(())
            }
            None => {
                diag.warning(Tag::Error, &format!("Record {} no longer exists", id));
                Err(Error::stale_record(Mutation::Update, domain.wire_name(), id, "not found"))
            }
        }
    }

    async fn delete_record(
        &self,
        diag: &dyn Diagnostics,
        domain: &Domain,
        family: AddressFamily,
        id: &str,
    ) -> Result<()> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        match records.get_mut(&(domain.clone(), family)).and_then(|r| r.remove(id)) {
            Some(_) => Ok(()),
            None => {
                diag.warning(Tag::Error, &format!("Record {} no longer exists", id));
                Err(Error::stale_record(Mutation::Delete, domain.wire_name(), id, "not found"))
            }
        }
    }

    fn flush_cache(&self) {
        self.flushes.fetch_add(1, Ordering::SeqCst);
    }
}

/// An `Auth` accepting exactly one token
pub struct StaticAuth {
    pub token: String,
    pub accepted: &'static str,
    pub handles_built: Arc<AtomicUsize>,
}

impl StaticAuth {
    pub fn new(token: &str, accepted: &'static str) -> Self {
        Self {
            token: token.to_string(),
            accepted,
            handles_built: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl Auth for StaticAuth {
    async fn new_handle(&self, diag: &dyn Diagnostics, _timeout: Duration) -> Result<Box<dyn DnsHandle>> {
        if self.token != self.accepted {
            diag.error(Tag::UserError, "The API token could not be verified");
            return Err(Error::auth("token rejected"));
        }
        self.handles_built.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemoryHandle::new()))
    }
}
