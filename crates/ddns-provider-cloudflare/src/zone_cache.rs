//! Zone lookups memoized per zone name
//!
//! Each name maps to a cell that is either unpopulated or holds the full
//! (possibly empty) list of zones registered under that name. Failed
//! lookups leave the cell unpopulated, so a later lookup queries again.
//! Concurrent lookups of the same name share one in-flight query.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::client::{ApiClient, ApiError};
use crate::zone::{ZoneRecord, ZoneStatus};

/// Where zone lists come from on a cache miss
#[async_trait]
pub(crate) trait ZoneSource: Send + Sync {
    /// Every zone registered under exactly `name`, all pages included
    async fn fetch_zones(&self, name: &str) -> Result<Vec<ZoneRecord>, ApiError>;
}

#[async_trait]
impl ZoneSource for ApiClient {
    async fn fetch_zones(&self, name: &str) -> Result<Vec<ZoneRecord>, ApiError> {
        let zones = self.list_zones(name).await?;
        Ok(zones
            .into_iter()
            .map(|zone| ZoneRecord {
                status: ZoneStatus::classify(&zone.status),
                id: zone.id,
            })
            .collect())
    }
}

type Cell = Arc<OnceCell<Vec<ZoneRecord>>>;

/// Per-name memo of zone lookups
#[derive(Debug, Default)]
pub(crate) struct ZoneCache {
    // Never held across an await; the cells do the waiting.
    cells: Mutex<HashMap<String, Cell>>,
}

impl ZoneCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, HashMap<String, Cell>> {
        self.cells.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Zones registered under `name`
    ///
    /// Queries `source` only if `name` has not been looked up successfully
    /// since the last flush. The root name has no zones.
    pub async fn lookup(&self, source: &dyn ZoneSource, name: &str) -> Result<Vec<ZoneRecord>, ApiError> {
        if name.is_empty() {
            return Ok(Vec::new());
        }

        let cell = Arc::clone(self.guard().entry(name.to_string()).or_default());

        if let Some(zones) = cell.get() {
            debug!("Zone cache hit for {:?}", name);
            return Ok(zones.clone());
        }

        let zones = cell
            .get_or_try_init(|| async {
                debug!("Zone cache miss for {:?}, querying", name);
                source.fetch_zones(name).await
            })
            .await?;

        Ok(zones.clone())
    }

    /// Forget every lookup
    pub fn flush(&self) {
        let mut cells = self.guard();
        debug!("Flushing {} cached zone lookups", cells.len());
        cells.clear();
    }

    /// Number of names with a populated entry
    #[cfg(test)]
    pub fn populated(&self) -> usize {
        self.guard().values().filter(|cell| cell.initialized()).count()
    }
}
