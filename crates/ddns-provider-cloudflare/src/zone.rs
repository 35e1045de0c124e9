//! Zone status classification and zone resolution
//!
//! Resolution walks the candidate names of a domain from the most specific
//! to the top-level label. The first candidate with exactly one eligible
//! zone wins; a candidate with two or more eligible zones ends the search
//! with an ambiguity error.

use ddns_core::{Diagnostics, Domain, Error, Result, Tag};
use tracing::debug;

use crate::zone_cache::{ZoneCache, ZoneSource};

/// Status of a zone, as far as record management is concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneStatus {
    /// Fully set up
    Active,
    /// Usable, but activation has not finished ("pending", "initializing")
    Degraded(String),
    /// A status string this crate does not know; treated as usable
    Undocumented(String),
    /// Deleted; never usable
    Removed,
}

impl ZoneStatus {
    /// Classify the raw status string reported by the API
    pub fn classify(raw: &str) -> Self {
        match raw {
            "active" => ZoneStatus::Active,
            "pending" | "initializing" => ZoneStatus::Degraded(raw.to_string()),
            "deleted" => ZoneStatus::Removed,
            other => ZoneStatus::Undocumented(other.to_string()),
        }
    }

    /// Whether a zone in this status may own records
    pub fn is_eligible(&self) -> bool {
        !matches!(self, ZoneStatus::Removed)
    }
}

/// One zone registered under a queried name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRecord {
    pub id: String,
    pub status: ZoneStatus,
}

/// Finds the zone owning a domain, using a [`ZoneCache`] in front of a
/// [`ZoneSource`]
pub(crate) struct ZoneResolver<'a> {
    cache: &'a ZoneCache,
    source: &'a dyn ZoneSource,
}

impl<'a> ZoneResolver<'a> {
    pub fn new(cache: &'a ZoneCache, source: &'a dyn ZoneSource) -> Self {
        Self { cache, source }
    }

    /// ID of the single eligible zone owning `domain`
    pub async fn resolve(&self, diag: &dyn Diagnostics, domain: &Domain) -> Result<String> {
        for candidate in domain.zone_candidates() {
            let zones = match self.cache.lookup(self.source, candidate).await {
                Ok(zones) => zones,
                Err(err) => {
                    diag.warning(
                        Tag::Error,
                        &format!(
                            "Failed to check the existence of a zone named {:?}: {}",
                            candidate, err
                        ),
                    );
                    return Err(Error::zone_lookup(candidate, err.to_string()));
                }
            };

            let mut eligible = Vec::with_capacity(zones.len());
            for zone in zones {
                if zone.status.is_eligible() {
                    eligible.push(zone);
                } else {
                    diag.info(
                        Tag::Warning,
                        &format!("Zone {:?} is \"deleted\" and thus skipped", candidate),
                    );
                }
            }

            match eligible.len() {
                0 => continue,
                1 => {
                    let zone = eligible.remove(0);
                    warn_about_status(diag, candidate, &zone.status);
                    debug!("Zone of {} is {:?} (ID {})", domain, candidate, zone.id);
                    return Ok(zone.id);
                }
                _ => {
                    diag.warning(
                        Tag::Impossible,
                        &format!(
                            "Found multiple active zones named {:?}. Specifying CF_ACCOUNT_ID might help",
                            candidate
                        ),
                    );
                    return Err(Error::ZoneAmbiguous(candidate.to_string()));
                }
            }
        }

        diag.warning(Tag::Error, &format!("Failed to find the zone of {:?}", domain.wire_name()));
        Err(Error::ZoneNotFound(domain.wire_name()))
    }
}

fn warn_about_status(diag: &dyn Diagnostics, name: &str, status: &ZoneStatus) {
    match status {
        ZoneStatus::Active | ZoneStatus::Removed => {}
        ZoneStatus::Degraded(raw) => {
            diag.warning(
                Tag::Warning,
                &format!("Zone {:?} is {:?}; your Cloudflare setup is incomplete", name, raw),
            );
            diag.warning(Tag::Warning, "Some features might stop working");
        }
        ZoneStatus::Undocumented(raw) => {
            diag.warning(
                Tag::Impossible,
                &format!("Zone {:?} is in an undocumented status {:?}", name, raw),
            );
            diag.warning(Tag::Impossible, "Please report this status to the maintainers");
        }
    }
}
