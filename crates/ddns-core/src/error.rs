//! Error types for the DDNS handles
//!
//! Every failure a handle can report is one of these variants. Handles
//! never retry and never panic; each operation returns exactly one of
//! these after emitting its diagnostic message.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which record mutation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Mutation::Create => "create",
            Mutation::Update => "update",
            Mutation::Delete => "delete",
        })
    }
}

/// Core error type for the DDNS handles
#[derive(Error, Debug)]
pub enum Error {
    /// The API token is empty, rejected, or not active
    #[error("Authentication failed: {0}")]
    AuthInvalid(String),

    /// Transport or decode error while querying zones by name
    #[error("Zone lookup for {zone:?} failed: {message}")]
    ZoneLookupFailed {
        /// The zone name that was queried
        zone: String,
        /// Underlying cause
        message: String,
    },

    /// More than one eligible zone is registered under one name
    #[error("Multiple eligible zones named {0:?}")]
    ZoneAmbiguous(String),

    /// No eligible zone owns the domain
    #[error("No zone found for {0:?}")]
    ZoneNotFound(String),

    /// A listed record holds content that is not an address of the requested family
    #[error("Unparseable address in records of {domain:?}: {message}")]
    RecordParseFailed {
        /// Wire name of the domain
        domain: String,
        /// Parser error
        message: String,
    },

    /// Listing records failed
    #[error("Listing records of {domain:?} failed: {message}")]
    RecordListFailed {
        /// Wire name of the domain
        domain: String,
        /// Underlying cause
        message: String,
    },

    /// Creating, updating or deleting a record failed
    #[error("Failed to {op} record of {domain:?}: {message}")]
    RecordMutationFailed {
        /// The attempted mutation
        op: Mutation,
        /// Wire name of the domain
        domain: String,
        /// Underlying cause
        message: String,
    },

    /// The provider no longer knows the targeted record
    #[error("Failed to {op} record {id} of {domain:?}: record no longer exists ({message})")]
    StaleRecord {
        /// The attempted mutation
        op: Mutation,
        /// Wire name of the domain
        domain: String,
        /// Record ID rejected by the provider
        id: String,
        /// Underlying cause
        message: String,
    },

    /// HTTP transport errors outside of record and zone operations
    #[error("HTTP error: {0}")]
    Http(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::AuthInvalid(msg.into())
    }

    /// Create a zone lookup error
    pub fn zone_lookup(zone: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ZoneLookupFailed {
            zone: zone.into(),
            message: message.into(),
        }
    }

    /// Create a record parse error
    pub fn record_parse(domain: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordParseFailed {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a record listing error
    pub fn record_list(domain: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordListFailed {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a record mutation error
    pub fn mutation(op: Mutation, domain: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordMutationFailed {
            op,
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a stale record error
    pub fn stale_record(
        op: Mutation,
        domain: impl Into<String>,
        id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::StaleRecord {
            op,
            domain: domain.into(),
            id: id.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this is the stale variant of a failed mutation
    pub fn is_stale_record(&self) -> bool {
        matches!(self, Self::StaleRecord { .. })
    }

    /// Whether zone resolution, rather than the record operation itself, failed
    pub fn is_zone_error(&self) -> bool {
        matches!(
            self,
            Self::ZoneLookupFailed { .. } | Self::ZoneAmbiguous(_) | Self::ZoneNotFound(_)
        )
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_record_display() {
        let err = Error::stale_record(Mutation::Delete, "sub.test.org", "record1", "HTTP 404");
        assert!(err.is_stale_record());
        assert_eq!(
            err.to_string(),
            "Failed to delete record record1 of \"sub.test.org\": record no longer exists (HTTP 404)"
        );
    }

    #[test]
    fn test_zone_error_classification() {
        assert!(Error::ZoneAmbiguous("test.org".into()).is_zone_error());
        assert!(Error::ZoneNotFound("test.org".into()).is_zone_error());
        assert!(Error::zone_lookup("test.org", "timeout").is_zone_error());
        assert!(!Error::record_list("test.org", "timeout").is_zone_error());
    }

    #[test]
    fn test_from_anyhow() {
        let err: Error = anyhow::anyhow!("boom").into();
        assert!(matches!(err, Error::Other(ref m) if m == "boom"));
    }
}
