//! Record time-to-live

use serde::{Deserialize, Serialize};
use std::fmt;

/// Time-to-live of a DNS record, in seconds
///
/// The value 1 asks the provider to choose the TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ttl(pub u32);

impl Ttl {
    /// Let the provider pick the TTL
    pub const AUTO: Ttl = Ttl(1);

    /// Whether this is [`Ttl::AUTO`]
    pub fn is_auto(self) -> bool {
        self == Self::AUTO
    }

    /// Seconds as sent on the wire
    pub fn seconds(self) -> u32 {
        self.0
    }
}

impl Default for Ttl {
    fn default() -> Self {
        Self::AUTO
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_auto() {
            write!(f, "{} (auto)", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Ttl::AUTO.to_string(), "1 (auto)");
        assert_eq!(Ttl(300).to_string(), "300");
    }

    #[test]
    fn test_serde_transparent() {
        assert_eq!(serde_json::to_string(&Ttl(120)).unwrap(), "120");
        let ttl: Ttl = serde_json::from_str("1").unwrap();
        assert!(ttl.is_auto());
    }
}
