//! Address families and their DNS record types

use std::fmt;
use std::net::{AddrParseError, IpAddr, Ipv4Addr, Ipv6Addr};

/// IP address family (v4 or v6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// The DNS record type holding addresses of this family
    pub fn record_type(self) -> &'static str {
        match self {
            AddressFamily::V4 => "A",
            AddressFamily::V6 => "AAAA",
        }
    }

    /// The family of an address
    pub fn of(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        }
    }

    /// Whether `ip` belongs to this family
    pub fn matches(self, ip: IpAddr) -> bool {
        Self::of(ip) == self
    }

    /// Parse record content strictly as an address of this family
    pub fn parse_addr(self, content: &str) -> Result<IpAddr, AddrParseError> {
        match self {
            AddressFamily::V4 => content.parse::<Ipv4Addr>().map(IpAddr::V4),
            AddressFamily::V6 => content.parse::<Ipv6Addr>().map(IpAddr::V6),
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AddressFamily::V4 => "IPv4",
            AddressFamily::V6 => "IPv6",
        })
    }
}
