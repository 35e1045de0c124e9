//! Normalized domain names
//!
//! A [`Domain`] is either a literal name (`sub.example.org`) or a wildcard
//! (`*.example.org`). Both variants carry a [`DomainName`]: lower-cased,
//! IDN labels converted to ASCII, no trailing dot, no empty labels.
//!
//! ```rust
//! use ddns_core::Domain;
//!
//! let domain: Domain = "*.Example.ORG.".parse().unwrap();
//! assert_eq!(domain.to_string(), "*.example.org");
//! assert_eq!(
//!     domain.zone_candidates().collect::<Vec<_>>(),
//!     vec!["example.org", "org"],
//! );
//! ```

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A normalized, dot-separated label sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainName(String);

impl DomainName {
    /// Normalize a user-supplied name
    ///
    /// Surrounding whitespace and a single trailing dot are removed, and each
    /// label is lower-cased and converted to its ASCII form.
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);

        if trimmed.is_empty() {
            return Err(Error::invalid_input("Domain name cannot be empty"));
        }

        let ascii = idna::domain_to_ascii(trimmed).map_err(|e| {
            Error::invalid_input(format!("Domain name {:?} is not valid: {:?}", raw, e))
        })?;

        if ascii.is_empty() || ascii.split('.').any(str::is_empty) {
            return Err(Error::invalid_input(format!(
                "Domain name {:?} has an empty label",
                raw
            )));
        }

        if ascii.split('.').any(|label| label == "*") {
            return Err(Error::invalid_input(format!(
                "Domain name {:?} has a misplaced wildcard label",
                raw
            )));
        }

        Ok(Self(ascii))
    }

    /// The normalized name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Labels from the leftmost (most specific) to the top-level label
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Every suffix of the name, starting with the full name and ending with
    /// the top-level label
    pub fn suffixes(&self) -> Suffixes<'_> {
        Suffixes {
            rest: Some(self.0.as_str()),
        }
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Iterator over the suffixes of a [`DomainName`]
#[derive(Debug, Clone)]
pub struct Suffixes<'a> {
    rest: Option<&'a str>,
}

impl<'a> Iterator for Suffixes<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let current = self.rest?;
        self.rest = current.split_once('.').map(|(_, tail)| tail);
        Some(current)
    }
}

/// A hostname whose address records are managed
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Domain {
    /// An ordinary name such as `sub.example.org`
    Literal(DomainName),
    /// `*.<apex>`; the carried name is the apex
    Wildcard(DomainName),
}

impl Domain {
    /// A literal domain
    pub fn literal(raw: &str) -> Result<Self> {
        Ok(Self::Literal(DomainName::new(raw)?))
    }

    /// A wildcard domain covering the children of `apex`
    pub fn wildcard(apex: &str) -> Result<Self> {
        Ok(Self::Wildcard(DomainName::new(apex)?))
    }

    /// Parse user input; a leading `*.` selects the wildcard form
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        match trimmed.strip_prefix("*.") {
            Some(apex) => Self::wildcard(apex),
            None => Self::literal(trimmed),
        }
    }

    /// The normalized name (the apex, for a wildcard)
    pub fn name(&self) -> &DomainName {
        match self {
            Domain::Literal(name) | Domain::Wildcard(name) => name,
        }
    }

    /// Whether this is the wildcard form
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Domain::Wildcard(_))
    }

    /// The record name sent to the provider
    pub fn wire_name(&self) -> String {
        match self {
            Domain::Literal(name) => name.0.clone(),
            Domain::Wildcard(apex) => format!("*.{}", apex.0),
        }
    }

    /// Zone names that could own this domain, most specific first
    ///
    /// The `*` label of a wildcard is never a candidate.
    pub fn zone_candidates(&self) -> Suffixes<'_> {
        self.name().suffixes()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Literal(name) => write!(f, "{}", name),
            Domain::Wildcard(apex) => write!(f, "*.{}", apex),
        }
    }
}

impl FromStr for Domain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
