//! Types shared by the mapping cache and its callers.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::records::ApiError;

/// The two independently cached identifier categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheDomain {
    Company,
    Resource,
}

impl CacheDomain {
    pub const ALL: [CacheDomain; 2] = [CacheDomain::Company, CacheDomain::Resource];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheDomain::Company => "company",
            CacheDomain::Resource => "resource",
        }
    }
}

impl fmt::Display for CacheDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CacheDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "company" | "companies" => Ok(CacheDomain::Company),
            "resource" | "resources" => Ok(CacheDomain::Resource),
            other => Err(format!("unknown domain '{}' (expected company or resource)", other)),
        }
    }
}

/// What a refresh attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Entries replaced with this many names
    Refreshed(usize),
    /// Endpoint unsupported; domain marked fresh with zero entries
    Unsupported,
    /// Fetch failed; domain marked fresh, previous entries kept
    Failed,
    /// Another refresh was already running; nothing done
    InFlight,
    /// Domain was already fresh when the refresh slot was acquired
    AlreadyFresh,
}

/// Snapshot of one domain's cache.
#[derive(Debug, Clone)]
pub struct DomainStats {
    pub count: usize,
    pub last_refreshed: Option<DateTime<Utc>>,
    pub age: Option<Duration>,
    pub is_fresh: bool,
    pub refresh_in_flight: bool,
}

/// Snapshot of both domains.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub companies: DomainStats,
    pub resources: DomainStats,
}

/// Failure of a single name lookup seen by enrichment.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
    #[error("Lookup failed: {0}")]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_parse_and_display() {
        assert_eq!("company".parse::<CacheDomain>(), Ok(CacheDomain::Company));
        assert_eq!("Resources".parse::<CacheDomain>(), Ok(CacheDomain::Resource));
        assert!("ticket".parse::<CacheDomain>().is_err());
        assert_eq!(CacheDomain::Resource.to_string(), "resource");
    }
}
