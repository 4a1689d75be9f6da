//! Test utilities and fixtures for autotask-mapper tests.
//!
//! Record builders for the payloads enrichment sees, plus [`StaticLookup`],
//! an in-memory [`NameLookup`] with scriptable failures.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{envelope, mock_ticket, StaticLookup};
//!
//! let lookup = StaticLookup::new().company(100, "Acme Co");
//! let payload = envelope(json!([mock_ticket(1, Some(100), None)]));
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::mapping::{CacheDomain, LookupError, NameLookup};
use crate::records::ApiError;

/// A ticket-like record with optional id fields.
///
/// Absent ids are left out of the record entirely.
pub fn mock_ticket(id: i64, company_id: Option<i64>, resource_id: Option<i64>) -> Value {
    let mut record = json!({
        "id": id,
        "title": format!("Ticket {}", id),
        "status": 1,
    });
    if let Some(company) = company_id {
        record["companyID"] = json!(company);
    }
    if let Some(resource) = resource_id {
        record["assignedResourceID"] = json!(resource);
    }
    record
}

/// `count` tickets with ids `1..=count`, all pointing at company 100 and resource 7.
pub fn mock_tickets(count: usize) -> Vec<Value> {
    (1..=count as i64)
        .map(|id| mock_ticket(id, Some(100), Some(7)))
        .collect()
}

/// Wrap data in the standard success envelope.
pub fn envelope(data: Value) -> Value {
    json!({
        "message": "Found records",
        "data": data,
        "timestamp": "2026-10-16T12:00:00.000Z",
    })
}

/// In-memory name lookup with call counting.
#[derive(Default)]
pub struct StaticLookup {
    names: HashMap<(CacheDomain, i64), String>,
    failing: HashSet<(CacheDomain, i64)>,
    panicking: HashSet<(CacheDomain, i64)>,
    calls: AtomicUsize,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// The usual fixture: company 100 = Acme Co, resource 7 = Ada Lovelace.
    pub fn acme() -> Self {
        Self::new().company(100, "Acme Co").resource(7, "Ada Lovelace")
    }

    pub fn company(mut self, id: i64, name: &str) -> Self {
        self.names.insert((CacheDomain::Company, id), name.to_string());
        self
    }

    pub fn resource(mut self, id: i64, name: &str) -> Self {
        self.names.insert((CacheDomain::Resource, id), name.to_string());
        self
    }

    /// Make lookups for this id return an error.
    pub fn failing(mut self, domain: CacheDomain, id: i64) -> Self {
        self.failing.insert((domain, id));
        self
    }

    /// Make lookups for this id panic.
    pub fn panicking(mut self, domain: CacheDomain, id: i64) -> Self {
        self.panicking.insert((domain, id));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NameLookup for StaticLookup {
    async fn lookup_name(&self, domain: CacheDomain, id: i64) -> Result<Option<String>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panicking.contains(&(domain, id)) {
            panic!("lookup exploded for {} {}", domain, id);
        }
        if self.failing.contains(&(domain, id)) {
            return Err(LookupError::Api(ApiError::Network("connection reset".to_string())));
        }
        Ok(self.names.get(&(domain, id)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_ticket_omits_absent_ids() {
        let ticket = mock_ticket(3, Some(100), None);
        assert_eq!(ticket["companyID"], 100);
        assert!(ticket.get("assignedResourceID").is_none());
    }

    #[test]
    fn test_mock_tickets_numbering() {
        let tickets = mock_tickets(3);
        assert_eq!(tickets.len(), 3);
        assert_eq!(tickets[2]["id"], 3);
    }

    #[tokio::test]
    async fn test_static_lookup() {
        let lookup = StaticLookup::acme().failing(CacheDomain::Resource, 13);
        assert_eq!(
            lookup.lookup_name(CacheDomain::Company, 100).await.unwrap().as_deref(),
            Some("Acme Co")
        );
        assert_eq!(lookup.lookup_name(CacheDomain::Company, 1).await.unwrap(), None);
        assert!(lookup.lookup_name(CacheDomain::Resource, 13).await.is_err());
        assert_eq!(lookup.calls(), 3);
    }
}
