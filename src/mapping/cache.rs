//! Per-domain id -> name cache.
//!
//! Holds the names from the last fetch, when that fetch finished, and a
//! single-flight flag. The flag only decides whether a new refresh may
//! start; nobody ever waits on it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::domain::{CacheDomain, DomainStats};
use crate::records::NamedRecord;

/// When a domain last finished refreshing (monotonic + wall clock for display).
#[derive(Debug, Clone, Copy)]
struct RefreshStamp {
    at: Instant,
    wall: DateTime<Utc>,
}

impl RefreshStamp {
    fn now() -> Self {
        Self {
            at: Instant::now(),
            wall: Utc::now(),
        }
    }
}

/// Cached names for one domain.
pub struct IdentifierCache {
    domain: CacheDomain,
    entries: RwLock<HashMap<i64, String>>,
    last_refreshed: RwLock<Option<RefreshStamp>>,
    refreshing: AtomicBool,
}

/// Holds a domain's refresh slot; releases it on drop (including unwinds).
pub struct RefreshGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl IdentifierCache {
    pub fn new(domain: CacheDomain) -> Self {
        Self {
            domain,
            entries: RwLock::new(HashMap::new()),
            last_refreshed: RwLock::new(None),
            refreshing: AtomicBool::new(false),
        }
    }

    pub fn domain(&self) -> CacheDomain {
        self.domain
    }

    pub fn lookup(&self, id: i64) -> Option<String> {
        self.entries.read().get(&id).cloned()
    }

    /// Add or overwrite one name without touching the refresh stamp.
    pub fn insert(&self, id: i64, name: impl Into<String>) {
        self.entries.write().insert(id, name.into());
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Stale when never refreshed or when the last refresh is at least `ttl` old.
    pub fn is_stale(&self, ttl: Duration) -> bool {
        match *self.last_refreshed.read() {
            Some(stamp) => stamp.at.elapsed() >= ttl,
            None => true,
        }
    }

    /// Swap in a fresh set of names and stamp the domain as refreshed.
    ///
    /// Returns the number of entries now held.
    pub fn replace_all(&self, records: impl IntoIterator<Item = NamedRecord>) -> usize {
        let fresh: HashMap<i64, String> = records
            .into_iter()
            .filter(|r| !r.name.is_empty())
            .map(|r| (r.id, r.name))
            .collect();
        let count = fresh.len();
        *self.entries.write() = fresh;
        self.mark_refreshed();
        count
    }

    /// Stamp the domain as refreshed without changing its entries.
    pub fn mark_refreshed(&self) {
        *self.last_refreshed.write() = Some(RefreshStamp::now());
    }

    /// Force the next lookup to refresh, keeping current entries servable.
    pub fn invalidate(&self) {
        *self.last_refreshed.write() = None;
    }

    /// Drop all entries and forget the last refresh.
    pub fn clear(&self) {
        self.entries.write().clear();
        *self.last_refreshed.write() = None;
    }

    /// Claim the refresh slot. `None` if a refresh is already running.
    pub fn try_begin_refresh(&self) -> Option<RefreshGuard<'_>> {
        self.refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshGuard {
                flag: &self.refreshing,
            })
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    pub fn stats(&self, ttl: Duration) -> DomainStats {
        let stamp = *self.last_refreshed.read();
        DomainStats {
            count: self.len(),
            last_refreshed: stamp.map(|s| s.wall),
            age: stamp.map(|s| s.at.elapsed()),
            is_fresh: !self.is_stale(ttl),
            refresh_in_flight: self.is_refreshing(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(1800);

    #[test]
    fn test_new_cache_is_stale_and_empty() {
        let cache = IdentifierCache::new(CacheDomain::Company);
        assert!(cache.is_stale(TTL));
        assert!(cache.is_empty());
        assert_eq!(cache.lookup(1), None);
    }

    #[test]
    fn test_replace_all_marks_fresh() {
        let cache = IdentifierCache::new(CacheDomain::Company);
        cache.insert(99, "Old Name");

        let count = cache.replace_all(vec![
            NamedRecord::new(100, "Acme Co"),
            NamedRecord::new(101, ""),
        ]);

        assert_eq!(count, 1);
        assert_eq!(cache.lookup(100).as_deref(), Some("Acme Co"));
        assert_eq!(cache.lookup(99), None);
        assert!(!cache.is_stale(TTL));
    }

    #[test]
    fn test_zero_ttl_is_always_stale() {
        let cache = IdentifierCache::new(CacheDomain::Resource);
        cache.mark_refreshed();
        assert!(cache.is_stale(Duration::ZERO));
        assert!(!cache.is_stale(TTL));
    }

    #[test]
    fn test_invalidate_keeps_entries() {
        let cache = IdentifierCache::new(CacheDomain::Company);
        cache.replace_all(vec![NamedRecord::new(1, "Acme Co")]);
        cache.invalidate();
        assert!(cache.is_stale(TTL));
        assert_eq!(cache.lookup(1).as_deref(), Some("Acme Co"));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_refresh_slot_is_single_flight() {
        let cache = IdentifierCache::new(CacheDomain::Resource);

        let guard = cache.try_begin_refresh();
        assert!(guard.is_some());
        assert!(cache.is_refreshing());
        assert!(cache.try_begin_refresh().is_none());

        drop(guard);
        assert!(!cache.is_refreshing());
        assert!(cache.try_begin_refresh().is_some());
    }

    #[test]
    fn test_stats_snapshot() {
        let cache = IdentifierCache::new(CacheDomain::Company);
        let before = cache.stats(TTL);
        assert_eq!(before.count, 0);
        assert!(before.last_refreshed.is_none());
        assert!(!before.is_fresh);

        cache.replace_all(vec![NamedRecord::new(1, "Acme Co")]);
        let after = cache.stats(TTL);
        assert_eq!(after.count, 1);
        assert!(after.last_refreshed.is_some());
        assert!(after.is_fresh);
        assert!(!after.refresh_in_flight);
    }
}
