//! Mapping service - resolves company and resource ids to display names.
//!
//! One [`IdentifierCache`] per domain, refreshed from the records API when
//! stale. Lookups never fail: every problem below this layer turns into a log
//! line and an absent name.
//!
//! Refresh rules:
//! - A lookup refreshes only the domain it asks about.
//! - At most one refresh per domain runs at a time. A caller that finds one
//!   running returns straight away and reads whatever the cache holds.
//! - Every finished refresh stamps the domain, including failed ones, so a
//!   broken endpoint is retried once per TTL window rather than per lookup.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::cache::IdentifierCache;
use super::domain::{CacheDomain, CacheStats, RefreshOutcome};
use crate::config::MappingSettings;
use crate::records::{RecordsApi, SearchFilter};

/// Configuration for the mapping service
#[derive(Debug, Clone)]
pub struct MappingConfig {
    /// Age after which a domain's names are refreshed
    pub cache_ttl: Duration,
    /// Companies requested per refresh
    pub company_page_size: u32,
    /// Resources requested per refresh
    pub resource_page_size: u32,
    /// Fill both caches in the background once the service is created
    pub warm_up: bool,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self::from(&MappingSettings::default())
    }
}

impl From<&MappingSettings> for MappingConfig {
    fn from(settings: &MappingSettings) -> Self {
        Self {
            cache_ttl: settings.cache_ttl(),
            company_page_size: settings.company_page_size,
            resource_page_size: settings.resource_page_size,
            warm_up: settings.warm_up,
        }
    }
}

/// Id -> name resolver backed by per-domain caches
pub struct MappingService {
    api: Arc<dyn RecordsApi>,
    config: MappingConfig,
    companies: IdentifierCache,
    resources: IdentifierCache,
}

impl MappingService {
    /// Create a service with empty caches. Nothing is fetched until asked.
    pub fn new(api: Arc<dyn RecordsApi>, config: MappingConfig) -> Self {
        Self {
            api,
            config,
            companies: IdentifierCache::new(CacheDomain::Company),
            resources: IdentifierCache::new(CacheDomain::Resource),
        }
    }

    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    fn cache(&self, domain: CacheDomain) -> &IdentifierCache {
        match domain {
            CacheDomain::Company => &self.companies,
            CacheDomain::Resource => &self.resources,
        }
    }

    /// Resolve an id to its display name.
    ///
    /// Refreshes the domain first if it is stale (unless another refresh is
    /// already running). Company misses return `None`; resource misses fall
    /// back to one direct fetch when the resource cache is populated.
    pub async fn get_name(&self, domain: CacheDomain, id: i64) -> Option<String> {
        self.refresh_if_stale(domain).await;

        let cache = self.cache(domain);
        if let Some(name) = cache.lookup(id) {
            return Some(name);
        }

        match domain {
            CacheDomain::Company => {
                // No per-id fallback for companies: keeps call volume bounded
                debug!("Company {} not in cache, returning none", id);
                None
            }
            CacheDomain::Resource => self.lookup_resource_directly(id).await,
        }
    }

    pub async fn company_name(&self, id: i64) -> Option<String> {
        self.get_name(CacheDomain::Company, id).await
    }

    pub async fn resource_name(&self, id: i64) -> Option<String> {
        self.get_name(CacheDomain::Resource, id).await
    }

    /// Resolve several company ids; results line up with `ids`.
    pub async fn company_names(&self, ids: &[i64]) -> Vec<Option<String>> {
        futures::future::join_all(ids.iter().map(|id| self.company_name(*id))).await
    }

    /// Resolve several resource ids; results line up with `ids`.
    pub async fn resource_names(&self, ids: &[i64]) -> Vec<Option<String>> {
        futures::future::join_all(ids.iter().map(|id| self.resource_name(*id))).await
    }

    async fn lookup_resource_directly(&self, id: i64) -> Option<String> {
        if self.resources.is_empty() {
            // Empty cache means the capability is missing, not just this id
            debug!("Resource {} not found - resource names unavailable", id);
            return None;
        }

        debug!("Resource {} not in cache, attempting direct lookup", id);
        match self.api.get_resource(id).await {
            Ok(Some(record)) => {
                self.resources.insert(id, record.name.clone());
                Some(record.name)
            }
            Ok(None) => {
                debug!("Resource {} has no usable name", id);
                None
            }
            Err(e) => {
                debug!("Direct resource lookup failed for {}: {}", id, e);
                None
            }
        }
    }

    /// Refresh the domain if it is stale. Returns immediately if a refresh
    /// is already running.
    pub async fn refresh_if_stale(&self, domain: CacheDomain) -> RefreshOutcome {
        if !self.cache(domain).is_stale(self.config.cache_ttl) {
            return RefreshOutcome::AlreadyFresh;
        }
        self.run_refresh(domain, true).await
    }

    /// Refresh the domain unconditionally (still single-flight).
    pub async fn refresh(&self, domain: CacheDomain) -> RefreshOutcome {
        self.run_refresh(domain, false).await
    }

    async fn run_refresh(&self, domain: CacheDomain, only_if_stale: bool) -> RefreshOutcome {
        let cache = self.cache(domain);
        let Some(_guard) = cache.try_begin_refresh() else {
            debug!("{} cache refresh already in progress, skipping", domain);
            return RefreshOutcome::InFlight;
        };

        // A refresh may have finished between the staleness check and the claim
        if only_if_stale && !cache.is_stale(self.config.cache_ttl) {
            return RefreshOutcome::AlreadyFresh;
        }

        info!("Refreshing {} cache...", domain);
        let fetched = match domain {
            CacheDomain::Company => {
                let filter = SearchFilter::with_page_size(self.config.company_page_size);
                self.api.search_companies(&filter).await
            }
            CacheDomain::Resource => {
                let filter = SearchFilter::with_page_size(self.config.resource_page_size);
                self.api.search_resources(&filter).await
            }
        };

        match fetched {
            Ok(records) => {
                let count = cache.replace_all(records);
                info!("{} cache refreshed with {} entries", domain, count);
                RefreshOutcome::Refreshed(count)
            }
            Err(e) if domain == CacheDomain::Resource && e.is_unsupported() => {
                warn!(
                    "Resources endpoint not available ({}) - resource name mapping disabled until next refresh window",
                    e
                );
                cache.replace_all(Vec::new());
                RefreshOutcome::Unsupported
            }
            Err(e) => {
                error!("Failed to refresh {} cache: {}", domain, e);
                cache.mark_refreshed();
                RefreshOutcome::Failed
            }
        }
    }

    /// Refresh both domains concurrently and wait for them.
    pub async fn preload(&self) {
        info!("Preloading mapping caches...");
        let (companies, resources) = futures::future::join(
            self.refresh(CacheDomain::Company),
            self.refresh(CacheDomain::Resource),
        )
        .await;
        info!(
            "Mapping caches preloaded: companies={:?} ({} entries), resources={:?} ({} entries)",
            companies,
            self.companies.len(),
            resources,
            self.resources.len()
        );
    }

    /// Start [`preload`](Self::preload) on the current runtime without waiting.
    pub fn spawn_warm_up(self: &Arc<Self>) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let service = Arc::clone(self);
                handle.spawn(async move { service.preload().await });
            }
            Err(_) => {
                warn!("No async runtime available, mapping caches will fill on first lookup");
            }
        }
    }

    /// Mark a domain stale so the next lookup refetches it.
    pub fn invalidate(&self, domain: CacheDomain) {
        debug!("{} cache invalidated", domain);
        self.cache(domain).invalidate();
    }

    /// Drop one domain's names and refresh stamp.
    pub fn clear_domain(&self, domain: CacheDomain) {
        self.cache(domain).clear();
        info!("{} cache cleared", domain);
    }

    /// Drop both domains' names and refresh stamps.
    pub fn clear_cache(&self) {
        for domain in CacheDomain::ALL {
            self.cache(domain).clear();
        }
        info!("Mapping cache cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            companies: self.companies.stats(self.config.cache_ttl),
            resources: self.resources.stats(self.config.cache_ttl),
        }
    }
}
