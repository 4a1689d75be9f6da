//! The seam enrichment resolves names through.

use async_trait::async_trait;

use super::domain::{CacheDomain, LookupError};
use super::registry::MappingRegistry;
use super::service::MappingService;

/// Anything that can turn an id into a display name.
///
/// `Ok(None)` means "looked, no name"; `Err` means the lookup itself broke.
#[async_trait]
pub trait NameLookup: Send + Sync {
    async fn lookup_name(&self, domain: CacheDomain, id: i64) -> Result<Option<String>, LookupError>;
}

#[async_trait]
impl NameLookup for MappingService {
    async fn lookup_name(&self, domain: CacheDomain, id: i64) -> Result<Option<String>, LookupError> {
        Ok(self.get_name(domain, id).await)
    }
}

/// Resolves through the registry's service, creating it on first use.
#[async_trait]
impl NameLookup for MappingRegistry {
    async fn lookup_name(&self, domain: CacheDomain, id: i64) -> Result<Option<String>, LookupError> {
        let service = self.acquire();
        Ok(service.get_name(domain, id).await)
    }
}
