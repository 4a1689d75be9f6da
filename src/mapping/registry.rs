//! Process-scoped holder for the mapping service.
//!
//! The binary builds exactly one [`MappingRegistry`] and hands it to whoever
//! needs names. The service inside is created on first [`acquire`], under a
//! mutex, so racing first callers all get the same instance. Creation does no
//! I/O; cache warm-up is spawned afterwards and never awaited.
//!
//! [`acquire`]: MappingRegistry::acquire

use std::sync::Arc;

use parking_lot::Mutex;

use super::service::{MappingConfig, MappingService};
use crate::records::RecordsApi;

pub struct MappingRegistry {
    api: Arc<dyn RecordsApi>,
    config: MappingConfig,
    slot: Mutex<Option<Arc<MappingService>>>,
}

impl MappingRegistry {
    pub fn new(api: Arc<dyn RecordsApi>, config: MappingConfig) -> Self {
        Self {
            api,
            config,
            slot: Mutex::new(None),
        }
    }

    /// Get the service, creating it (and kicking off warm-up) on first use.
    pub fn acquire(&self) -> Arc<MappingService> {
        let mut slot = self.slot.lock();
        if let Some(service) = slot.as_ref() {
            return Arc::clone(service);
        }

        tracing::debug!("Creating mapping service");
        let service = Arc::new(MappingService::new(
            Arc::clone(&self.api),
            self.config.clone(),
        ));
        if self.config.warm_up {
            service.spawn_warm_up();
        }
        *slot = Some(Arc::clone(&service));
        service
    }

    /// The service if it has been created, without creating it.
    pub fn current(&self) -> Option<Arc<MappingService>> {
        self.slot.lock().clone()
    }

    /// Drop the held service so the next `acquire` starts from scratch.
    ///
    /// Holders of the old `Arc` keep a working (but detached) instance.
    pub fn reset(&self) -> Option<Arc<MappingService>> {
        self.slot.lock().take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::CacheDomain;
    use crate::records::traits::mocks::MockRecords;
    use std::time::Duration;

    fn registry(mock: &Arc<MockRecords>, warm_up: bool) -> Arc<MappingRegistry> {
        Arc::new(MappingRegistry::new(
            mock.clone(),
            MappingConfig {
                warm_up,
                ..Default::default()
            },
        ))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_acquire_yields_one_instance() {
        let mock = Arc::new(
            MockRecords::new()
                .with_companies(&[(1, "Acme Co")])
                .with_latency(Duration::from_millis(20)),
        );
        let registry = registry(&mock, true);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.acquire() })
            })
            .collect();
        let services: Vec<_> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert!(services.iter().all(|s| Arc::ptr_eq(s, &services[0])));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(mock.calls().company_searches, 1);
        assert_eq!(mock.calls().resource_searches, 1);
    }

    #[tokio::test]
    async fn test_acquire_returns_before_warm_up_finishes() {
        let mock = Arc::new(
            MockRecords::new()
                .with_companies(&[(1, "Acme Co")])
                .with_latency(Duration::from_millis(200)),
        );
        let registry = registry(&mock, true);

        let service = registry.acquire();
        let stats = service.cache_stats();
        assert_eq!(stats.companies.count, 0);
        assert!(!stats.companies.is_fresh);
    }

    #[tokio::test]
    async fn test_current_and_reset() {
        let mock = Arc::new(MockRecords::new().with_companies(&[(1, "Acme Co")]));
        let registry = registry(&mock, false);
        assert!(registry.current().is_none());

        let first = registry.acquire();
        assert!(Arc::ptr_eq(&first, &registry.current().unwrap()));

        assert!(registry.reset().is_some());
        assert!(registry.current().is_none());

        let second = registry.acquire();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.get_name(CacheDomain::Company, 1).await.as_deref(), Some("Acme Co"));
    }

    #[test]
    fn test_acquire_without_runtime_skips_warm_up() {
        let mock = Arc::new(MockRecords::new());
        let registry = registry(&mock, true);

        let service = registry.acquire();
        assert_eq!(service.cache_stats().companies.count, 0);
        assert_eq!(mock.calls().mapping_calls(), 0);
    }
}
