//! Id-to-name mapping for companies and resources.
//!
//! - [`IdentifierCache`] - one domain's names, refresh stamp and single-flight flag
//! - [`MappingService`] - lookups with refresh-on-stale and per-domain fallback
//! - [`MappingRegistry`] - lazily creates the one service a process uses
//! - [`NameLookup`] - what enrichment depends on
//!
//! # Usage
//!
//! ```ignore
//! let registry = MappingRegistry::new(api, MappingConfig::default());
//! let service = registry.acquire(); // warm-up starts in the background
//! let name = service.company_name(100).await; // Some("Acme Co") or None
//! ```

pub mod cache;
pub mod domain;
pub mod registry;
pub mod service;
pub mod traits;

pub use cache::IdentifierCache;
pub use domain::{CacheDomain, CacheStats, DomainStats, LookupError, RefreshOutcome};
pub use registry::MappingRegistry;
pub use service::{MappingConfig, MappingService};
pub use traits::NameLookup;
