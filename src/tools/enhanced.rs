//! Tool handler that adds company and resource names to results.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::catalog::{self, ToolSpec};
use super::handler::{ToolHandler, ToolResult};
use crate::enhance::Enhancer;
use crate::mapping::{CacheDomain, MappingRegistry};

/// Wraps [`ToolHandler`]: same tools, enriched output.
///
/// Enrichment works on the envelope value before it is encoded, so each
/// result is serialized exactly once. Error results pass through as-is.
pub struct EnhancedToolHandler {
    base: ToolHandler,
    registry: Arc<MappingRegistry>,
    enhancer: Enhancer,
}

impl EnhancedToolHandler {
    pub fn new(base: ToolHandler, registry: Arc<MappingRegistry>) -> Self {
        let enhancer = Enhancer::new(registry.clone());
        Self {
            base,
            registry,
            enhancer,
        }
    }

    pub fn list_tools(&self) -> &'static [ToolSpec] {
        self.base.list_tools()
    }

    pub async fn call_tool(&self, name: &str, args: &Value) -> ToolResult {
        match self.base.execute(name, args).await {
            Ok(envelope) => {
                if let Some(spec) = catalog::find(name) {
                    self.after_success(spec);
                }
                let enriched = self.enhancer.enrich(envelope).await;
                ToolResult::json(&enriched, false)
            }
            Err(e) => self.base.failure(name, args, &e),
        }
    }

    /// Company writes make cached company names suspect.
    fn after_success(&self, spec: &ToolSpec) {
        if !spec.writes_companies() {
            return;
        }
        if let Some(service) = self.registry.current() {
            debug!("{} succeeded, invalidating company names", spec.name);
            service.invalidate(CacheDomain::Company);
        }
    }
}
