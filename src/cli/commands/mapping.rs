//! Name resolution and cache warm-up commands.

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::mapping::{CacheDomain, DomainStats, MappingConfig, MappingService};

use super::connect;

/// Resolve one id and print the name
///
/// Uses a standalone service with no background warm-up; the lookup
/// refreshes only the domain it needs.
pub fn cmd_resolve(rt: &Runtime, config: &Config, domain: CacheDomain, id: i64) -> anyhow::Result<()> {
    let service = MappingService::new(connect(config)?, MappingConfig::from(&config.mapping));

    let name = rt.block_on(service.get_name(domain, id));

    match name {
        Some(name) => println!("{} {}: {}", domain, id, name),
        None => {
            println!("{} {}: (no name found)", domain, id);
            std::process::exit(1);
        }
    }
    Ok(())
}

/// Load both caches and print their statistics
pub fn cmd_warm(rt: &Runtime, config: &Config) -> anyhow::Result<()> {
    let service = MappingService::new(connect(config)?, MappingConfig::from(&config.mapping));

    let stats = rt.block_on(async {
        service.preload().await;
        service.cache_stats()
    });

    println!("Mapping cache:");
    print_domain("Companies", &stats.companies);
    print_domain("Resources", &stats.resources);
    Ok(())
}

fn print_domain(label: &str, stats: &DomainStats) {
    let refreshed = stats
        .last_refreshed
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());
    println!(
        "  {:<10} {:>6} names  refreshed {}  {}",
        label,
        stats.count,
        refreshed,
        if stats.is_fresh { "fresh" } else { "stale" }
    );
}
