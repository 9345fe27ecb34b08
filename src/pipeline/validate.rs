// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::Config;
use crate::services::{LinkDiscoverer, RecordExtractor};
use crate::utils::log;

/// Validate configuration and compile the page selectors.
pub fn run_validate(config: &Config) -> Result<()> {
    log::header("Validating configuration");

    if let Err(e) = config
        .validate()
        .and_then(|_| LinkDiscoverer::new(&config.selectors))
        .and_then(|_| RecordExtractor::new(&config.selectors))
    {
        log::error(&format!("Validation failed: {e}"));
        return Err(e);
    }

    let sites = config.resolved_sites();
    ::log::info!("✓ Config OK");
    log::sub_item(&format!("User agent: {}", config.crawler.user_agent));
    log::sub_item(&format!(
        "Timeouts: {}s total, {}s connect",
        config.crawler.timeout_secs, config.crawler.connect_timeout_secs
    ));
    log::sub_item(&format!(
        "Retries: {} (backoff base {}ms)",
        config.crawler.max_retries, config.crawler.backoff_base_ms
    ));
    log::sub_item(&format!("Sites: {}", sites.len()));
    for site in &sites {
        log::sub_item(&format!("  {} -> {}", site.name, site.listing_page_url(0)));
    }
    Ok(())
}
