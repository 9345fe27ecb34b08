// src/pipeline/crawl.rs

//! Job board crawling pipeline.

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{Config, CrawlResult, Site, SiteOutcome};
use crate::services::{HttpFetcher, PageSource, PaginationDriver};
use crate::storage::ResultStorage;
use crate::utils::log;

/// Runs every site to completion, one after another, and accumulates the jobs.
pub struct CrawlOrchestrator<'a> {
    driver: PaginationDriver<'a>,
}

impl<'a> CrawlOrchestrator<'a> {
    pub fn new(source: &'a dyn PageSource, config: &'a Config) -> Result<Self> {
        Ok(Self {
            driver: PaginationDriver::new(source, config)?,
        })
    }

    /// Crawl `sites` in order.
    ///
    /// A site that aborts is reported in its summary and the next site still
    /// runs. Only an empty site list is an error.
    pub async fn run(&self, sites: &[Site]) -> Result<CrawlResult> {
        if sites.is_empty() {
            return Err(AppError::config("No sites to crawl"));
        }

        let started_at = Utc::now();
        let mut summaries = Vec::with_capacity(sites.len());
        let mut jobs = Vec::new();

        for (index, site) in sites.iter().enumerate() {
            log::header(&format!(
                "Site {}/{}: {} ({})",
                index + 1,
                sites.len(),
                site.name,
                site.listing_url
            ));
            let crawl = self.driver.crawl_site(site).await;
            jobs.extend(crawl.jobs);
            summaries.push(crawl.summary);
        }

        Ok(CrawlResult {
            started_at,
            finished_at: Utc::now(),
            sites: summaries,
            jobs,
        })
    }
}

/// Crawl `sites` over HTTP, report, and export when a storage is given.
pub async fn run_crawler(
    config: &Config,
    sites: &[Site],
    storage: Option<&dyn ResultStorage>,
) -> Result<CrawlResult> {
    let fetcher = HttpFetcher::from_config(&config.crawler)?;
    let result = CrawlOrchestrator::new(&fetcher, config)?.run(sites).await?;

    report(&result);

    if let Some(storage) = storage {
        let written = storage.write_results(&result).await?;
        for path in &written.files {
            log::sub_item(&format!("Wrote {}", path.display()));
        }
    }

    Ok(result)
}

fn report(result: &CrawlResult) {
    for site in &result.sites {
        let outcome = match &site.outcome {
            SiteOutcome::Exhausted => "exhausted".to_string(),
            SiteOutcome::PageLimit => "page limit".to_string(),
            SiteOutcome::Aborted(error) => format!("aborted: {error}"),
        };
        log::summary(
            &site.site,
            &[
                ("Pages", site.pages_visited.to_string()),
                ("Jobs", site.jobs_visited.to_string()),
                ("Failed jobs", site.jobs_failed.to_string()),
                ("Skipped elements", site.extraction_issues.to_string()),
                ("Outcome", outcome),
            ],
        );
    }

    let elapsed = result.finished_at - result.started_at;
    log::summary(
        "Crawl",
        &[
            ("Sites", result.sites.len().to_string()),
            ("Jobs", result.jobs.len().to_string()),
            ("Perks", result.perk_count().to_string()),
            ("Tools", result.tool_count().to_string()),
            ("Elapsed", format!("{}s", elapsed.num_seconds())),
        ],
    );

    for site in result.aborted_sites() {
        log::error(&format!("Site {} did not finish", site.site));
    }
}
