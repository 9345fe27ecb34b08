// src/services/paginate.rs

//! Listing pagination for a single site.
//!
//! A site is paginated until a listing page yields no job links. An empty
//! listing page in the middle of the index cannot be told apart from the end,
//! so the crawl of that site simply stops there.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::Result;
use crate::models::{Config, CrawlerConfig, JobRecords, JobUrl, Site, SiteOutcome, SiteSummary};
use crate::services::{LinkDiscoverer, PageSource, RecordExtractor};

/// Pagination state of one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationState {
    /// Listing page `page` is next.
    Paginating { page: u32 },
    /// Terminal.
    Done(SiteOutcome),
}

/// Jobs and counters gathered from one site.
#[derive(Debug, Clone)]
pub struct SiteCrawl {
    pub summary: SiteSummary,
    pub jobs: Vec<JobRecords>,
}

impl SiteCrawl {
    fn new(site: &Site) -> Self {
        Self {
            summary: SiteSummary {
                site: site.name.clone(),
                pages_visited: 0,
                jobs_visited: 0,
                jobs_failed: 0,
                extraction_issues: 0,
                outcome: SiteOutcome::Exhausted,
            },
            jobs: Vec::new(),
        }
    }

    fn record(&mut self, job: JobRecords) {
        self.summary.jobs_visited += 1;
        self.summary.extraction_issues += job.issues.len();
        self.jobs.push(job);
    }
}

/// Spaces job fetch starts at least `delay` apart, across concurrent fetches.
struct Throttle {
    delay: Duration,
    next_start: Mutex<Option<Instant>>,
}

impl Throttle {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_start: Mutex::new(None),
        }
    }

    /// Wait for the next free slot and reserve it.
    async fn wait(&self) {
        if self.delay.is_zero() {
            return;
        }
        let mut next_start = self.next_start.lock().await;
        if let Some(at) = *next_start {
            tokio::time::sleep_until(at).await;
        }
        *next_start = Some(Instant::now() + self.delay);
    }
}

/// Drives one site from its first listing page to exhaustion.
pub struct PaginationDriver<'a> {
    source: &'a dyn PageSource,
    crawler: &'a CrawlerConfig,
    discoverer: LinkDiscoverer,
    extractor: RecordExtractor,
    throttle: Throttle,
}

impl<'a> PaginationDriver<'a> {
    pub fn new(source: &'a dyn PageSource, config: &'a Config) -> Result<Self> {
        Ok(Self {
            source,
            crawler: &config.crawler,
            discoverer: LinkDiscoverer::new(&config.selectors)?,
            extractor: RecordExtractor::new(&config.selectors)?,
            throttle: Throttle::new(Duration::from_millis(config.crawler.request_delay_ms)),
        })
    }

    /// Crawl `site` until it is exhausted, capped or aborted.
    ///
    /// Fetch errors end the site with [`SiteOutcome::Aborted`]; the jobs
    /// extracted before the error are kept.
    pub async fn crawl_site(&self, site: &Site) -> SiteCrawl {
        let mut crawl = SiteCrawl::new(site);
        let mut state = PaginationState::Paginating {
            page: self.crawler.start_page,
        };

        while let PaginationState::Paginating { page } = state {
            state = match self.step(site, page, &mut crawl).await {
                Ok(next) => next,
                Err(error) => {
                    log::error!("[{}] Aborted on page {}: {}", site.name, page, error);
                    PaginationState::Done(SiteOutcome::Aborted(error.to_string()))
                }
            };
        }

        if let PaginationState::Done(outcome) = state {
            crawl.summary.outcome = outcome;
        }
        crawl
    }

    /// Process listing page `page` and return the next state.
    async fn step(&self, site: &Site, page: u32, crawl: &mut SiteCrawl) -> Result<PaginationState> {
        if let Some(max_pages) = self.crawler.max_pages {
            if crawl.summary.pages_visited >= max_pages {
                log::info!("[{}] Page limit of {} reached", site.name, max_pages);
                return Ok(PaginationState::Done(SiteOutcome::PageLimit));
            }
        }

        let markup = self.source.fetch(&site.listing_page_url(page)).await?;
        crawl.summary.pages_visited += 1;

        let links = self.discoverer.discover_in(&markup, &site.base_url);
        log::info!("[{}] Page {}: {} job link(s)", site.name, page, links.len());
        if links.is_empty() {
            return Ok(PaginationState::Done(SiteOutcome::Exhausted));
        }

        self.visit_jobs(site, links, crawl).await?;
        match page.checked_add(1) {
            Some(next) => Ok(PaginationState::Paginating { page: next }),
            None => {
                log::warn!("[{}] Page {} is the last addressable page", site.name, page);
                Ok(PaginationState::Done(SiteOutcome::PageLimit))
            }
        }
    }

    /// Fetch and extract every job of one listing page, in listing order.
    async fn visit_jobs(&self, site: &Site, links: Vec<JobUrl>, crawl: &mut SiteCrawl) -> Result<()> {
        let mut pages = stream::iter(links)
            .map(|url| async move {
                self.throttle.wait().await;
                let result = self.source.fetch(url.as_str()).await;
                (url, result)
            })
            .buffered(self.crawler.max_concurrent.max(1));

        while let Some((url, result)) = pages.next().await {
            match result {
                Ok(markup) => {
                    let job = self.extractor.extract(&site.name, url, &markup);
                    log::info!(
                        "[{}] {}: {} perk(s), {} tool(s)",
                        site.name,
                        job.url,
                        job.perks.len(),
                        job.tools.len()
                    );
                    crawl.record(job);
                }
                Err(error) if self.crawler.skip_failed_jobs => {
                    crawl.summary.jobs_failed += 1;
                    log::warn!("[{}] Skipping {}: {}", site.name, url, error);
                }
                Err(error) => return Err(error),
            }
        }
        Ok(())
    }
}
