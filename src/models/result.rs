//! Accumulated output of a crawl run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{JobRecords, PerkRecord, ToolRecord};

/// How pagination of one site ended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SiteOutcome {
    /// A listing page without job links was reached
    Exhausted,
    /// The configured page cap was reached
    PageLimit,
    /// A fetch error stopped the site
    Aborted(String),
}

/// Counters for one site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteSummary {
    pub site: String,
    pub pages_visited: u32,
    pub jobs_visited: usize,
    pub jobs_failed: usize,
    pub extraction_issues: usize,
    pub outcome: SiteOutcome,
}

/// Jobs visited by a run, in visitation order across all sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub sites: Vec<SiteSummary>,
    pub jobs: Vec<JobRecords>,
}

impl CrawlResult {
    /// Perk lists, one per visited job page.
    pub fn perks(&self) -> impl Iterator<Item = &[PerkRecord]> {
        self.jobs.iter().map(|job| job.perks.as_slice())
    }

    /// Tool lists, one per visited job page, aligned with [`CrawlResult::perks`].
    pub fn tools(&self) -> impl Iterator<Item = &[ToolRecord]> {
        self.jobs.iter().map(|job| job.tools.as_slice())
    }

    pub fn perk_count(&self) -> usize {
        self.jobs.iter().map(|job| job.perks.len()).sum()
    }

    pub fn tool_count(&self) -> usize {
        self.jobs.iter().map(|job| job.tools.len()).sum()
    }

    /// Sites that stopped on a fetch error.
    pub fn aborted_sites(&self) -> impl Iterator<Item = &SiteSummary> {
        self.sites
            .iter()
            .filter(|s| matches!(s.outcome, SiteOutcome::Aborted(_)))
    }
}
