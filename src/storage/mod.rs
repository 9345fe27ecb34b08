//! Storage abstractions for crawl results.
//!
//! ## Directory Structure
//!
//! ```text
//! output/
//! ├── results.json   # Full crawl result (jobs + site summaries)
//! ├── perks.csv      # job_index,site,job_url,name,category
//! └── tools.csv      # job_index,site,job_url,name,category
//! ```
//!
//! `job_index` is the position of the job in visitation order, which keeps
//! the two tables aligned per job page.

pub mod local;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::CrawlResult;

// Re-export for convenience
pub use local::LocalStorage;

/// Files produced by a write.
#[derive(Debug, Clone, Default)]
pub struct WriteSummary {
    pub files: Vec<PathBuf>,
    pub perk_rows: usize,
    pub tool_rows: usize,
}

/// Trait for crawl result storage backends.
#[async_trait]
pub trait ResultStorage: Send + Sync {
    /// Persist a complete crawl result.
    async fn write_results(&self, result: &CrawlResult) -> Result<WriteSummary>;
}
