//! Pipeline entry points for crawler operations.
//!
//! - `run_crawler`: Crawl every configured site and export the results
//! - `run_validate`: Check configuration and selectors without crawling

pub mod crawl;
pub mod validate;

pub use crawl::{CrawlOrchestrator, run_crawler};
pub use validate::run_validate;
