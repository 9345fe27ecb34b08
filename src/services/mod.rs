//! Service layer for the crawler application.
//!
//! This module contains the business logic for:
//! - Page fetching with retries (`HttpFetcher`)
//! - Job link discovery (`LinkDiscoverer`)
//! - Perk and tool extraction (`RecordExtractor`)
//! - Per-site pagination (`PaginationDriver`)

mod extract;
mod fetcher;
mod links;
mod paginate;
#[cfg(test)]
pub(crate) mod testing;

pub use extract::{Extracted, PERK_CATEGORY_DEPTH, RecordExtractor};
pub use fetcher::{HttpFetcher, PageSource, RetryPolicy, create_async_client};
pub use links::LinkDiscoverer;
pub use paginate::{PaginationDriver, PaginationState, SiteCrawl};
