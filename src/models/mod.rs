// src/models/mod.rs

//! Domain models for the crawler application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod record;
mod result;
mod site;

// Re-export all public types
pub use config::{Config, CrawlerConfig, LoggingConfig, OutputConfig, SelectorConfig, SiteTemplate};
pub use record::{JobRecords, JobUrl, PerkRecord, ToolRecord};
pub use result::{CrawlResult, SiteOutcome, SiteSummary};
pub use site::Site;
