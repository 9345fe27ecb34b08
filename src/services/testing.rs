//! Canned pages for crawl tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Config, Site};
use crate::services::PageSource;

/// In-memory page source that records every URL it is asked for.
#[derive(Default)]
pub struct CannedSource {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    fetched: Mutex<Vec<String>>,
}

impl CannedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, markup: String) -> Self {
        self.pages.insert(url.to_string(), markup);
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for CannedSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.fetched.lock().unwrap().push(url.to_string());
        if self.failing.contains(url) {
            return Err(AppError::fetch(url, 4, "connection refused"));
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::fetch(url, 1, "no canned page"))
    }
}

pub fn test_site() -> Site {
    Site {
        name: "test".to_string(),
        base_url: "https://jobs.test".to_string(),
        listing_url: "https://jobs.test/jobs?page=".to_string(),
    }
}

/// Default config without templated cities.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.site_template.cities.clear();
    config.sites.push(test_site());
    config
}

/// Listing page linking to `hrefs`, plus navigation links that never match.
pub fn listing_page(hrefs: &[&str]) -> String {
    let jobs: String = hrefs
        .iter()
        .map(|href| format!(r#"<li><a href="{href}">Job</a></li>"#))
        .collect();
    format!(
        r#"<html><body><a href="/companies">Companies</a><ul>{jobs}</ul><a>Load more</a></body></html>"#
    )
}

/// Job page with one perk and one tool.
pub fn job_page(perk: &str, tool: &str) -> String {
    format!(
        r#"<html><body>
        <div class="perks"><h3 class="category-title">Benefits</h3>
          <ul><li><div><span class="perk-title">{perk}</span></div></li></ul>
        </div>
        <div><span class="full-stack-item">{tool}</span><span>Stack</span></div>
        </body></html>"#
    )
}
