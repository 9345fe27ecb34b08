// src/services/links.rs

//! Job link discovery on listing pages.

use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{JobUrl, SelectorConfig};

/// Finds job detail links on a listing page.
pub struct LinkDiscoverer {
    anchor: Selector,
    prefix: String,
}

impl LinkDiscoverer {
    pub fn new(config: &SelectorConfig) -> Result<Self> {
        let anchor = Selector::parse("a").map_err(|e| AppError::selector("a", format!("{e:?}")))?;
        Ok(Self {
            anchor,
            prefix: config.job_path_prefix.clone(),
        })
    }

    /// Job URLs referenced by `document`, in document order.
    ///
    /// Anchors without `href`, or whose `href` lacks the job prefix, are ignored.
    /// Duplicates are kept.
    pub fn discover(&self, document: &Html, base_url: &str) -> Vec<JobUrl> {
        document
            .select(&self.anchor)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| JobUrl::from_href(base_url, href, &self.prefix))
            .collect()
    }

    /// Parse `markup` and discover its job URLs.
    pub fn discover_in(&self, markup: &str, base_url: &str) -> Vec<JobUrl> {
        let document = Html::parse_document(markup);
        self.discover(&document, base_url)
    }
}
