//! Application configuration structures.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Site;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Page layout assumptions used for link discovery and extraction
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// Per-city site template
    #[serde(default)]
    pub site_template: SiteTemplate,

    /// Sites listed explicitly, crawled after the templated ones
    #[serde(default)]
    pub sites: Vec<Site>,

    /// Export settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, or `None` when the file is absent.
    ///
    /// A file that exists but does not parse is a configuration error.
    pub fn load_optional(path: impl AsRef<Path>) -> Result<Option<Self>> {
        match Self::load(&path) {
            Ok(config) => Ok(Some(config)),
            Err(AppError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Load configuration, falling back to defaults only when the file is absent.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::load_optional(path)?.unwrap_or_default())
    }

    /// Every site to crawl: templated cities first, then explicit entries.
    pub fn resolved_sites(&self) -> Vec<Site> {
        let mut sites = self.site_template.expand();
        sites.extend(self.sites.iter().cloned());
        sites
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.connect_timeout_secs == 0 {
            return Err(AppError::validation(
                "crawler.connect_timeout_secs must be > 0",
            ));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        if self.crawler.max_pages == Some(0) {
            return Err(AppError::validation("crawler.max_pages must be > 0"));
        }
        self.selectors.validate()?;

        let sites = self.resolved_sites();
        if sites.is_empty() {
            return Err(AppError::config("No sites defined"));
        }
        for site in &sites {
            site.validate()?;
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Total request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "defaults::connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Retries after the first attempt on connection-level failures
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Backoff base in milliseconds (delays: 0, base, 2*base, 4*base, ...)
    #[serde(default = "defaults::backoff_base")]
    pub backoff_base_ms: u64,

    /// Delay after every job page fetch in milliseconds
    #[serde(default)]
    pub request_delay_ms: u64,

    /// Job pages fetched concurrently per listing page
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// First listing page number
    #[serde(default)]
    pub start_page: u32,

    /// Stop a site after this many listing pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,

    /// Log and skip job pages that fail to fetch instead of aborting the site
    #[serde(default)]
    pub skip_failed_jobs: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            connect_timeout_secs: defaults::connect_timeout(),
            max_retries: defaults::max_retries(),
            backoff_base_ms: defaults::backoff_base(),
            request_delay_ms: 0,
            max_concurrent: defaults::max_concurrent(),
            start_page: 0,
            max_pages: None,
            skip_failed_jobs: false,
        }
    }
}

/// Layout assumptions for the job board markup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Relative path prefix of job detail links
    #[serde(default = "defaults::job_path_prefix")]
    pub job_path_prefix: String,

    /// Class carried by each perk name
    #[serde(default = "defaults::perk_class")]
    pub perk_class: String,

    /// Class carried by the label of a perk group
    #[serde(default = "defaults::perk_category_class")]
    pub perk_category_class: String,

    /// Levels between a perk and the element enclosing its group label
    #[serde(default = "defaults::perk_category_depth")]
    pub perk_category_depth: usize,

    /// Class carried by each tool name
    #[serde(default = "defaults::tool_class")]
    pub tool_class: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            job_path_prefix: defaults::job_path_prefix(),
            perk_class: defaults::perk_class(),
            perk_category_class: defaults::perk_category_class(),
            perk_category_depth: defaults::perk_category_depth(),
            tool_class: defaults::tool_class(),
        }
    }
}

impl SelectorConfig {
    fn validate(&self) -> Result<()> {
        if self.job_path_prefix.is_empty() {
            return Err(AppError::validation("selectors.job_path_prefix is empty"));
        }
        if self.perk_category_depth == 0 {
            return Err(AppError::validation(
                "selectors.perk_category_depth must be > 0",
            ));
        }
        for (key, class) in [
            ("perk_class", &self.perk_class),
            ("perk_category_class", &self.perk_category_class),
            ("tool_class", &self.tool_class),
        ] {
            if class.trim().is_empty() || class.contains(char::is_whitespace) {
                return Err(AppError::validation(format!(
                    "selectors.{key} must be a single class name"
                )));
            }
        }
        Ok(())
    }
}

/// Template expanded once per city: `{domain}{city}{tld}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteTemplate {
    /// Scheme and host prefix before the city (e.g. "https://www.builtin")
    #[serde(default = "defaults::domain")]
    pub domain: String,

    /// Suffix after the city (e.g. ".com")
    #[serde(default = "defaults::tld")]
    pub tld: String,

    /// Listing path; the page number is appended to it
    #[serde(default = "defaults::listing_path")]
    pub listing_path: String,

    /// City identifiers, crawled in this order
    #[serde(default = "defaults::cities")]
    pub cities: Vec<String>,
}

impl Default for SiteTemplate {
    fn default() -> Self {
        Self {
            domain: defaults::domain(),
            tld: defaults::tld(),
            listing_path: defaults::listing_path(),
            cities: defaults::cities(),
        }
    }
}

impl SiteTemplate {
    /// Build one site per city.
    pub fn expand(&self) -> Vec<Site> {
        self.cities
            .iter()
            .map(|city| {
                let base_url = format!("{}{}{}", self.domain, city, self.tld);
                let listing_url = format!("{}{}", base_url, self.listing_path);
                Site {
                    name: city.clone(),
                    base_url,
                    listing_url,
                }
            })
            .collect()
    }
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving results.json, perks.csv and tools.csv
    #[serde(default = "defaults::output_dir")]
    pub dir: String,

    /// Write the export after a crawl
    #[serde(default = "defaults::export")]
    pub export: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: defaults::output_dir(),
            export: defaults::export(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; jobboard-crawler/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn connect_timeout() -> u64 {
        10
    }
    pub fn max_retries() -> u32 {
        3
    }
    pub fn backoff_base() -> u64 {
        500
    }
    pub fn max_concurrent() -> usize {
        1
    }

    // Layout defaults
    pub fn job_path_prefix() -> String {
        "/job/".into()
    }
    pub fn perk_class() -> String {
        "perk-title".into()
    }
    pub fn perk_category_class() -> String {
        "category-title".into()
    }
    pub fn perk_category_depth() -> usize {
        crate::services::PERK_CATEGORY_DEPTH
    }
    pub fn tool_class() -> String {
        "full-stack-item".into()
    }

    // Site defaults
    pub fn domain() -> String {
        "https://www.builtin".into()
    }
    pub fn tld() -> String {
        ".com".into()
    }
    pub fn listing_path() -> String {
        "/jobs?page=".into()
    }
    pub fn cities() -> Vec<String> {
        ["boston", "la", "austin", "nyc", "chicago", "colorado", "seattle"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    // Output defaults
    pub fn output_dir() -> String {
        "output".into()
    }
    pub fn export() -> bool {
        true
    }
    pub fn log_level() -> String {
        "info".into()
    }
}
