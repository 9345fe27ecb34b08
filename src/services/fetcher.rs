// src/services/fetcher.rs

//! Page fetching with bounded retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Anything that can turn a URL into raw page markup.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch `url` and return its body.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Exponential backoff for connection-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the second retry; doubles for each retry after it
    pub backoff_base: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_base: Duration::from_millis(config.backoff_base_ms),
        }
    }

    /// Delay before retry number `retry` (1-based): 0, base, 2*base, 4*base, ...
    pub fn delay_for(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(retry - 2);
        self.backoff_base.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &CrawlerConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build()?;
    Ok(client)
}

/// HTTP page source backed by a shared reqwest client.
pub struct HttpFetcher {
    client: Client,
    retry: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Build the client and retry policy from crawler settings.
    pub fn from_config(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self::new(
            create_async_client(config)?,
            RetryPolicy::from_config(config),
        ))
    }

    async fn fetch_once(&self, url: &str) -> reqwest::Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            // The body is still handed to the parser; error pages simply carry no job links.
            log::warn!("{} answered {}", url, status);
        }
        response.text().await
    }
}

/// Connection-level failures are the only ones worth retrying.
fn is_transient(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout()
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        log::info!("Fetching {}", url);

        let mut retry = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(error) if is_transient(&error) && retry < self.retry.max_retries => {
                    retry += 1;
                    let delay = self.retry.delay_for(retry);
                    log::warn!(
                        "Fetch of {} failed ({}), retry {}/{} in {:.1}s",
                        url,
                        error,
                        retry,
                        self.retry.max_retries,
                        delay.as_secs_f64()
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(error) => return Err(AppError::fetch(url, retry + 1, error)),
            }
        }
    }
}
