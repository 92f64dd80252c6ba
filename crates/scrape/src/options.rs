// ABOUTME: Configuration options for the scraper and the ScraperBuilder that applies them.
// ABOUTME: Covers the site origin, HTTP identity and timeout, and the retry delay window.

use std::time::Duration;

use crate::error::FetchError;
use crate::fetch::{Fetch, HttpFetcher};
use crate::pipeline::Scraper;
use crate::DEFAULT_BASE_URL;

/// Configuration options for a [`Scraper`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Origin prefixed to book paths, without a trailing slash.
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Lower bound of the pause before the single book-page retry.
    pub retry_delay_min: Duration,
    /// Upper bound of the pause before the single book-page retry.
    pub retry_delay_max: Duration,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("shelfminer/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            retry_delay_min: Duration::from_secs(1),
            retry_delay_max: Duration::from_secs(5),
        }
    }
}

/// Builder for constructing [`Scraper`] instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ScraperBuilder {
    opts: ScrapeOptions,
}

impl ScraperBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the site origin book paths are resolved against.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.opts.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the window the retry pause is drawn from. Bounds are reordered if swapped.
    pub fn retry_delay(mut self, min: Duration, max: Duration) -> Self {
        self.opts.retry_delay_min = min.min(max);
        self.opts.retry_delay_max = max.max(min);
        self
    }

    /// Build a scraper that fetches over HTTP.
    pub fn build(self) -> Result<Scraper<HttpFetcher>, FetchError> {
        let fetcher = HttpFetcher::new(&self.opts.user_agent, self.opts.timeout)?;
        Ok(Scraper::new(fetcher, self.opts))
    }

    /// Build a scraper around a caller-provided fetcher.
    pub fn build_with_fetcher<F: Fetch>(self, fetcher: F) -> Scraper<F> {
        Scraper::new(fetcher, self.opts)
    }
}
