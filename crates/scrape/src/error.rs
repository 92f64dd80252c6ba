// ABOUTME: Error types for fetching, scraping, and exporting book records.
// ABOUTME: FetchError covers retrieval, ScrapeError the pipeline, ExportError the CSV writer.

use thiserror::Error;

/// Errors raised while retrieving a page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be parsed or uses an unsupported scheme.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request could not be completed (connect, timeout, body read).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-200 status.
    #[error("{url} returned HTTP status {status}")]
    Status { url: String, status: u16 },

    /// The response body exceeded the size limit.
    #[error("content at {url} is too large")]
    TooLarge { url: String },
}

impl FetchError {
    /// Returns true if a second attempt at the same URL may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Request { .. } | FetchError::Status { .. })
    }
}

/// Errors that abort scraping a list or a book.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The publication info element exists but carries no year.
    #[error("publication info has no year: {text:?}")]
    MissingYear { text: String },

    /// A list URL whose last path segment is not `<id>.<name>`.
    #[error("invalid list URL {url}: {reason}")]
    InvalidListUrl { url: String, reason: String },
}

impl ScrapeError {
    pub fn invalid_list_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        ScrapeError::InvalidListUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while writing the CSV export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}
