// ABOUTME: List page handling: naming a list from its URL and expanding it into book-page paths.
// ABOUTME: Book paths are the hrefs of the page's book-title anchors, in document order.

use std::fmt;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::error::ScrapeError;
use crate::fetch::Fetch;

static BOOK_TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.bookTitle").unwrap());

/// A list URL with the id and name encoded in its last path segment.
///
/// `https://www.goodreads.com/list/show/195641.Books_to_read_on_Kashmir`
/// has id `195641` and name `Books_to_read_on_Kashmir`. `url` always holds
/// the absolute form, ready to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListReference {
    pub url: String,
    pub id: u64,
    pub name: String,
}

impl ListReference {
    /// Parses a list URL. A missing scheme is read as `https://`.
    pub fn parse(url: &str) -> Result<Self, ScrapeError> {
        let trimmed = url.trim();
        let absolute = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };

        let parsed =
            Url::parse(&absolute).map_err(|e| ScrapeError::invalid_list_url(url, e.to_string()))?;
        let segment = parsed
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .ok_or_else(|| ScrapeError::invalid_list_url(url, "no path"))?;

        let (id, name) = segment
            .split_once('.')
            .ok_or_else(|| ScrapeError::invalid_list_url(url, "expected <id>.<name>"))?;
        let id = id
            .parse::<u64>()
            .map_err(|_| ScrapeError::invalid_list_url(url, format!("list id {id:?} is not numeric")))?;
        if name.is_empty() {
            return Err(ScrapeError::invalid_list_url(url, "list name is empty"));
        }

        let name = name.to_string();
        Ok(Self {
            url: parsed.into(),
            id,
            name,
        })
    }

    /// `"<id> - <name>"`, used to name the export file.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.id, self.name)
    }
}

impl fmt::Display for ListReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Returns the href of every book-title anchor in `doc`, in document order.
pub fn book_paths(doc: &Html) -> Vec<String> {
    doc.select(&BOOK_TITLE_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Fetches the list page at `url` and returns its book-page paths.
///
/// There is no retry here: a failed list fetch ends the run.
pub fn expand_list<F: Fetch>(fetcher: &F, url: &str) -> Result<Vec<String>, ScrapeError> {
    let body = fetcher.fetch(url)?;
    let paths = book_paths(&Html::parse_document(&body));
    tracing::info!(%url, books = paths.len(), "list expanded");
    Ok(paths)
}
