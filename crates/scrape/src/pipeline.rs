// ABOUTME: The Scraper that drives list expansion and per-book record assembly.
// ABOUTME: Book-page fetches get exactly one retry after a randomized pause; nothing else is retried.

use std::thread;
use std::time::Duration;

use rand::Rng;
use scraper::Html;

use crate::book::assemble_record;
use crate::error::{FetchError, ScrapeError};
use crate::fetch::{Fetch, HttpFetcher};
use crate::list;
use crate::options::{ScrapeOptions, ScraperBuilder};
use crate::record::BookRecord;

/// Sequential scraper over a [`Fetch`] implementation.
///
/// Every call blocks until its pages are fetched and processed, one page at a
/// time. Records are returned only once a whole list (or set of lists) has
/// succeeded; any propagated error discards the records gathered so far.
#[derive(Debug, Clone)]
pub struct Scraper<F = HttpFetcher> {
    fetcher: F,
    opts: ScrapeOptions,
}

impl Scraper<HttpFetcher> {
    pub fn builder() -> ScraperBuilder {
        ScraperBuilder::new()
    }
}

impl<F: Fetch> Scraper<F> {
    pub fn new(fetcher: F, opts: ScrapeOptions) -> Self {
        Self { fetcher, opts }
    }

    /// Absolute URL of a book page path such as `/book/show/1`.
    pub fn book_url(&self, book_path: &str) -> String {
        format!("{}{}", self.opts.base_url, book_path)
    }

    /// Returns the book-page paths listed at `url`.
    pub fn expand_list(&self, url: &str) -> Result<Vec<String>, ScrapeError> {
        list::expand_list(&self.fetcher, url)
    }

    /// Fetches and assembles the record for one book page.
    pub fn scrape_book(
        &self,
        book_path: &str,
        today: &str,
        shelf: &str,
    ) -> Result<BookRecord, ScrapeError> {
        let url = self.book_url(book_path);
        let body = self.fetch_book_page(&url)?;
        let doc = Html::parse_document(&body);
        let record = assemble_record(&doc, book_path, today, shelf)?;

        if record.is_unknown() {
            tracing::warn!(%url, "book page has no usable structured data");
        }
        Ok(record)
    }

    /// Expands one list and scrapes every book on it, in list order.
    pub fn scrape_list(
        &self,
        url: &str,
        today: &str,
        shelf: &str,
    ) -> Result<Vec<BookRecord>, ScrapeError> {
        let paths = self.expand_list(url)?;
        self.scrape_books(&paths, today, shelf)
    }

    /// Expands every list first, then scrapes all of their books in order.
    pub fn scrape_lists<S: AsRef<str>>(
        &self,
        urls: &[S],
        today: &str,
        shelf: &str,
    ) -> Result<Vec<BookRecord>, ScrapeError> {
        let mut paths = Vec::new();
        for url in urls {
            paths.extend(self.expand_list(url.as_ref())?);
        }
        self.scrape_books(&paths, today, shelf)
    }

    fn scrape_books(
        &self,
        paths: &[String],
        today: &str,
        shelf: &str,
    ) -> Result<Vec<BookRecord>, ScrapeError> {
        let total = paths.len();
        let mut records = Vec::with_capacity(total);

        for (idx, path) in paths.iter().enumerate() {
            tracing::info!("processing book {}/{}", idx + 1, total);
            let record = self.scrape_book(path, today, shelf)?;
            tracing::info!(
                title = record.title.as_deref().unwrap_or("<unknown>"),
                "processed"
            );
            records.push(record);
        }

        Ok(records)
    }

    /// Two attempts at most, with one randomized pause between them.
    fn fetch_book_page(&self, url: &str) -> Result<String, FetchError> {
        match self.fetcher.fetch(url) {
            Err(err) if err.is_transient() => {
                let pause = self.retry_pause();
                tracing::warn!(
                    %url,
                    error = %err,
                    delay_ms = pause.as_millis() as u64,
                    "book page fetch failed, retrying once"
                );
                thread::sleep(pause);
                self.fetcher.fetch(url)
            }
            outcome => outcome,
        }
    }

    fn retry_pause(&self) -> Duration {
        let min = self.opts.retry_delay_min.as_millis() as u64;
        let max = self.opts.retry_delay_max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max.max(min)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    /// Serves canned pages and fails the first `failures` requests for each URL.
    struct Scripted {
        pages: HashMap<String, String>,
        failures: usize,
        seen: RefCell<HashMap<String, usize>>,
        calls: Cell<usize>,
    }

    impl Scripted {
        fn new(failures: usize) -> Self {
            Self {
                pages: HashMap::new(),
                failures,
                seen: RefCell::new(HashMap::new()),
                calls: Cell::new(0),
            }
        }

        fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }
    }

    impl Fetch for Scripted {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.calls.set(self.calls.get() + 1);
            let mut seen = self.seen.borrow_mut();
            let attempt = seen.entry(url.to_string()).or_insert(0);
            *attempt += 1;
            if *attempt <= self.failures {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: 503,
                });
            }
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    struct BadUrl;

    impl Fetch for BadUrl {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: "bad".to_string(),
            })
        }
    }

    const BOOK: &str = r#"<script type="application/ld+json">{"isbn": "9781234567897",
        "name": "Edge Book", "numberOfPages": 400, "bookFormat": "Kindle",
        "author": [{"name": "Edge Author"}, {"name": "Co-Author"}],
        "aggregateRating": {"ratingValue": 3.8}}</script>
        <p data-testid="publicationInfo">Published 1999 by SomePublisher</p>"#;

    fn scraper<F: Fetch>(fetcher: F) -> Scraper<F> {
        Scraper::builder()
            .base_url("https://books.test")
            .retry_delay(Duration::ZERO, Duration::from_millis(2))
            .build_with_fetcher(fetcher)
    }

    #[test]
    fn book_url_prefixes_origin() {
        let s = scraper(Scripted::new(0));
        assert_eq!(s.book_url("/book/show/1"), "https://books.test/book/show/1");
    }

    #[test]
    fn scrape_book_full_flow() {
        let s = scraper(Scripted::new(0).page("https://books.test/book/show/9999", BOOK));
        let record = s.scrape_book("/book/show/9999", "2025-11-01", "testShelf").unwrap();

        assert_eq!(record.book_id, "9999");
        assert_eq!(record.title.as_deref(), Some("Edge Book"));
        assert_eq!(record.author_last_first.as_deref(), Some("Author, Edge"));
        assert_eq!(record.additional_authors.as_deref(), Some("Co-Author"));
        assert_eq!(record.isbn, "=\"1234567897\"");
        assert_eq!(record.number_of_pages, Some(400));
        assert_eq!(record.original_publication_year, Some(1999));
        assert_eq!(record.average_rating, serde_json::Number::from_f64(3.8));
        assert_eq!(record.bookshelves, "testShelf");
        assert_eq!(record.exclusive_shelf, "testShelf");
    }

    #[test]
    fn one_failure_is_retried() {
        let s = scraper(Scripted::new(1).page("https://books.test/book/show/1", BOOK));
        let record = s.scrape_book("/book/show/1", "2025-11-01", "imported").unwrap();
        assert_eq!(record.title.as_deref(), Some("Edge Book"));
        assert_eq!(s.fetcher.calls.get(), 2);
    }

    #[test]
    fn second_failure_propagates() {
        let s = scraper(Scripted::new(2).page("https://books.test/book/show/1", BOOK));
        let err = s.scrape_book("/book/show/1", "2025-11-01", "imported").unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::Fetch(FetchError::Status { status: 503, .. })
        ));
        assert_eq!(s.fetcher.calls.get(), 2);
    }

    #[test]
    fn non_transient_failure_is_not_retried() {
        let s = scraper(BadUrl);
        let err = s.scrape_book("/book/show/1", "2025-11-01", "imported").unwrap_err();
        assert!(matches!(err, ScrapeError::Fetch(FetchError::InvalidUrl { .. })));
    }

    #[test]
    fn list_fetch_is_not_retried() {
        let s = scraper(Scripted::new(1).page("https://books.test/list/show/1.L", "<html></html>"));
        let err = s
            .scrape_list("https://books.test/list/show/1.L", "2025-11-01", "imported")
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Fetch(_)));
        assert_eq!(s.fetcher.calls.get(), 1);
    }

    #[test]
    fn scrape_lists_expands_every_list_first() {
        let list = r#"<a class="bookTitle" href="/book/show/1">A</a>
                      <a class="bookTitle" href="/book/show/2">B</a>"#;
        let s = scraper(
            Scripted::new(0)
                .page("https://books.test/list/show/1.One", list)
                .page("https://books.test/list/show/2.Two", list)
                .page("https://books.test/book/show/1", BOOK)
                .page("https://books.test/book/show/2", BOOK),
        );

        let records = s
            .scrape_lists(
                &[
                    "https://books.test/list/show/1.One",
                    "https://books.test/list/show/2.Two",
                ],
                "2025-11-01",
                "imported",
            )
            .unwrap();

        let ids: Vec<&str> = records.iter().map(|r| r.book_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "1", "2"]);
        assert_eq!(s.fetcher.calls.get(), 6);
    }

    #[test]
    fn list_given_without_scheme_is_fetched_absolute() {
        let list = crate::list::ListReference::parse("books.test/list/show/1.One").unwrap();
        let s = scraper(
            Scripted::new(0)
                .page(
                    "https://books.test/list/show/1.One",
                    r#"<a class="bookTitle" href="/book/show/1">A</a>"#,
                )
                .page("https://books.test/book/show/1", BOOK),
        );

        let records = s.scrape_lists(&[list.url], "2025-11-01", "imported").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title.as_deref(), Some("Edge Book"));
    }

    #[test]
    fn failure_mid_list_discards_everything() {
        let list = r#"<a class="bookTitle" href="/book/show/1">A</a>
                      <a class="bookTitle" href="/book/show/404">Missing</a>"#;
        let s = scraper(
            Scripted::new(0)
                .page("https://books.test/list/show/1.One", list)
                .page("https://books.test/book/show/1", BOOK),
        );
        let result = s.scrape_list("https://books.test/list/show/1.One", "2025-11-01", "x");
        assert!(matches!(
            result,
            Err(ScrapeError::Fetch(FetchError::Status { status: 404, .. }))
        ));
    }

    #[test]
    fn retry_pause_stays_in_window() {
        let s = Scraper::builder()
            .retry_delay(Duration::from_millis(10), Duration::from_millis(20))
            .build_with_fetcher(BadUrl);
        for _ in 0..50 {
            let pause = s.retry_pause();
            assert!(pause >= Duration::from_millis(10) && pause <= Duration::from_millis(20));
        }
    }
}
