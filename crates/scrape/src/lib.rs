// ABOUTME: Core library for scraping book lists into spreadsheet-importable records.
// ABOUTME: Re-exports the public API: Scraper, ScraperBuilder, BookRecord, export helpers, and errors.

//! shelfminer-scrape turns book list pages into flat book records.
//!
//! A list page is expanded into book-page paths; each book page is fetched,
//! its JSON-LD payload and publication line are read, and the fields are
//! normalized into a [`BookRecord`]. Records export as CSV under a fixed
//! 24-column schema.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use shelfminer_scrape::{save_records, Scraper};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scraper = Scraper::builder().build()?;
//!     let records = scraper.scrape_list(
//!         "https://www.goodreads.com/list/show/195641.Books_to_read_on_Kashmir",
//!         "2024-01-15",
//!         "imported",
//!     )?;
//!     save_records(&records, Path::new("kashmir.csv"))?;
//!     Ok(())
//! }
//! ```

pub mod book;
pub mod error;
pub mod export;
pub mod fetch;
pub mod list;
pub mod normalize;
pub mod options;
pub mod payload;
pub mod pipeline;
pub mod publication;
pub mod record;

/// Origin every book path is resolved against.
pub const DEFAULT_BASE_URL: &str = "https://www.goodreads.com";

/// Path prefix of book pages, stripped before deriving the book id.
pub const BOOK_PATH_PREFIX: &str = "/book/show/";

/// Shelf label applied when the caller does not pick one.
pub const DEFAULT_SHELF: &str = "imported";

pub use book::assemble_record;
pub use error::{ExportError, FetchError, ScrapeError};
pub use export::{save_records, write_rows, EXPORT_COLUMNS};
pub use fetch::{Fetch, HttpFetcher};
pub use list::{expand_list, ListReference};
pub use options::{ScrapeOptions, ScraperBuilder};
pub use payload::{extract_structured_payload, BookPayload, StructuredPayload};
pub use pipeline::Scraper;
pub use publication::first_publication_year;
pub use record::{BookRecord, Row};
