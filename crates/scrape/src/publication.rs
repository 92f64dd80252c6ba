// ABOUTME: Reads the first-publication year from a book page's visible publication info.
// ABOUTME: Absent markup means unknown; present markup without a year is an error.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::error::ScrapeError;

static PUBLICATION_INFO_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"p[data-testid="publicationInfo"]"#).unwrap());

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{3,4}").unwrap());

/// Returns the year from the page's publication info line.
///
/// `Ok(None)` when the page has no publication info element. When the element
/// exists but its text holds no run of 3-4 digits the page layout has changed,
/// and that is reported as [`ScrapeError::MissingYear`] instead of unknown.
pub fn first_publication_year(doc: &Html) -> Result<Option<u32>, ScrapeError> {
    let Some(element) = doc.select(&PUBLICATION_INFO_SELECTOR).next() else {
        return Ok(None);
    };

    let text = element.text().collect::<String>();
    let year = YEAR_RE
        .find(&text)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .ok_or_else(|| ScrapeError::MissingYear {
            text: text.trim().to_string(),
        })?;

    Ok(Some(year))
}
