// ABOUTME: The BookRecord produced for every scraped book page.
// ABOUTME: Serializes under the export column names and flattens into a column-to-cell Row.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Number;

/// One export row keyed by column name.
pub type Row = HashMap<String, String>;

/// A scraped book, with `None` standing for data the page did not provide.
///
/// Field names serialize as the export column they fill. The identifier
/// fields hold the `="<value>"` form the import format expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRecord {
    #[serde(rename = "Book Id")]
    pub book_id: String,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Author")]
    pub author: Option<String>,
    #[serde(rename = "Author l-f")]
    pub author_last_first: Option<String>,
    #[serde(rename = "Additional Authors")]
    pub additional_authors: Option<String>,
    #[serde(rename = "ISBN")]
    pub isbn: String,
    #[serde(rename = "ISBN13")]
    pub isbn13: String,
    #[serde(rename = "Average Rating")]
    pub average_rating: Option<Number>,
    #[serde(rename = "Binding")]
    pub binding: Option<String>,
    #[serde(rename = "Number of Pages")]
    pub number_of_pages: Option<u32>,
    #[serde(rename = "Original Publication Year")]
    pub original_publication_year: Option<u32>,
    #[serde(rename = "Date Added")]
    pub date_added: String,
    #[serde(rename = "Bookshelves")]
    pub bookshelves: String,
    #[serde(rename = "Exclusive Shelf")]
    pub exclusive_shelf: String,
}

impl BookRecord {
    /// True when the page's structured data could not be read.
    pub fn is_unknown(&self) -> bool {
        self.title.is_none() && self.author.is_none()
    }

    /// Flattens the record into cells keyed by column name.
    ///
    /// Unknown fields are left out of the row, so they export as blanks.
    pub fn to_row(&self) -> Row {
        let value = match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => return Row::new(),
        };

        value
            .into_iter()
            .filter_map(|(column, cell)| {
                let text = match cell {
                    serde_json::Value::Null => return None,
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                Some((column, text))
            })
            .collect()
    }
}
