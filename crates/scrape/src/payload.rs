// ABOUTME: Extracts the book fields carried by a page's JSON-LD structured-data script.
// ABOUTME: Degrades to StructuredPayload::Unknown when the payload is absent or malformed.

//! Structured-data extraction.
//!
//! Book pages embed a `<script type="application/ld+json">` block describing
//! the book. The first script whose JSON object has an `isbn` key is the
//! source of every field below. Extraction is all-or-nothing: a missing or
//! mistyped field, or a script that fails to decode, yields
//! [`StructuredPayload::Unknown`] rather than a partial result. This is the
//! one stage of the pipeline that never returns an error.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::{Map, Number, Value};

static LD_JSON_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());

/// Book fields read from a complete structured-data payload.
#[derive(Debug, Clone, PartialEq)]
pub struct BookPayload {
    pub title: String,
    pub author: String,
    /// Every author after the first, joined with `", "`; empty if none.
    pub additional_authors: String,
    pub isbn13: String,
    /// Kept as the payload wrote it, so `4` stays `4` in the export.
    pub average_rating: Number,
    pub book_format: String,
    pub number_of_pages: u32,
}

/// Outcome of structured-data extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredPayload {
    Full(BookPayload),
    Unknown,
}

impl StructuredPayload {
    pub fn as_full(&self) -> Option<&BookPayload> {
        match self {
            StructuredPayload::Full(payload) => Some(payload),
            StructuredPayload::Unknown => None,
        }
    }
}

/// Finds the book payload in `doc`.
pub fn extract_structured_payload(doc: &Html) -> StructuredPayload {
    match find_book_payload(doc) {
        Ok(Some(payload)) => StructuredPayload::Full(payload),
        Ok(None) => {
            tracing::debug!("no structured-data script carries an isbn");
            StructuredPayload::Unknown
        }
        Err(reason) => {
            tracing::debug!(%reason, "structured-data payload unusable");
            StructuredPayload::Unknown
        }
    }
}

fn find_book_payload(doc: &Html) -> Result<Option<BookPayload>, String> {
    for script in doc.select(&LD_JSON_SELECTOR) {
        let text = script.text().collect::<String>();
        let value: Value =
            serde_json::from_str(&text).map_err(|e| format!("invalid JSON-LD: {e}"))?;

        if let Some(map) = value.as_object().filter(|map| map.contains_key("isbn")) {
            return read_book(map).map(Some);
        }
    }
    Ok(None)
}

fn read_book(map: &Map<String, Value>) -> Result<BookPayload, String> {
    let isbn13 = scalar_string(map, "isbn")?;
    let title = unescape(string_field(map, "name")?);
    let number_of_pages = number_of_pages(map)?;
    let book_format = string_field(map, "bookFormat")?.to_string();

    let authors = author_names(map)?;
    let (author, additional) = authors
        .split_first()
        .ok_or_else(|| "author list is empty".to_string())?;
    let additional_authors = additional.join(", ");

    let rating = map
        .get("aggregateRating")
        .and_then(|r| r.get("ratingValue"))
        .ok_or_else(|| "missing aggregateRating.ratingValue".to_string())?;
    let average_rating =
        as_number(rating).ok_or_else(|| "ratingValue is not a number".to_string())?;

    Ok(BookPayload {
        title,
        author: author.clone(),
        additional_authors,
        isbn13,
        average_rating,
        book_format,
        number_of_pages,
    })
}

fn string_field<'a>(map: &'a Map<String, Value>, key: &str) -> Result<&'a str, String> {
    map.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing or non-string {key}"))
}

/// Accepts either a JSON string or a JSON number.
fn scalar_string(map: &Map<String, Value>, key: &str) -> Result<String, String> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(format!("missing or non-scalar {key}")),
    }
}

fn number_of_pages(map: &Map<String, Value>) -> Result<u32, String> {
    let pages = match map.get("numberOfPages") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    pages
        .and_then(|p| u32::try_from(p).ok())
        .ok_or_else(|| "missing or invalid numberOfPages".to_string())
}

fn author_names(map: &Map<String, Value>) -> Result<Vec<String>, String> {
    let entries: Vec<&Value> = match map.get("author") {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single @ Value::Object(_)) => vec![single],
        _ => return Err("missing author".to_string()),
    };

    entries
        .into_iter()
        .map(|entry| {
            entry
                .get("name")
                .and_then(Value::as_str)
                .map(unescape)
                .ok_or_else(|| "author entry without name".to_string())
        })
        .collect()
}

/// A JSON number, or a string holding one.
fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => serde_json::from_str::<Number>(s.trim()).ok(),
        _ => None,
    }
}

/// Decodes HTML character references against the full HTML5 entity table.
fn unescape(s: &str) -> String {
    html_escape::decode_html_entities(s).into_owned()
}
