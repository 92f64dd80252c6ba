// ABOUTME: Pure string helpers for book identifiers and author names.
// ABOUTME: Derives book ids from page paths, converts ISBN-13 to ISBN-10, and formats "last, first".

use crate::BOOK_PATH_PREFIX;

/// Prefix every convertible ISBN-13 carries.
const ISBN13_PREFIX: &str = "978";

/// Returns the run of characters before the first `.` or `-` in a book path.
///
/// A leading `/book/show/` is stripped first. The whole remainder is returned
/// when neither delimiter occurs, and an empty string when it starts with one.
///
/// ```
/// use shelfminer_scrape::normalize::derive_book_id;
/// assert_eq!(derive_book_id("/book/show/12345678.Some-Book-Title"), "12345678");
/// ```
pub fn derive_book_id(path: &str) -> &str {
    let path = path.strip_prefix(BOOK_PATH_PREFIX).unwrap_or(path);
    match path.find(['.', '-']) {
        Some(end) => &path[..end],
        None => path,
    }
}

/// Converts a `978`-prefixed ISBN-13 into its ISBN-10 digits.
///
/// Returns `None` for unknown input, input that is not 13 characters long,
/// or input with any other prefix. The check digit is carried over as-is.
pub fn isbn13_to_10(isbn13: Option<&str>) -> Option<String> {
    let isbn13 = isbn13?;
    if isbn13.chars().count() != 13 {
        return None;
    }
    isbn13.strip_prefix(ISBN13_PREFIX).map(str::to_string)
}

/// Reformats a personal name into `"<last>, <first names>"`.
///
/// Two tokens give `"Doe, John"`. With three or more tokens every first name
/// is followed by a space, so `"Mary Jane Smith"` gives `"Smith, Mary Jane "`.
/// A single token has no surname and yields `None`.
pub fn format_person_name(full_name: Option<&str>) -> Option<String> {
    let names: Vec<&str> = full_name?.split(' ').collect();
    match names.as_slice() {
        [first, last] => Some(format!("{last}, {first}")),
        [firsts @ .., last] if !firsts.is_empty() => {
            let first_names: String = firsts.iter().map(|name| format!("{name} ")).collect();
            Some(format!("{last}, {first_names}"))
        }
        _ => None,
    }
}

/// Wraps a value as `="<value>"` so spreadsheet importers keep it as text.
///
/// Unknown values still produce the wrapper, around empty text.
pub fn text_literal(value: Option<&str>) -> String {
    format!("=\"{}\"", value.unwrap_or_default())
}
