// ABOUTME: CSV export of scraped records under the fixed 24-column import schema.
// ABOUTME: Writes a header row, then one row per record; extra cells are dropped, missing ones blank.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::ExportError;
use crate::record::{BookRecord, Row};

/// Column order of the import format.
pub const EXPORT_COLUMNS: [&str; 24] = [
    "Book Id",
    "Title",
    "Author",
    "Author l-f",
    "Additional Authors",
    "ISBN",
    "ISBN13",
    "My Rating",
    "Average Rating",
    "Publisher",
    "Binding",
    "Number of Pages",
    "Year Published",
    "Original Publication Year",
    "Date Read",
    "Date Added",
    "Bookshelves",
    "Bookshelves with positions",
    "Exclusive Shelf",
    "My Review",
    "Spoiler",
    "Private Notes",
    "Read Count",
    "Owned Copies",
];

/// Writes `rows` as CSV with `columns` as the header.
///
/// Cells whose column is not in `columns` are ignored; columns a row does
/// not have are written blank.
pub fn write_rows<W: Write>(writer: W, rows: &[Row], columns: &[&str]) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(columns)?;

    for row in rows {
        csv.write_record(
            columns
                .iter()
                .map(|column| row.get(*column).map(String::as_str).unwrap_or("")),
        )?;
    }

    csv.flush()?;
    Ok(())
}

/// Writes `records` to `path` under [`EXPORT_COLUMNS`], creating parent directories.
pub fn save_records(records: &[BookRecord], path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let rows: Vec<Row> = records.iter().map(BookRecord::to_row).collect();
    let file = fs::File::create(path)?;
    write_rows(file, &rows, &EXPORT_COLUMNS)?;

    tracing::info!(path = %path.display(), rows = rows.len(), "export written");
    Ok(())
}
