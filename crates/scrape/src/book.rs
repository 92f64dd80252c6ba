// ABOUTME: Assembles a BookRecord from a parsed book page and caller-supplied context.
// ABOUTME: Combines structured-data fields, the publication year, and normalized identifiers.

use scraper::Html;

use crate::error::ScrapeError;
use crate::normalize::{derive_book_id, format_person_name, isbn13_to_10, text_literal};
use crate::payload::extract_structured_payload;
use crate::publication::first_publication_year;
use crate::record::BookRecord;

/// Builds the record for the book page at `book_path`.
///
/// `today` fills the date-added column and `shelf` both shelf columns.
/// Fails only if the publication info is present but unreadable.
pub fn assemble_record(
    doc: &Html,
    book_path: &str,
    today: &str,
    shelf: &str,
) -> Result<BookRecord, ScrapeError> {
    let payload = extract_structured_payload(doc);
    let original_publication_year = first_publication_year(doc)?;

    let book = payload.as_full();
    let author = book.map(|b| b.author.clone());
    let isbn13 = book.map(|b| b.isbn13.as_str());

    Ok(BookRecord {
        book_id: derive_book_id(book_path).to_string(),
        title: book.map(|b| b.title.clone()),
        author_last_first: format_person_name(author.as_deref()),
        author,
        additional_authors: book.map(|b| b.additional_authors.clone()),
        isbn: text_literal(isbn13_to_10(isbn13).as_deref()),
        isbn13: text_literal(isbn13),
        average_rating: book.map(|b| b.average_rating.clone()),
        binding: book.map(|b| b.book_format.clone()),
        number_of_pages: book.map(|b| b.number_of_pages),
        original_publication_year,
        date_added: today.to_string(),
        bookshelves: shelf.to_string(),
        exclusive_shelf: shelf.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Number;

    const BOOK_PAGE: &str = r#"<html><head>
      <script type="application/ld+json">
      {
        "isbn": "9781234567897",
        "name": "Test Book",
        "numberOfPages": 300,
        "bookFormat": "Hardcover",
        "author": [{"name": "John Doe"}],
        "aggregateRating": {"ratingValue": 4.2}
      }
      </script></head>
      <body><p data-testid="publicationInfo">Published 2010 by Publisher</p></body>
    </html>"#;

    #[test]
    fn record_from_complete_page() {
        let doc = Html::parse_document(BOOK_PAGE);
        let record =
            assemble_record(&doc, "/book/show/12345678.Test_Book", "2024-01-15", "imported")
                .unwrap();

        assert_eq!(
            record,
            BookRecord {
                book_id: "12345678".to_string(),
                title: Some("Test Book".to_string()),
                author: Some("John Doe".to_string()),
                author_last_first: Some("Doe, John".to_string()),
                additional_authors: Some(String::new()),
                isbn: "=\"1234567897\"".to_string(),
                isbn13: "=\"9781234567897\"".to_string(),
                average_rating: Number::from_f64(4.2),
                binding: Some("Hardcover".to_string()),
                number_of_pages: Some(300),
                original_publication_year: Some(2010),
                date_added: "2024-01-15".to_string(),
                bookshelves: "imported".to_string(),
                exclusive_shelf: "imported".to_string(),
            }
        );
        assert!(!record.is_unknown());
    }

    #[test]
    fn record_without_structured_data_keeps_every_field() {
        let doc = Html::parse_document("<html><body><p>nothing</p></body></html>");
        let record = assemble_record(&doc, "/book/show/99", "2024-01-15", "to-read").unwrap();

        assert_eq!(record.book_id, "99");
        assert_eq!(record.title, None);
        assert_eq!(record.author_last_first, None);
        assert_eq!(record.additional_authors, None);
        assert_eq!(record.isbn13, "=\"\"");
        assert_eq!(record.isbn, "=\"\"");
        assert_eq!(record.original_publication_year, None);
        assert_eq!(record.bookshelves, "to-read");
        assert_eq!(record.exclusive_shelf, "to-read");
        assert!(record.is_unknown());
    }

    #[test]
    fn non_978_isbn_has_unknown_isbn10() {
        let page = BOOK_PAGE.replace("9781234567897", "9791234567896");
        let doc = Html::parse_document(&page);
        let record = assemble_record(&doc, "/book/show/1", "2024-01-15", "imported").unwrap();
        assert_eq!(record.isbn13, "=\"9791234567896\"");
        assert_eq!(record.isbn, "=\"\"");
    }

    #[test]
    fn unreadable_publication_info_fails_the_record() {
        let page = BOOK_PAGE.replace("Published 2010 by Publisher", "Published someday");
        let doc = Html::parse_document(&page);
        let err = assemble_record(&doc, "/book/show/1", "2024-01-15", "imported").unwrap_err();
        assert!(matches!(err, ScrapeError::MissingYear { .. }));
    }
}
