//! Annotation reading from commentary and cross-reference modules
//!
//! Candidate tables are tried in the resolver's priority order; the first
//! table producing usable content wins, even when a later table would also
//! match. "No annotation here" is an expected outcome, not an error.

use crate::markup;
use crate::schema;
use rusqlite::Connection;
use tracing::debug;

/// Normalized annotation text covering (book, chapter, verse), if any.
///
/// Rows whose content is empty after cleanup are treated as absent and the
/// search moves on to the next candidate table.
pub fn get_annotation_text(
    conn: &Connection,
    book_id: i64,
    chapter: i64,
    verse: i64,
) -> Option<String> {
    for table in schema::annotation_tables(conn) {
        if let Some(raw) = schema::query_annotation(conn, &table, book_id, chapter, verse) {
            let text = markup::clean_annotation(&raw);
            if text.is_empty() {
                debug!(table, book_id, chapter, verse, "annotation empty after cleanup");
                continue;
            }
            return Some(text);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(sql: &str) -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory database");
        conn.execute_batch(sql).expect("fixture schema");
        conn
    }

    #[test]
    fn first_candidate_table_wins_over_later_matches() {
        let conn = fixture(
            "CREATE TABLE Commentary (book INTEGER, chapter INTEGER, verse INTEGER, content TEXT);
             CREATE TABLE Details (book INTEGER, chapter INTEGER, verse INTEGER, content TEXT);
             INSERT INTO Commentary VALUES (1, 1, 1, 'from Commentary');
             INSERT INTO Details VALUES (1, 1, 1, 'from Details');",
        );
        assert_eq!(
            get_annotation_text(&conn, 1, 1, 1).as_deref(),
            Some("from Commentary")
        );
    }

    #[test]
    fn later_table_answers_when_earlier_has_no_row() {
        let conn = fixture(
            "CREATE TABLE Commentary (book INTEGER, chapter INTEGER, verse INTEGER, content TEXT);
             CREATE TABLE CrossReference (book INTEGER, chapter INTEGER, versebegin INTEGER, verseend INTEGER, content TEXT);
             INSERT INTO CrossReference VALUES (40, 5, 3, 11, 'the beatitudes');",
        );
        assert_eq!(
            get_annotation_text(&conn, 40, 5, 7).as_deref(),
            Some("the beatitudes")
        );
    }

    #[test]
    fn content_is_cleaned_of_markup() {
        let conn = fixture(
            "CREATE TABLE Comments (book INTEGER, chapter INTEGER, verse INTEGER, content TEXT);
             INSERT INTO Comments VALUES (45, 8, 28, 'Compare [[Gen 50:20]] and <a href=\"b\">Eph 1:11</a>.');",
        );
        assert_eq!(
            get_annotation_text(&conn, 45, 8, 28).as_deref(),
            Some("Compare Gen 50:20 and Eph 1:11.")
        );
    }

    #[test]
    fn no_matching_row_anywhere_is_none() {
        let conn = fixture(
            "CREATE TABLE Commentary (book INTEGER, chapter INTEGER, verse INTEGER, content TEXT);
             INSERT INTO Commentary VALUES (1, 1, 1, 'elsewhere');",
        );
        assert_eq!(get_annotation_text(&conn, 1, 1, 2), None);
    }

    #[test]
    fn markup_only_content_falls_through_to_next_table() {
        let conn = fixture(
            "CREATE TABLE Commentary (book INTEGER, chapter INTEGER, verse INTEGER, content TEXT);
             CREATE TABLE Details (book INTEGER, chapter INTEGER, verse INTEGER, content TEXT);
             INSERT INTO Commentary VALUES (1, 1, 1, '<f>nothing but a footnote</f>');
             INSERT INTO Details VALUES (1, 1, 1, 'substantive note');",
        );
        assert_eq!(
            get_annotation_text(&conn, 1, 1, 1).as_deref(),
            Some("substantive note")
        );
    }

    #[test]
    fn module_without_annotation_tables_is_none() {
        let conn = fixture(
            "CREATE TABLE Bible (book INTEGER, chapter INTEGER, verse INTEGER, scripture TEXT);",
        );
        assert_eq!(get_annotation_text(&conn, 1, 1, 1), None);
    }
}
