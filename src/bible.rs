//! Verse reading from Bible-type modules
//!
//! Bible modules keep one row per verse in a `Bible` table keyed by book,
//! chapter and verse number. Every read is recomputed from the database; the
//! readers absorb engine failures and hand back empty results, since a
//! module legitimately may not cover a given chapter at all.

use crate::markup::{self, Normalized};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One unit of scripture text, markup already normalized away.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verse {
    /// 1-based position within the chapter. Numbers need not be contiguous.
    pub number: i64,
    pub text: String,
    /// Section heading, present only when the source row carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// All verses of one chapter, ordered by verse number ascending.
pub fn get_verses(conn: &Connection, book_id: i64, chapter: i64) -> Vec<Verse> {
    match query_verses(conn, book_id, chapter) {
        Ok(verses) => verses,
        Err(err) => {
            warn!(book_id, chapter, "verse query failed: {err:#}");
            Vec::new()
        }
    }
}

fn query_verses(conn: &Connection, book_id: i64, chapter: i64) -> Result<Vec<Verse>> {
    let mut stmt = conn
        .prepare("SELECT verse, scripture FROM Bible WHERE book = ?1 AND chapter = ?2 ORDER BY verse")
        .context("preparing verse query")?;
    let rows = stmt
        .query_map(params![book_id, chapter], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?))
        })
        .context("querying verses")?;

    let mut verses = Vec::new();
    for row in rows {
        let (number, raw) = row.context("reading verse row")?;
        let Normalized { text, title } = markup::normalize(raw.as_deref().unwrap_or(""));
        verses.push(Verse { number, text, title });
    }
    Ok(verses)
}

/// Highest chapter number present for a book, 0 when the book is absent.
pub fn get_chapter_count(conn: &Connection, book_id: i64) -> i64 {
    max_aggregate(
        conn,
        "SELECT MAX(chapter) FROM Bible WHERE book = ?1",
        params![book_id],
    )
}

/// Highest verse number present in a chapter, 0 when the chapter is absent.
pub fn get_verse_count(conn: &Connection, book_id: i64, chapter: i64) -> i64 {
    max_aggregate(
        conn,
        "SELECT MAX(verse) FROM Bible WHERE book = ?1 AND chapter = ?2",
        params![book_id, chapter],
    )
}

fn max_aggregate(conn: &Connection, sql: &str, params: &[&dyn rusqlite::ToSql]) -> i64 {
    let result = conn
        .query_row(sql, params, |row| row.get::<_, Option<i64>>(0))
        .optional();
    match result {
        Ok(value) => value.flatten().unwrap_or(0),
        Err(err) => {
            warn!("count query failed: {err}");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory database");
        conn.execute_batch(
            "CREATE TABLE Bible (book INTEGER, chapter INTEGER, verse INTEGER, scripture TEXT);
             INSERT INTO Bible VALUES (1, 1, 2, 'And the earth was without form');
             INSERT INTO Bible VALUES (1, 1, 1, '<title>The Creation</title>In the beginning');
             INSERT INTO Bible VALUES (1, 1, 4, 'God saw the light<f>or: it was good</f>');
             INSERT INTO Bible VALUES (1, 2, 1, 'Thus the heavens were finished');
             INSERT INTO Bible VALUES (43, 3, 16, 'For God so loved the world');",
        )
        .expect("fixture schema");
        conn
    }

    #[test]
    fn verses_come_back_ordered_and_normalized() {
        let verses = get_verses(&fixture(), 1, 1);
        assert_eq!(verses.len(), 3);
        assert_eq!(verses[0].number, 1);
        assert_eq!(verses[0].text, "In the beginning");
        assert_eq!(verses[0].title.as_deref(), Some("The Creation"));
        assert_eq!(verses[1].number, 2);
        assert_eq!(verses[1].title, None);
        // verse 3 is absent from the module and simply does not appear
        assert_eq!(verses[2].number, 4);
        assert_eq!(verses[2].text, "God saw the light");
    }

    #[test]
    fn missing_chapter_yields_empty_sequence() {
        assert!(get_verses(&fixture(), 1, 99).is_empty());
        assert!(get_verses(&fixture(), 39, 1).is_empty());
    }

    #[test]
    fn missing_bible_table_yields_empty_sequence() {
        let conn = Connection::open_in_memory().expect("in-memory database");
        assert!(get_verses(&conn, 1, 1).is_empty());
        assert_eq!(get_chapter_count(&conn, 1), 0);
        assert_eq!(get_verse_count(&conn, 1, 1), 0);
    }

    #[test]
    fn counts_are_max_aggregates() {
        let conn = fixture();
        assert_eq!(get_chapter_count(&conn, 1), 2);
        assert_eq!(get_verse_count(&conn, 1, 1), 4);
        assert_eq!(get_verse_count(&conn, 43, 3), 16);
    }

    #[test]
    fn counts_are_zero_for_absent_books_and_chapters() {
        let conn = fixture();
        assert_eq!(get_chapter_count(&conn, 66), 0);
        assert_eq!(get_verse_count(&conn, 1, 3), 0);
    }
}
