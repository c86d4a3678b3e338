//! Schema-tolerant annotation table discovery and querying
//!
//! MySword commentary and cross-reference modules disagree on both table
//! names and column spelling. The resolver probes the catalog first and only
//! ever queries columns it has seen, so a missing table or column is an
//! ordinary "no match", not an engine error.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Candidate annotation tables, fixed priority order.
pub const ANNOTATION_TABLES: [&str; 4] = ["Commentary", "Comments", "Details", "CrossReference"];

/// Candidate tables present in this database, priority order preserved.
pub fn annotation_tables(conn: &Connection) -> Vec<String> {
    let existing = match table_names(conn) {
        Ok(names) => names,
        Err(err) => {
            warn!("table catalog query failed: {err:#}");
            return Vec::new();
        }
    };
    ANNOTATION_TABLES
        .iter()
        .filter(|candidate| existing.contains(&candidate.to_lowercase()))
        .map(|candidate| candidate.to_string())
        .collect()
}

/// First present candidate table, if any.
pub fn find_annotation_table(conn: &Connection) -> Option<String> {
    annotation_tables(conn).into_iter().next()
}

/// Fetches the annotation covering (book, chapter, verse) from one table.
///
/// A row matches on book and chapter plus either an exact verse column or an
/// inclusive `versebegin..=verseend` range, whichever the table actually has.
/// SQLite resolves column names case-insensitively, so the lower-case
/// spelling also covers modules using the `Book`/`VerseBegin` convention.
/// Returns the first matching row's raw content; empty content counts as no
/// match. Engine failures are logged and absorbed.
pub fn query_annotation(
    conn: &Connection,
    table: &str,
    book_id: i64,
    chapter: i64,
    verse: i64,
) -> Option<String> {
    // Table names are interpolated into SQL, so only the fixed candidates
    // are accepted.
    if !ANNOTATION_TABLES
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(table))
    {
        warn!(table, "refusing to query non-candidate table");
        return None;
    }

    let columns = match table_columns(conn, table) {
        Ok(columns) => columns,
        Err(err) => {
            warn!(table, "column probe failed: {err:#}");
            return None;
        }
    };
    if !columns.contains("book") || !columns.contains("chapter") || !columns.contains("content") {
        debug!(table, "missing book/chapter/content columns, skipping");
        return None;
    }

    let mut conditions: Vec<&str> = Vec::new();
    if columns.contains("verse") {
        conditions.push("verse = ?3");
    }
    if columns.contains("versebegin") && columns.contains("verseend") {
        conditions.push("(versebegin <= ?3 AND verseend >= ?3)");
    }
    if conditions.is_empty() {
        debug!(table, "no verse addressing columns, skipping");
        return None;
    }

    let sql = format!(
        "SELECT content FROM {table} WHERE book = ?1 AND chapter = ?2 AND ({}) LIMIT 1",
        conditions.join(" OR ")
    );
    let content = conn
        .query_row(&sql, params![book_id, chapter, verse], |row| {
            row.get::<_, Option<String>>(0)
        })
        .optional();
    match content {
        Ok(row) => row.flatten().filter(|content| !content.is_empty()),
        Err(err) => {
            warn!(table, book_id, chapter, verse, "annotation query failed: {err}");
            None
        }
    }
}

fn table_names(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table'")
        .context("preparing catalog query")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .context("querying table catalog")?
        .filter_map(|row| row.ok())
        .map(|name| name.to_lowercase())
        .collect();
    Ok(names)
}

fn table_columns(conn: &Connection, table: &str) -> Result<HashSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("probing columns of {table}"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .context("reading column names")?
        .filter_map(|row| row.ok())
        .map(|name| name.to_lowercase())
        .collect();
    Ok(columns)
}
