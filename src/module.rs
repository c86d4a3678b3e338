//! Module classification and loading
//!
//! A module is one MySword SQLite file. Its type is inferred from filename
//! tokens at import time and fixed for the module's lifetime; the database
//! itself is opened read-only and owned exclusively by the `Module`.

use crate::annotations;
use crate::bible::{self, Verse};
use crate::error::ModuleError;
use rusqlite::{Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Module type, one of the six MySword file flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleKind {
    #[serde(rename = "bbl")]
    Bible,
    #[serde(rename = "cmt")]
    Commentary,
    #[serde(rename = "dct")]
    Dictionary,
    #[serde(rename = "bok")]
    Book,
    #[serde(rename = "jor")]
    Journal,
    #[serde(rename = "xref")]
    CrossReference,
}

impl ModuleKind {
    /// Classifies a filename by its type tokens.
    ///
    /// The `.bbl.`/`.cmt.`/`.dct.`/`.bok.`/`.jor.` tokens are checked in that
    /// fixed order; an `xref` or `tsk` token anywhere in the name overrides
    /// them. Unrecognized names default to Bible.
    pub fn from_file_name(file_name: &str) -> Self {
        let lower = file_name.to_lowercase();
        let mut kind = if lower.contains(".bbl.") {
            ModuleKind::Bible
        } else if lower.contains(".cmt.") {
            ModuleKind::Commentary
        } else if lower.contains(".dct.") {
            ModuleKind::Dictionary
        } else if lower.contains(".bok.") {
            ModuleKind::Book
        } else if lower.contains(".jor.") {
            ModuleKind::Journal
        } else {
            ModuleKind::Bible
        };
        if lower.contains("xref") || lower.contains("tsk") {
            kind = ModuleKind::CrossReference;
        }
        kind
    }

    /// Vendor token for this kind, as used in filenames and the manifest.
    pub fn token(&self) -> &'static str {
        match self {
            ModuleKind::Bible => "bbl",
            ModuleKind::Commentary => "cmt",
            ModuleKind::Dictionary => "dct",
            ModuleKind::Book => "bok",
            ModuleKind::Journal => "jor",
            ModuleKind::CrossReference => "xref",
        }
    }
}

/// Display name for a module file: final extension stripped, upper-cased.
pub fn display_name(file_name: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    };
    stem.to_uppercase()
}

/// Listing payload for module pickers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleMeta {
    pub id: String,
    pub name: String,
    pub kind: ModuleKind,
}

/// An opened, typed MySword module.
#[derive(Debug)]
pub struct Module {
    id: String,
    name: String,
    kind: ModuleKind,
    conn: Connection,
}

impl Module {
    /// Opens a module database read-only.
    ///
    /// SQLite reports "not actually a database" only on the first statement,
    /// so the catalog is probed here; arbitrary non-database bytes fail with
    /// a `Load` error and no module is produced.
    pub fn open(
        path: &Path,
        id: String,
        name: String,
        kind: ModuleKind,
    ) -> Result<Self, ModuleError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|err| ModuleError::Load(err.to_string()))?;
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(|err| ModuleError::Load(format!("not a readable module database: {err}")))?;
        Ok(Self {
            id,
            name,
            kind,
            conn,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ModuleKind {
        self.kind
    }

    pub fn meta(&self) -> ModuleMeta {
        ModuleMeta {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
        }
    }

    /// The underlying connection, for callers composing their own reads.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Verses of one chapter, ordered by number. Empty when absent.
    pub fn verses(&self, book_id: i64, chapter: i64) -> Vec<Verse> {
        bible::get_verses(&self.conn, book_id, chapter)
    }

    /// Highest chapter number for a book, 0 when absent.
    pub fn chapter_count(&self, book_id: i64) -> i64 {
        bible::get_chapter_count(&self.conn, book_id)
    }

    /// Highest verse number for a chapter, 0 when absent.
    pub fn verse_count(&self, book_id: i64, chapter: i64) -> i64 {
        bible::get_verse_count(&self.conn, book_id, chapter)
    }

    /// Annotation text covering a verse, if this module carries one.
    pub fn annotation(&self, book_id: i64, chapter: i64, verse: i64) -> Option<String> {
        annotations::get_annotation_text(&self.conn, book_id, chapter, verse)
    }
}
