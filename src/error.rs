//! Error types for module import and storage
//!
//! Query-time faults never surface here: the readers absorb them and return
//! empty results, so the only fallible public operations are importing,
//! reopening, and removing modules.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModuleError {
    /// The bytes or file could not be opened as a module database.
    #[error("Load error: {0}")]
    Load(String),

    /// Filesystem or manifest fault in the module store.
    #[error("Storage error: {0}")]
    Storage(String),

    /// No module with the given id is known.
    #[error("Unknown module: {0}")]
    UnknownModule(String),
}
