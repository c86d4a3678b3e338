//! mysword-reader - MySword module reading
//!
//! Library for opening MySword-format SQLite modules (Bible translations,
//! commentaries, dictionaries, cross-references) and turning their embedded
//! markup into clean, displayable text.

pub mod annotations;
pub mod bible;
pub mod books;
pub mod error;
pub mod markup;
pub mod module;
pub mod registry;
pub mod schema;
pub mod store;

pub use bible::Verse;
pub use error::ModuleError;
pub use markup::Normalized;
pub use module::{Module, ModuleKind, ModuleMeta};
pub use registry::ModuleRegistry;
pub use store::ModuleStore;
