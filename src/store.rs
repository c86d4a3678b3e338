//! On-disk persistence of imported module files
//!
//! Imported raw bytes are kept byte-for-byte under the store directory, one
//! file per module, because SQLite needs an exact copy of the original
//! binary structure to reopen it. A `modules.json` manifest maps module ids
//! to their name, kind and backing file so a later session can reopen the
//! same modules identically.

use crate::error::ModuleError;
use crate::module::{display_name, Module, ModuleKind, ModuleMeta};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const MANIFEST_FILE: &str = "modules.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct Manifest {
    modules: HashMap<String, ManifestEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ManifestEntry {
    name: String,
    kind: ModuleKind,
    file: String,
    imported_at: String,
}

/// File-backed store of imported modules.
pub struct ModuleStore {
    dir: PathBuf,
}

impl ModuleStore {
    /// Opens (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ModuleError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|err| ModuleError::Storage(format!("creating {}: {err}", dir.display())))?;
        Ok(Self { dir })
    }

    /// Platform default store directory.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join("mysword-reader").join("modules"))
            .unwrap_or_else(|| PathBuf::from("modules"))
    }

    /// Imports raw module bytes under their original filename.
    ///
    /// Classifies by filename, persists the bytes, then opens the database.
    /// If the bytes are not a readable database the file is removed again and
    /// the import fails with `Load`; no partial module remains registered.
    pub fn import(&self, bytes: &[u8], file_name: &str) -> Result<Module, ModuleError> {
        let kind = ModuleKind::from_file_name(file_name);
        let name = display_name(file_name);
        let id = module_id(kind, &name);
        let file = format!("{id}.mybible");
        let path = self.dir.join(&file);

        fs::write(&path, bytes)
            .map_err(|err| ModuleError::Storage(format!("writing {}: {err}", path.display())))?;

        let module = match Module::open(&path, id.clone(), name.clone(), kind) {
            Ok(module) => module,
            Err(err) => {
                let _ = fs::remove_file(&path);
                return Err(err);
            }
        };

        let mut manifest = self.load_manifest();
        manifest.modules.insert(
            id,
            ManifestEntry {
                name,
                kind,
                file,
                imported_at: chrono::Utc::now().to_rfc3339(),
            },
        );
        self.save_manifest(&manifest)
            .map_err(|err| ModuleError::Storage(format!("{err:#}")))?;
        Ok(module)
    }

    /// Reopens a previously imported module by id.
    pub fn reopen(&self, id: &str) -> Result<Module, ModuleError> {
        let manifest = self.load_manifest();
        let entry = manifest
            .modules
            .get(id)
            .ok_or_else(|| ModuleError::UnknownModule(id.to_string()))?;
        Module::open(
            &self.dir.join(&entry.file),
            id.to_string(),
            entry.name.clone(),
            entry.kind,
        )
    }

    /// Reopens every module in the manifest, skipping ones that fail.
    pub fn reopen_all(&self) -> Vec<Module> {
        let manifest = self.load_manifest();
        let mut modules = Vec::new();
        for (id, entry) in &manifest.modules {
            match Module::open(
                &self.dir.join(&entry.file),
                id.clone(),
                entry.name.clone(),
                entry.kind,
            ) {
                Ok(module) => modules.push(module),
                Err(err) => warn!(id, "skipping stored module: {err}"),
            }
        }
        modules.sort_by(|a, b| a.name().cmp(b.name()));
        modules
    }

    /// Stored metadata, sorted by name.
    pub fn list(&self) -> Vec<ModuleMeta> {
        let manifest = self.load_manifest();
        let mut metas: Vec<ModuleMeta> = manifest
            .modules
            .into_iter()
            .map(|(id, entry)| ModuleMeta {
                id,
                name: entry.name,
                kind: entry.kind,
            })
            .collect();
        metas.sort_by(|a, b| a.name.cmp(&b.name));
        metas
    }

    /// The exact bytes a module was imported with.
    pub fn raw_bytes(&self, id: &str) -> Result<Vec<u8>, ModuleError> {
        let manifest = self.load_manifest();
        let entry = manifest
            .modules
            .get(id)
            .ok_or_else(|| ModuleError::UnknownModule(id.to_string()))?;
        let path = self.dir.join(&entry.file);
        fs::read(&path)
            .map_err(|err| ModuleError::Storage(format!("reading {}: {err}", path.display())))
    }

    /// Removes a module's bytes and manifest entry.
    pub fn remove(&self, id: &str) -> Result<(), ModuleError> {
        let mut manifest = self.load_manifest();
        let entry = manifest
            .modules
            .remove(id)
            .ok_or_else(|| ModuleError::UnknownModule(id.to_string()))?;
        let path = self.dir.join(&entry.file);
        if let Err(err) = fs::remove_file(&path) {
            warn!(id, "removing {}: {err}", path.display());
        }
        self.save_manifest(&manifest)
            .map_err(|err| ModuleError::Storage(format!("{err:#}")))
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    // A missing or unreadable manifest is an empty store.
    fn load_manifest(&self) -> Manifest {
        let path = self.manifest_path();
        if !path.exists() {
            return Manifest::default();
        }
        match read_manifest(&path) {
            Ok(manifest) => manifest,
            Err(err) => {
                warn!("manifest unreadable, treating store as empty: {err:#}");
                Manifest::default()
            }
        }
    }

    fn save_manifest(&self, manifest: &Manifest) -> Result<()> {
        let json = serde_json::to_string_pretty(manifest).context("serializing manifest")?;
        fs::write(self.manifest_path(), json).context("writing manifest")?;
        Ok(())
    }
}

fn read_manifest(path: &Path) -> Result<Manifest> {
    let json = fs::read_to_string(path).context("reading manifest")?;
    serde_json::from_str(&json).context("parsing manifest")
}

/// Unique per import, stable for the session: kind token, name slug,
/// import timestamp, plus a process-wide counter so imports within the same
/// millisecond stay distinct.
fn module_id(kind: ModuleKind, name: &str) -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let slug: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let sequence = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!(
        "{}-{}-{}-{}",
        kind.token(),
        slug,
        chrono::Utc::now().timestamp_millis(),
        sequence
    )
}
