//! In-memory registry of opened modules
//!
//! Session-scoped map from module id to module. Each module sits behind its
//! own lock: the SQLite handle is exclusively owned, so concurrent logical
//! callers serialize per module rather than per registry.

use crate::module::{Module, ModuleMeta};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct ModuleRegistry {
    modules: Mutex<HashMap<String, Arc<Mutex<Module>>>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module and returns its id. Re-registering an id replaces
    /// the previous entry.
    pub fn register(&self, module: Module) -> String {
        let id = module.id().to_string();
        self.modules
            .lock()
            .expect("registry lock poisoned")
            .insert(id.clone(), Arc::new(Mutex::new(module)));
        id
    }

    pub fn get(&self, id: &str) -> Option<Arc<Mutex<Module>>> {
        self.modules
            .lock()
            .expect("registry lock poisoned")
            .get(id)
            .cloned()
    }

    pub fn remove(&self, id: &str) -> bool {
        self.modules
            .lock()
            .expect("registry lock poisoned")
            .remove(id)
            .is_some()
    }

    /// Metadata of every registered module, sorted by name.
    pub fn list(&self) -> Vec<ModuleMeta> {
        let modules = self.modules.lock().expect("registry lock poisoned");
        let mut metas: Vec<ModuleMeta> = modules
            .values()
            .map(|module| module.lock().expect("module lock poisoned").meta())
            .collect();
        metas.sort_by(|a, b| a.name.cmp(&b.name));
        metas
    }

    pub fn len(&self) -> usize {
        self.modules.lock().expect("registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
