//! Installed-state probing
//!
//! A module is installed exactly when every table it owns exists. Probe
//! results are memoized in a [`TableCache`] owned by the prober. The cache
//! lives for one request: the module manager invalidates it when a request
//! starts, and the installer invalidates it after every setup attempt.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::StorageBackend;
use crate::domain::Module;
use crate::error::Result;
use crate::registry::ModuleRegistry;

/// Memoized table-existence answers
#[derive(Debug, Default)]
pub struct TableCache {
    entries: HashMap<String, bool>,
}

impl TableCache {
    pub fn get(&self, table: &str) -> Option<bool> {
        self.entries.get(table).copied()
    }

    pub fn insert(&mut self, table: impl Into<String>, exists: bool) {
        self.entries.insert(table.into(), exists);
    }

    /// Forget every cached answer
    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read-only installed-state checks over a storage backend
pub struct InstalledStateProber {
    storage: Box<dyn StorageBackend>,
    cache: TableCache,
}

impl InstalledStateProber {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            storage,
            cache: TableCache::default(),
        }
    }

    /// Whether every table owned by `module` exists
    ///
    /// Backend errors propagate; they never read as "not installed".
    pub fn is_installed(&mut self, module: &Module) -> Result<bool> {
        for table in module.table_names() {
            if !self.table_exists(table)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Installed flag for every registry module
    pub fn installed_states(&mut self, registry: &ModuleRegistry) -> Result<BTreeMap<String, bool>> {
        let mut states = BTreeMap::new();
        for (name, module) in registry.list_modules() {
            states.insert(name.clone(), self.is_installed(module)?);
        }
        Ok(states)
    }

    /// Names of the installed registry modules
    pub fn installed_set(&mut self, registry: &ModuleRegistry) -> Result<BTreeSet<String>> {
        Ok(self
            .installed_states(registry)?
            .into_iter()
            .filter_map(|(name, installed)| installed.then_some(name))
            .collect())
    }

    fn table_exists(&mut self, table: &str) -> Result<bool> {
        if let Some(exists) = self.cache.get(table) {
            return Ok(exists);
        }
        let exists = self.storage.table_exists(table)?;
        tracing::debug!(table, exists, "probed table");
        self.cache.insert(table, exists);
        Ok(exists)
    }

    /// Drop every cached probe result
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    pub fn cache(&self) -> &TableCache {
        &self.cache
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    /// Mutable backend access for setup procedures
    pub fn storage_mut(&mut self) -> &mut dyn StorageBackend {
        self.storage.as_mut()
    }
}

impl std::fmt::Debug for InstalledStateProber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstalledStateProber")
            .field("storage", &self.storage.location())
            .field("cache", &self.cache)
            .finish()
    }
}
