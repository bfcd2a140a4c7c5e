//! Module registry
//!
//! The registry is the immutable, validated catalog of every installable
//! module. It is built once from a catalog document and only read afterwards.

pub mod builtin;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::config::CatalogConfig;
use crate::domain::{Module, is_valid_module_name};
use crate::error::{Result, config, module};

pub use builtin::BUILTIN_CATALOG;

/// Immutable catalog of modules keyed by name
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, Module>,
}

impl ModuleRegistry {
    /// Registry built from the catalog compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    /// Load a catalog file from disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(config::not_found(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| config::read_failed(path.display().to_string(), e.to_string()))?;
        let registry = Self::from_yaml(&content).map_err(|e| match e {
            crate::error::ModsmithError::ConfigParseFailed { reason, .. } => {
                config::parse_failed(path.display().to_string(), reason)
            }
            other => other,
        })?;
        tracing::debug!(
            path = %path.display(),
            modules = registry.len(),
            "loaded module catalog"
        );
        Ok(registry)
    }

    /// Load from the given catalog path, or the built-in catalog when `None`
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    /// Parse and validate a catalog document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let catalog = CatalogConfig::from_yaml(yaml)?;
        Self::from_modules(
            catalog
                .modules
                .into_iter()
                .map(crate::config::ModuleEntry::into_module),
        )
    }

    /// Build a registry from already constructed modules
    ///
    /// Checks the rules that span modules: unique names, unique table
    /// ownership and known dependency targets. Dependency cycles are accepted
    /// here and reported by the planner when a selection touches them.
    pub fn from_modules(modules: impl IntoIterator<Item = Module>) -> Result<Self> {
        let mut by_name = BTreeMap::new();
        let mut table_owner: BTreeMap<String, String> = BTreeMap::new();

        for m in modules {
            if !is_valid_module_name(&m.name) {
                return Err(module::invalid_name(&m.name));
            }
            if m.tables.is_empty() {
                return Err(module::catalog_invalid(format!(
                    "module '{}' must own at least one table",
                    m.name
                )));
            }
            for table in m.table_names() {
                if let Some(owner) = table_owner.insert(table.to_string(), m.name.clone()) {
                    return Err(module::catalog_invalid(format!(
                        "table '{table}' is owned by both '{owner}' and '{}'",
                        m.name
                    )));
                }
            }
            if by_name.contains_key(&m.name) {
                return Err(module::catalog_invalid(format!(
                    "module '{}' is declared more than once",
                    m.name
                )));
            }
            by_name.insert(m.name.clone(), m);
        }

        for m in by_name.values() {
            let unknown: BTreeSet<&str> = m
                .dependencies
                .iter()
                .filter(|dep| !by_name.contains_key(*dep))
                .map(String::as_str)
                .collect();
            if !unknown.is_empty() {
                return Err(module::catalog_invalid(format!(
                    "module '{}' depends on unknown modules: {}",
                    m.name,
                    unknown.into_iter().collect::<Vec<_>>().join(", ")
                )));
            }
        }

        Ok(Self { modules: by_name })
    }

    /// The full catalog
    pub fn list_modules(&self) -> &BTreeMap<String, Module> {
        &self.modules
    }

    /// Look up one module
    pub fn get(&self, name: &str) -> Result<&Module> {
        self.modules
            .get(name)
            .ok_or_else(|| module::not_found(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
