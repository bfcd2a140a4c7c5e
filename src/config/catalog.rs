//! Module catalog (catalog.yaml) data structures
//!
//! The catalog is the static, versioned table of module descriptors. It is
//! read once at startup and turned into an immutable `ModuleRegistry`.
//!
//! ```yaml
//! version: 1
//! modules:
//!   - name: crm
//!     display_name: CRM
//!     description: Clients, contacts and opportunities
//!     icon: handshake
//!     category: crm
//!     dependencies: [employees]
//!     setup: create_tables
//!     tables:
//!       - name: crm_clients
//!         columns: [id, name, owner_id]
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{Category, Module, TableSchema, is_valid_module_name};
use crate::error::{Result, module};

/// Catalog format version understood by this build
pub const CATALOG_VERSION: u32 = 1;

/// Setup procedure used when a module entry does not name one
pub const DEFAULT_SETUP: &str = "create_tables";

fn default_setup() -> String {
    DEFAULT_SETUP.to_string()
}

fn default_schema_version() -> u32 {
    1
}

/// Top-level catalog document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog format version
    pub version: u32,

    /// Module descriptors
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
}

/// A single module descriptor as written in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub name: String,

    pub display_name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub icon: String,

    pub category: Category,

    pub tables: Vec<TableSchema>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// Name of the registered setup procedure
    #[serde(default = "default_setup")]
    pub setup: String,

    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

impl CatalogConfig {
    /// Parse a catalog from YAML and validate every entry
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the catalog to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate format version and each entry on its own
    ///
    /// Cross-module rules (unique names, dependency targets, table ownership)
    /// are checked when the registry is built.
    pub fn validate(&self) -> Result<()> {
        if self.version != CATALOG_VERSION {
            return Err(module::catalog_invalid(format!(
                "unsupported catalog version {} (expected {CATALOG_VERSION})",
                self.version
            )));
        }
        for entry in &self.modules {
            entry.validate()?;
        }
        Ok(())
    }
}

impl ModuleEntry {
    /// Validate this descriptor in isolation
    pub fn validate(&self) -> Result<()> {
        if !is_valid_module_name(&self.name) {
            return Err(module::invalid_name(&self.name));
        }

        if self.display_name.trim().is_empty() {
            return Err(module::catalog_invalid(format!(
                "module '{}' has an empty display_name",
                self.name
            )));
        }

        if self.tables.is_empty() {
            return Err(module::catalog_invalid(format!(
                "module '{}' must own at least one table",
                self.name
            )));
        }

        let mut seen_tables = BTreeSet::new();
        for table in &self.tables {
            if table.name.trim().is_empty() {
                return Err(module::catalog_invalid(format!(
                    "module '{}' declares a table without a name",
                    self.name
                )));
            }
            if !seen_tables.insert(table.name.as_str()) {
                return Err(module::catalog_invalid(format!(
                    "module '{}' declares table '{}' twice",
                    self.name, table.name
                )));
            }
            let mut seen_columns = BTreeSet::new();
            for column in &table.columns {
                if !seen_columns.insert(column.as_str()) {
                    return Err(module::catalog_invalid(format!(
                        "table '{}' of module '{}' declares column '{column}' twice",
                        table.name, self.name
                    )));
                }
            }
        }

        if self.setup.trim().is_empty() {
            return Err(module::catalog_invalid(format!(
                "module '{}' has an empty setup reference",
                self.name
            )));
        }

        Ok(())
    }

    /// Convert into the immutable domain module
    pub fn into_module(self) -> Module {
        Module {
            name: self.name,
            display_name: self.display_name,
            description: self.description,
            icon: self.icon,
            category: self.category,
            tables: self.tables,
            dependencies: self.dependencies.into_iter().collect(),
            setup: self.setup,
            schema_version: self.schema_version,
        }
    }
}
