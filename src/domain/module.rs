//! Module domain types
//!
//! A module is a named, installable unit owning a set of database tables and
//! an optional set of prerequisite modules.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Functional area a module belongs to (fixed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Core,
    Sales,
    Crm,
    Inventory,
    Purchasing,
    Finance,
    HumanResources,
    Reporting,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 8] = [
        Category::Core,
        Category::Sales,
        Category::Crm,
        Category::Inventory,
        Category::Purchasing,
        Category::Finance,
        Category::HumanResources,
        Category::Reporting,
    ];

    /// Stable identifier used in catalogs and on the command line
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Core => "core",
            Category::Sales => "sales",
            Category::Crm => "crm",
            Category::Inventory => "inventory",
            Category::Purchasing => "purchasing",
            Category::Finance => "finance",
            Category::HumanResources => "human_resources",
            Category::Reporting => "reporting",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| {
                let known: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
                format!("unknown category '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// Schema descriptor for one owned table
///
/// Columns are declared up front so setup procedures never need to inspect
/// live storage structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<String>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

/// An installable module, immutable once loaded into the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Unique key
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub icon: String,
    pub category: Category,
    /// Owned tables, in creation order. Never empty.
    pub tables: Vec<TableSchema>,
    /// Names of modules whose tables must exist first
    pub dependencies: BTreeSet<String>,
    /// Reference to the setup procedure that creates this module's schema
    pub setup: String,
    /// Version of the schema descriptor in `tables`
    pub schema_version: u32,
}

impl Module {
    /// Owned table identifiers, in declaration order
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }
}

/// Caller-facing view of a module merged with its installed flag
///
/// Every field is always present; callers treat a missing field as a defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleView {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub icon: String,
    pub category: Category,
    pub tables: Vec<String>,
    pub dependencies: Vec<String>,
    pub installed: bool,
}

impl ModuleView {
    pub fn new(module: &Module, installed: bool) -> Self {
        Self {
            name: module.name.clone(),
            display_name: module.display_name.clone(),
            description: module.description.clone(),
            icon: module.icon.clone(),
            category: module.category,
            tables: module.table_names().map(str::to_string).collect(),
            dependencies: module.dependencies.iter().cloned().collect(),
            installed,
        }
    }
}

/// Check that a module name is a non-empty `[a-z0-9_-]+` identifier
///
/// The restriction keeps names safe inside audit log lines and CLI output.
pub fn is_valid_module_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

/// Check that a user id can be recorded in an audit line
///
/// Must be non-empty and free of the `|` field separator and line breaks.
pub fn is_valid_user_id(user_id: &str) -> bool {
    !user_id.trim().is_empty() && !user_id.contains(['|', '\n', '\r'])
}
