//! In-memory storage backend for tests and dry runs

use std::collections::BTreeMap;

use super::StorageBackend;
use crate::domain::TableSchema;
use crate::error::{Result, storage};

/// Tables held in a map; can be switched offline to simulate an outage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    tables: BTreeMap<String, Vec<String>>,
    offline: Option<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with bare tables
    pub fn with_tables<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            tables: names
                .into_iter()
                .map(|n| (n.to_string(), Vec::new()))
                .collect(),
            offline: None,
        }
    }

    /// Copy every table of another backend, for dry runs against real state
    pub fn snapshot_of(backend: &dyn StorageBackend) -> Result<Self> {
        Ok(Self::with_tables(backend.tables()?.iter().map(String::as_str)))
    }

    /// Make every call fail with `StorageUnavailable`
    pub fn set_offline(&mut self, reason: impl Into<String>) {
        self.offline = Some(reason.into());
    }

    pub fn set_online(&mut self) {
        self.offline = None;
    }

    /// Columns of a created table
    pub fn columns(&self, table: &str) -> Option<&[String]> {
        self.tables.get(table).map(Vec::as_slice)
    }

    fn check_online(&self) -> Result<()> {
        match &self.offline {
            Some(reason) => Err(storage::unavailable(self.location(), reason)),
            None => Ok(()),
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn table_exists(&self, name: &str) -> Result<bool> {
        self.check_online()?;
        Ok(self.tables.contains_key(name))
    }

    fn create_table(&mut self, schema: &TableSchema) -> Result<()> {
        self.check_online()?;
        self.tables
            .entry(schema.name.clone())
            .or_insert_with(|| schema.columns.clone());
        Ok(())
    }

    fn tables(&self) -> Result<Vec<String>> {
        self.check_online()?;
        Ok(self.tables.keys().cloned().collect())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
