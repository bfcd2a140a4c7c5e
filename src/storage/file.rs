//! File-backed storage backend
//!
//! Keeps the schema catalog of a database as a JSON document:
//!
//! ```json
//! { "version": 1, "tables": { "employees": { "columns": ["id", "name"] } } }
//! ```
//!
//! A missing file is an empty database. A missing parent directory means the
//! backend is unreachable.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::StorageBackend;
use crate::domain::TableSchema;
use crate::error::{Result, storage};

const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SchemaDocument {
    version: u32,
    #[serde(default)]
    tables: BTreeMap<String, TableEntry>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TableEntry {
    #[serde(default)]
    columns: Vec<String>,
}

/// Storage backed by a JSON schema file
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<SchemaDocument> {
        let parent_missing = self
            .path
            .parent()
            .is_some_and(|p| !p.as_os_str().is_empty() && !p.is_dir());
        if parent_missing {
            return Err(storage::unavailable(
                self.location(),
                "parent directory does not exist",
            ));
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SchemaDocument {
                    version: SCHEMA_VERSION,
                    tables: BTreeMap::new(),
                });
            }
            Err(e) => return Err(storage::unavailable(self.location(), e.to_string())),
        };

        if content.trim().is_empty() {
            return Ok(SchemaDocument {
                version: SCHEMA_VERSION,
                tables: BTreeMap::new(),
            });
        }

        let doc: SchemaDocument = serde_json::from_str(&content)
            .map_err(|e| storage::corrupt(self.location(), e.to_string()))?;
        if doc.version != SCHEMA_VERSION {
            return Err(storage::corrupt(
                self.location(),
                format!("unsupported schema file version {}", doc.version),
            ));
        }
        Ok(doc)
    }

    /// Replace the schema file atomically
    fn write_document(&self, doc: &SchemaDocument) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| storage::write_failed(self.location(), e.to_string()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| storage::write_failed(self.location(), e.to_string()))?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| tmp.write_all(b"\n"))
            .map_err(|e| storage::write_failed(self.location(), e.to_string()))?;
        tmp.persist(&self.path)
            .map_err(|e| storage::write_failed(self.location(), e.error.to_string()))?;
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn table_exists(&self, name: &str) -> Result<bool> {
        Ok(self.read_document()?.tables.contains_key(name))
    }

    fn create_table(&mut self, schema: &TableSchema) -> Result<()> {
        let mut doc = self.read_document()?;
        if doc.tables.contains_key(&schema.name) {
            return Ok(());
        }
        doc.tables.insert(
            schema.name.clone(),
            TableEntry {
                columns: schema.columns.clone(),
            },
        );
        self.write_document(&doc)?;
        tracing::debug!(table = %schema.name, path = %self.path.display(), "created table");
        Ok(())
    }

    fn tables(&self) -> Result<Vec<String>> {
        Ok(self.read_document()?.tables.into_keys().collect())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
