//! Storage backends
//!
//! Modsmith only needs three things from a database: whether a table exists,
//! a way to create one from its schema descriptor, and the list of tables.
//! Everything else about the engine stays behind this trait.

pub mod file;
pub mod memory;
pub mod probe;

use crate::domain::TableSchema;
use crate::error::Result;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use probe::{InstalledStateProber, TableCache};

/// Schema-level access to the target database
///
/// Implementations must report an unreachable backend as
/// `StorageUnavailable`, never as a missing table.
pub trait StorageBackend: Send {
    /// Check whether a table exists
    fn table_exists(&self, name: &str) -> Result<bool>;

    /// Create a table; creating an existing table is a no-op
    fn create_table(&mut self, schema: &TableSchema) -> Result<()>;

    /// All table names, sorted
    fn tables(&self) -> Result<Vec<String>>;

    /// Human readable location used in log lines and errors
    fn location(&self) -> String;
}
