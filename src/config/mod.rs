//! Configuration file handling for Modsmith
//!
//! This module contains data structures for:
//! - the module catalog (`catalog.yaml`) - module metadata and schema descriptors
//! - `modsmith.yaml` - installer settings (storage, audit log, default user)
//! - data directory layout and environment overrides

pub mod catalog;
pub mod paths;
pub mod settings;

// Re-export commonly used types
pub use catalog::{CATALOG_VERSION, CatalogConfig, ModuleEntry};
pub use settings::Settings;
