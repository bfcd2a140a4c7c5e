//! Domain models for Modsmith
//!
//! This module contains pure domain objects representing core business entities.
//! These types are free of storage and I/O concerns and carry the invariants the
//! registry, resolver and installer rely on.

pub mod module;
pub mod outcome;

pub use module::{
    Category, Module, ModuleView, TableSchema, is_valid_module_name, is_valid_user_id,
};
pub use outcome::{InstallationReport, InstallationResult};
