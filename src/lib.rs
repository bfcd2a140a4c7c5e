//! Modsmith - dependency-aware module installer
//!
//! Discovers optional application modules, validates that a selection carries
//! its dependencies, installs the selection in dependency order and records
//! every attempt in an append-only audit log.
//!
//! [`ModuleManager`] is the entry point for library callers; the `modsmith`
//! binary is a thin front end over it.

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod installer;
pub mod logging;
pub mod registry;
pub mod resolver;
pub mod storage;
pub mod ui;

pub use engine::{ModuleFilter, ModuleManager, SubmissionOutcome};
pub use error::{ModsmithError, Result};
