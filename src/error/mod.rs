//! Error types and handling for Modsmith
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`module`]: Module registry and catalog errors
//! - [`deps`]: Selection and dependency errors
//! - [`storage`]: Storage backend errors
//! - [`audit`]: Audit log errors
//! - [`config`]: Configuration errors
//! - [`fs`]: File system errors
//!
//! Failures of an individual module's setup procedure are deliberately absent:
//! the installer turns them into failed `InstallationResult`s instead.

#[macro_use]
mod macros;

pub mod audit;
pub mod config;
pub mod deps;
pub mod fs;
pub mod module;
pub mod storage;

use std::collections::BTreeMap;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Modsmith operations
#[derive(Error, Diagnostic, Debug)]
pub enum ModsmithError {
    // Module errors
    #[error("Module '{name}' not found")]
    #[diagnostic(
        code(modsmith::module::not_found),
        help("Run 'modsmith list' to see the modules in the catalog")
    )]
    ModuleNotFound { name: String },

    #[error("Invalid module name: {name}")]
    #[diagnostic(
        code(modsmith::module::invalid_name),
        help("Module names may only contain lowercase letters, digits, '_' and '-'")
    )]
    InvalidModuleName { name: String },

    #[error("Module catalog is invalid: {message}")]
    #[diagnostic(code(modsmith::module::catalog_invalid))]
    CatalogInvalid { message: String },

    // Selection and dependency errors
    #[error("Selection is missing dependencies: {summary}")]
    #[diagnostic(
        code(modsmith::deps::incomplete_selection),
        help("Add the missing modules to the selection, or pass --with-deps to add them explicitly")
    )]
    IncompleteSelection {
        missing: BTreeMap<String, Vec<String>>,
        summary: String,
    },

    #[error("Circular dependency detected among modules: {chain}")]
    #[diagnostic(
        code(modsmith::deps::circular),
        help("Remove the circular dependency from the module catalog")
    )]
    CircularDependency { modules: Vec<String>, chain: String },

    #[error("Invalid user id: '{user_id}'")]
    #[diagnostic(
        code(modsmith::deps::invalid_user),
        help("User ids must be non-empty and must not contain '|' or line breaks")
    )]
    InvalidUserId { user_id: String },

    // Installation summary (only used to drive the CLI exit status)
    #[error("Installation finished with failed modules: {failed}")]
    #[diagnostic(
        code(modsmith::install::incomplete),
        help("Fix the reported problems and re-run the install for the failed modules only")
    )]
    InstallationIncomplete { failed: String },

    // Storage errors
    #[error("Storage backend unavailable at {location}: {reason}")]
    #[diagnostic(
        code(modsmith::storage::unavailable),
        help("Check that the storage location exists and is readable")
    )]
    StorageUnavailable { location: String, reason: String },

    #[error("Storage catalog at {location} is corrupt: {reason}")]
    #[diagnostic(code(modsmith::storage::corrupt))]
    StorageCorrupt { location: String, reason: String },

    #[error("Failed to write storage catalog at {location}: {reason}")]
    #[diagnostic(code(modsmith::storage::write_failed))]
    StorageWriteFailed { location: String, reason: String },

    // Audit log errors
    #[error("Failed to append to audit log {path}: {reason}")]
    #[diagnostic(code(modsmith::audit::write_failed))]
    AuditWriteFailed { path: String, reason: String },

    #[error("Malformed audit log line: {line}")]
    #[diagnostic(code(modsmith::audit::parse_failed))]
    AuditParseFailed { line: String, reason: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(modsmith::config::not_found))]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(modsmith::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(modsmith::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(modsmith::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(modsmith::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}")]
    #[diagnostic(code(modsmith::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(modsmith::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(modsmith::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for ModsmithError {
    fn from(err: std::io::Error) -> Self {
        ModsmithError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ModsmithError {
    fn from(err: serde_yaml::Error) -> Self {
        ModsmithError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ModsmithError {
    fn from(err: serde_json::Error) -> Self {
        ModsmithError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for ModsmithError {
    fn from(err: inquire::InquireError) -> Self {
        ModsmithError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ModsmithError>;

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_error_contains {
        ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
            #[test]
            fn $test_name() {
                let err = $err;
                let error_string = err.to_string();
                $(
                    assert!(error_string.contains($contains),
                        "Error message should contain '{}', got: {}",
                        $contains,
                        error_string
                    );
                )+
            }
        };
    }

    #[test]
    fn test_error_display() {
        let err = ModsmithError::ModuleNotFound {
            name: "crm".to_string(),
        };
        assert_eq!(err.to_string(), "Module 'crm' not found");
    }

    #[test]
    fn test_error_code() {
        let err = ModsmithError::ModuleNotFound {
            name: "crm".to_string(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("modsmith::module::not_found".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ModsmithError = io_err.into();
        assert!(matches!(err, ModsmithError::IoError { .. }));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let parse_result: std::result::Result<serde_yaml::Value, _> =
            serde_yaml::from_str("invalid: yaml: content: [unclosed");
        let err: ModsmithError = parse_result.unwrap_err().into();
        assert!(matches!(err, ModsmithError::ConfigParseFailed { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("invalid json content");
        let err: ModsmithError = parse_result.unwrap_err().into();
        assert!(matches!(err, ModsmithError::ConfigParseFailed { .. }));
    }

    test_error_contains!(
        test_circular_dependency_names_modules,
        deps::circular(vec!["a".to_string(), "b".to_string(), "c".to_string()]),
        "Circular dependency",
        "a, b, c"
    );

    test_error_contains!(
        test_storage_unavailable_message,
        storage::unavailable("/srv/db/schema.json", "No such file or directory"),
        "Storage backend unavailable",
        "/srv/db/schema.json"
    );

    test_error_contains!(
        test_audit_write_failed_message,
        audit::write_failed("/var/log/modsmith.log", "read-only file system"),
        "audit log",
        "read-only"
    );

    #[test]
    fn test_incomplete_selection_summary() {
        let mut missing = BTreeMap::new();
        missing.insert("crm".to_string(), vec!["employees".to_string()]);
        missing.insert(
            "invoicing".to_string(),
            vec!["catalog".to_string(), "crm".to_string()],
        );
        let err = deps::incomplete_selection(missing.clone());
        match &err {
            ModsmithError::IncompleteSelection {
                missing: got,
                summary,
            } => {
                assert_eq!(got, &missing);
                assert_eq!(
                    summary,
                    "crm needs employees; invoicing needs catalog, crm"
                );
            }
            other => panic!("Expected IncompleteSelection, got {other:?}"),
        }
    }

    #[test]
    fn test_module_not_found_constructor() {
        let err = module::not_found("payroll");
        assert!(matches!(err, ModsmithError::ModuleNotFound { .. }));
        assert!(err.to_string().contains("payroll"));
    }

    #[test]
    fn test_config_constructors() {
        assert!(matches!(
            config::not_found("/etc/modsmith.yaml"),
            ModsmithError::ConfigNotFound { .. }
        ));
        assert!(matches!(
            config::invalid("user must not be empty"),
            ModsmithError::ConfigInvalid { .. }
        ));
    }

    #[test]
    fn test_io_error_constructor() {
        let err = fs::io_error("disk full");
        assert!(err.to_string().contains("IO error: disk full"));
    }
}
