//! Common test utilities for Modsmith integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Catalog whose `crm` module references a setup procedure nobody registered
#[allow(dead_code)]
pub const FAILING_CRM_CATALOG: &str = r"
version: 1
modules:
  - name: employees
    display_name: Employees
    category: human_resources
    tables:
      - name: employees
        columns: [id, name]
  - name: crm
    display_name: CRM
    category: crm
    dependencies: [employees]
    setup: broken
    tables:
      - name: crm_clients
        columns: [id, name]
";

/// Catalog with the cycle a -> b -> c -> a
#[allow(dead_code)]
pub const CYCLIC_CATALOG: &str = r"
version: 1
modules:
  - name: a
    display_name: A
    category: core
    dependencies: [b]
    tables: [{ name: a_main }]
  - name: b
    display_name: B
    category: core
    dependencies: [c]
    tables: [{ name: b_main }]
  - name: c
    display_name: C
    category: core
    dependencies: [a]
    tables: [{ name: c_main }]
";

/// A test home directory for integration tests
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    pub temp: TempDir,
    /// Path used as `MODSMITH_HOME`
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new, empty home directory
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file relative to the home directory
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Read a file relative to the home directory
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists relative to the home directory
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Point the settings file at a custom catalog
    pub fn use_catalog(&self, catalog_yaml: &str) -> PathBuf {
        let catalog = self.write_file("catalog.yaml", catalog_yaml);
        self.write_file("modsmith.yaml", "catalog: catalog.yaml\n");
        catalog
    }

    /// Lines of the audit log, or none when nothing was recorded yet
    pub fn audit_lines(&self) -> Vec<String> {
        if !self.file_exists("install.log") {
            return Vec::new();
        }
        self.read_file("install.log")
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// `modsmith` bound to this home, isolated from the caller's environment
    pub fn cmd(&self) -> Command {
        let mut cmd = modsmith_cmd();
        cmd.env("MODSMITH_HOME", &self.path);
        cmd
    }

    pub fn home(&self) -> &Path {
        &self.path
    }
}

/// The real `modsmith` binary with modsmith variables cleared
#[allow(deprecated)]
pub fn modsmith_cmd() -> Command {
    let mut cmd = Command::cargo_bin("modsmith").expect("modsmith binary");
    cmd.env_remove("MODSMITH_HOME")
        .env_remove("MODSMITH_USER")
        .env_remove("MODSMITH_LOG")
        .env_remove("RUST_LOG");
    cmd
}
