//! Installer settings (modsmith.yaml)
//!
//! Settings are layered, lowest precedence first:
//! 1. built-in defaults rooted at the data directory
//! 2. the settings file (`<data dir>/modsmith.yaml` or `--config`)
//! 3. environment (`MODSMITH_HOME`, `MODSMITH_USER`)
//! 4. command line flags
//!
//! Relative paths in the settings file resolve against the file's directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::paths::{self, AUDIT_LOG_FILE, PROGRESS_FILE, SETTINGS_FILE, STORAGE_FILE};
use crate::domain::is_valid_user_id;
use crate::error::{Result, config};

/// User recorded in the audit log when nobody else is configured
pub const DEFAULT_USER: &str = "admin";

/// On-disk shape of `modsmith.yaml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    /// Module catalog to load instead of the built-in one
    pub catalog: Option<PathBuf>,
    /// File-backed storage catalog
    pub storage: Option<PathBuf>,
    pub audit_log: Option<PathBuf>,
    pub progress_file: Option<PathBuf>,
    pub user: Option<String>,
}

impl SettingsFile {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub user: Option<String>,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    /// `None` means the built-in catalog
    pub catalog: Option<PathBuf>,
    pub storage: PathBuf,
    pub audit_log: PathBuf,
    pub progress_file: PathBuf,
    pub user: String,
}

impl Settings {
    /// Defaults rooted at `data_dir`
    pub fn defaults(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            catalog: None,
            storage: data_dir.join(STORAGE_FILE),
            audit_log: data_dir.join(AUDIT_LOG_FILE),
            progress_file: data_dir.join(PROGRESS_FILE),
            user: DEFAULT_USER.to_string(),
            data_dir,
        }
    }

    /// Resolve settings from every layer
    pub fn load(overrides: &SettingsOverrides) -> Result<Self> {
        let data_dir = match &overrides.data_dir {
            Some(dir) => dir.clone(),
            None => paths::data_dir()?,
        };
        let env_user = std::env::var(paths::USER_ENV).ok();
        Self::load_layers(data_dir, overrides, env_user)
    }

    fn load_layers(
        data_dir: PathBuf,
        overrides: &SettingsOverrides,
        env_user: Option<String>,
    ) -> Result<Self> {
        let mut settings = Self::defaults(&data_dir);

        // An explicit --config must exist; the default location is optional
        let (config_path, required) = match &overrides.config {
            Some(path) => (path.clone(), true),
            None => (data_dir.join(SETTINGS_FILE), false),
        };
        if config_path.is_file() {
            let file = read_settings_file(&config_path)?;
            let base = config_path
                .parent()
                .map_or_else(|| data_dir.clone(), Path::to_path_buf);
            settings.apply_file(file, &base);
            tracing::debug!(path = %config_path.display(), "loaded settings file");
        } else if required {
            return Err(config::not_found(config_path.display().to_string()));
        }

        if let Some(user) = env_user.filter(|u| !u.is_empty()) {
            settings.user = user;
        }

        if let Some(catalog) = &overrides.catalog {
            settings.catalog = Some(catalog.clone());
        }
        if let Some(user) = &overrides.user {
            settings.user.clone_from(user);
        }

        settings.validate()?;
        Ok(settings)
    }

    fn apply_file(&mut self, file: SettingsFile, base: &Path) {
        if let Some(catalog) = file.catalog {
            self.catalog = Some(paths::resolve_relative(base, &catalog));
        }
        if let Some(storage) = file.storage {
            self.storage = paths::resolve_relative(base, &storage);
        }
        if let Some(audit_log) = file.audit_log {
            self.audit_log = paths::resolve_relative(base, &audit_log);
        }
        if let Some(progress_file) = file.progress_file {
            self.progress_file = paths::resolve_relative(base, &progress_file);
        }
        if let Some(user) = file.user {
            self.user = user;
        }
    }

    /// Validate the resolved settings
    pub fn validate(&self) -> Result<()> {
        if !is_valid_user_id(&self.user) {
            return Err(config::invalid(format!(
                "user '{}' must be non-empty and must not contain '|' or line breaks",
                self.user
            )));
        }
        if self.storage == self.audit_log {
            return Err(config::invalid(
                "storage and audit_log must point to different files",
            ));
        }
        Ok(())
    }
}

fn read_settings_file(path: &Path) -> Result<SettingsFile> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| config::read_failed(path.display().to_string(), e.to_string()))?;
    SettingsFile::from_yaml(&content)
        .map_err(|e| config::parse_failed(path.display().to_string(), e.to_string()))
}
