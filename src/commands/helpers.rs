//! Command helper utilities

use std::collections::BTreeSet;

use crate::config::Settings;
use crate::config::settings::SettingsOverrides;
use crate::engine::ModuleManager;
use crate::error::{Result, fs};

/// Resolve settings from every layer
pub fn load_settings(overrides: &SettingsOverrides) -> Result<Settings> {
    Settings::load(overrides)
}

/// Manager over the configured storage, creating the data directory first
pub fn open_manager(settings: &Settings) -> Result<ModuleManager> {
    std::fs::create_dir_all(&settings.data_dir).map_err(|e| {
        fs::write_failed(settings.data_dir.display().to_string(), e.to_string())
    })?;
    ModuleManager::from_settings(settings)
}

/// Deduplicated, trimmed module names from the command line
pub fn selection(modules: &[String]) -> BTreeSet<String> {
    modules
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_selection_dedups_and_trims() {
        let names = selection(&[
            "crm".to_string(),
            " employees ".to_string(),
            "crm".to_string(),
            String::new(),
        ]);
        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec!["crm".to_string(), "employees".to_string()]
        );
    }

    #[test]
    fn test_open_manager_creates_data_dir() {
        let temp = TempDir::new().expect("tempdir");
        let settings = Settings::defaults(temp.path().join("nested").join("home"));
        let mut manager = open_manager(&settings).expect("manager");
        assert!(settings.data_dir.is_dir());
        assert!(manager.installed_modules().expect("installed").is_empty());
    }
}
