//! Version command implementation

use crate::config::CATALOG_VERSION;
use crate::config::paths::{self, HOME_ENV};
use crate::error::Result;
use crate::registry::ModuleRegistry;

/// Run version command
pub fn run() -> Result<()> {
    for line in version_lines() {
        println!("{line}");
    }
    Ok(())
}

fn version_lines() -> Vec<String> {
    let builtin = ModuleRegistry::builtin().map_or_else(
        |e| format!("unavailable ({e})"),
        |registry| format!("{} modules", registry.len()),
    );
    let home = paths::data_dir().map_or_else(
        |_| format!("unset (set {HOME_ENV})"),
        |dir| dir.display().to_string(),
    );

    vec![
        format!("modsmith {}", env!("CARGO_PKG_VERSION")),
        String::new(),
        "Catalog:".to_string(),
        format!("  Format: v{CATALOG_VERSION}"),
        format!("  Built-in: {builtin}"),
        format!("  Data directory: {home}"),
        String::new(),
        "Build info:".to_string(),
        format!("  Minimum Rust version: {}", env!("CARGO_PKG_RUST_VERSION")),
        format!(
            "  Profile: {}",
            if cfg!(debug_assertions) { "debug" } else { "release" }
        ),
    ]
}
