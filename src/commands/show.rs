//! Show command implementation

use std::collections::BTreeSet;

use crate::cli::ShowArgs;
use crate::config::settings::SettingsOverrides;
use crate::engine::ModuleFilter;
use crate::error::{Result, module};
use crate::ui::display;

use super::helpers;

/// Run show command
pub fn run(overrides: &SettingsOverrides, args: &ShowArgs) -> Result<()> {
    let settings = helpers::load_settings(overrides)?;
    let mut manager = helpers::open_manager(&settings)?;

    manager.registry().get(&args.module)?;
    let filter = ModuleFilter::default().names([args.module.as_str()]);
    let view = manager
        .discover(Some(&filter))?
        .remove(&args.module)
        .ok_or_else(|| module::not_found(&args.module))?;
    let dependents: BTreeSet<String> = manager.graph().dependents(&args.module).clone();

    if args.json {
        return helpers::print_json(&serde_json::json!({
            "module": view,
            "dependents": dependents,
            "transitive_dependencies": manager.graph().transitive_dependencies(&args.module),
        }));
    }

    display::display_module_detailed(&view, &dependents);
    Ok(())
}
