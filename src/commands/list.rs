//! List command implementation

use crate::cli::ListArgs;
use crate::config::settings::SettingsOverrides;
use crate::engine::ModuleFilter;
use crate::error::Result;
use crate::ui::display;

use super::helpers;

/// Run list command
pub fn run(overrides: &SettingsOverrides, args: &ListArgs) -> Result<()> {
    let settings = helpers::load_settings(overrides)?;
    let mut manager = helpers::open_manager(&settings)?;

    let mut filter = ModuleFilter::default();
    if let Some(category) = args.category {
        filter = filter.category(category);
    }
    if let Some(installed) = args.installed_filter() {
        filter = filter.installed(installed);
    }

    let views = manager.discover(Some(&filter))?;
    if args.json {
        return helpers::print_json(&views.values().collect::<Vec<_>>());
    }

    display::display_module_list(&views);
    Ok(())
}
