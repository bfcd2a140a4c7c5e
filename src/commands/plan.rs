//! Plan command implementation

use crate::cli::PlanArgs;
use crate::config::settings::SettingsOverrides;
use crate::error::Result;
use crate::ui::display;

use super::helpers;

/// Run plan command
pub fn run(overrides: &SettingsOverrides, args: &PlanArgs) -> Result<()> {
    let settings = helpers::load_settings(overrides)?;
    let mut manager = helpers::open_manager(&settings)?;

    let requested = helpers::selection(&args.modules);
    let names = if args.with_deps {
        manager.expand_selection(&requested)?
    } else {
        requested.clone()
    };

    let plan = manager.plan(&names)?;
    if args.json {
        return helpers::print_json(&plan);
    }

    display::display_plan(&plan, &requested);
    Ok(())
}
