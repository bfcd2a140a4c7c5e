//! Check command implementation

use console::Style;

use crate::cli::CheckArgs;
use crate::config::settings::SettingsOverrides;
use crate::error::Result;
use crate::ui::display;

use super::helpers;

/// Run check command
///
/// Fails with `IncompleteSelection` so the process exits non-zero.
pub fn run(overrides: &SettingsOverrides, args: &CheckArgs) -> Result<()> {
    let settings = helpers::load_settings(overrides)?;
    let mut manager = helpers::open_manager(&settings)?;

    let mut selection = helpers::selection(&args.modules);
    if let Some(module) = &args.without {
        selection.remove(module);
        let blockers = manager.blocking_deselection(module, &selection)?;
        if !blockers.is_empty() && !args.json {
            println!(
                "{} {module} is still required by {}",
                Style::new().yellow().bold().apply_to("Cannot deselect:"),
                blockers.into_iter().collect::<Vec<_>>().join(", ")
            );
        }
    }

    let result = manager.validate(&selection)?;
    if args.json {
        helpers::print_json(&result)?;
    } else {
        display::display_validation(&result);
    }
    result.into_result()
}
