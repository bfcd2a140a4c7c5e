//! Install command implementation
//!
//! With no modules on the command line the user picks them from a menu.
//! Incomplete selections are rejected unless `--with-deps` (or the prompt)
//! adds the missing modules explicitly.

use std::collections::BTreeSet;

use console::Style;

use crate::cli::InstallArgs;
use crate::config::settings::SettingsOverrides;
use crate::engine::{ModuleManager, SubmissionOutcome};
use crate::error::{Result, deps};
use crate::ui::{InteractiveProgressReporter, display};

use super::{helpers, menu};

/// Run install command
pub fn run(mut overrides: SettingsOverrides, args: InstallArgs) -> Result<()> {
    overrides.user = args.user.clone();
    let settings = helpers::load_settings(&overrides)?;
    let mut manager = helpers::open_manager(&settings)?;

    let interactive = args.modules.is_empty();
    let requested = if interactive {
        menu::select_modules(&manager.discover(None)?)?
    } else {
        helpers::selection(&args.modules)
    };
    if requested.is_empty() {
        println!("No modules selected.");
        return Ok(());
    }

    let names = resolve_selection(&mut manager, requested, args.with_deps, interactive)?;

    let outcome = if args.dry_run {
        println!(
            "{}",
            Style::new().bold().apply_to("Dry run: nothing will be written")
        );
        manager.dry_run(&names, &settings.user)?
    } else {
        let mut reporter = InteractiveProgressReporter::new();
        manager.submit_with_reporter(&names, &settings.user, &mut reporter)?
    };

    match outcome {
        SubmissionOutcome::Rejected(validation) => {
            display::display_validation(&validation);
            validation.into_result()
        }
        SubmissionOutcome::Completed(report) => {
            display::display_report(&report);
            if report.is_success() {
                Ok(())
            } else {
                let failed: Vec<String> = report.retry_set().into_iter().collect();
                Err(deps::incomplete(failed.join(", ")))
            }
        }
    }
}

/// Expand the selection with missing dependencies when asked to
fn resolve_selection(
    manager: &mut ModuleManager,
    requested: BTreeSet<String>,
    with_deps: bool,
    interactive: bool,
) -> Result<BTreeSet<String>> {
    if with_deps {
        let expanded = manager.expand_selection(&requested)?;
        let added: Vec<&String> = expanded.difference(&requested).collect();
        if !added.is_empty() {
            tracing::info!(?added, "added missing dependencies");
        }
        return Ok(expanded);
    }

    if interactive {
        let validation = manager.validate(&requested)?;
        if !validation.valid && menu::confirm_add_dependencies(&validation.missing_modules())? {
            return manager.expand_selection(&requested);
        }
    }
    Ok(requested)
}
