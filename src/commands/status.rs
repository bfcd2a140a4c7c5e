//! Status command implementation
//!
//! Reads the progress snapshot mirrored by the installing process, so it
//! works while another `modsmith install` is running.

use crate::cli::StatusArgs;
use crate::config::settings::SettingsOverrides;
use crate::error::Result;
use crate::installer::progress::ProgressSnapshot;
use crate::ui::display;

use super::helpers;

/// Run status command
pub fn run(overrides: &SettingsOverrides, args: &StatusArgs) -> Result<()> {
    let settings = helpers::load_settings(overrides)?;
    let snapshot = ProgressSnapshot::load(&settings.progress_file)?.unwrap_or_else(ProgressSnapshot::idle);

    if args.json {
        return helpers::print_json(&snapshot);
    }

    display::display_progress(&snapshot);
    Ok(())
}
