//! Audit command implementation

use crate::cli::AuditArgs;
use crate::config::settings::SettingsOverrides;
use crate::error::Result;
use crate::installer::audit::{AuditEntry, AuditStatus, FileAuditLog};
use crate::ui::display;

use super::helpers;

/// Run audit command
pub fn run(overrides: &SettingsOverrides, args: &AuditArgs) -> Result<()> {
    let settings = helpers::load_settings(overrides)?;
    let entries = filter_entries(FileAuditLog::new(&settings.audit_log).read_entries()?, args);

    if args.json {
        return helpers::print_json(&entries);
    }

    display::display_audit_entries(&entries);
    Ok(())
}

/// Apply the module/status filters, then keep the newest `limit` entries
fn filter_entries(entries: Vec<AuditEntry>, args: &AuditArgs) -> Vec<AuditEntry> {
    let mut entries: Vec<AuditEntry> = entries
        .into_iter()
        .filter(|e| args.module.as_ref().is_none_or(|m| *m == e.module))
        .filter(|e| !args.failed || e.status == AuditStatus::Failed)
        .collect();

    if let Some(limit) = args.limit {
        let skip = entries.len().saturating_sub(limit);
        entries = entries.split_off(skip);
    }
    entries
}
