//! Display functions for modules, plans and installation results
//!
//! Everything here prints to stdout with `console` styling. Machine readable
//! output (`--json`) is produced by the commands directly.

use std::collections::{BTreeMap, BTreeSet};

use console::Style;

use crate::domain::{Category, InstallationReport, ModuleView};
use crate::installer::audit::{AuditEntry, AuditStatus};
use crate::installer::progress::ProgressSnapshot;
use crate::resolver::{InstallationPlan, SelectionValidationResult};

macro_rules! display_field {
    ($label:expr, $value:expr) => {
        println!("    {} {}", Style::new().bold().apply_to($label), $value);
    };
}

fn installed_badge(installed: bool) -> String {
    if installed {
        Style::new().green().apply_to("installed").to_string()
    } else {
        Style::new().dim().apply_to("available").to_string()
    }
}

fn name_list(names: &[String]) -> String {
    if names.is_empty() {
        Style::new().dim().apply_to("None").to_string()
    } else {
        names.join(", ")
    }
}

/// Group views by category in catalog display order
pub fn group_by_category(views: &BTreeMap<String, ModuleView>) -> Vec<(Category, Vec<&ModuleView>)> {
    Category::ALL
        .into_iter()
        .filter_map(|category| {
            let members: Vec<&ModuleView> =
                views.values().filter(|v| v.category == category).collect();
            (!members.is_empty()).then_some((category, members))
        })
        .collect()
}

/// Display modules grouped by category, one line each
pub fn display_module_list(views: &BTreeMap<String, ModuleView>) {
    if views.is_empty() {
        println!("No modules match.");
        return;
    }

    for (category, members) in group_by_category(views) {
        println!("{}", Style::new().bold().underlined().apply_to(category));
        for view in members {
            println!(
                "  {:<12} {:<20} {}",
                Style::new().bold().yellow().apply_to(&view.name),
                view.display_name,
                installed_badge(view.installed)
            );
        }
    }
}

/// Display one module with its graph neighbourhood
pub fn display_module_detailed(view: &ModuleView, dependents: &BTreeSet<String>) {
    println!(
        "  {} {}",
        Style::new().bold().yellow().apply_to(&view.name),
        installed_badge(view.installed)
    );
    display_field!("Name:", &view.display_name);
    if !view.description.is_empty() {
        display_field!("Description:", &view.description);
    }
    if !view.icon.is_empty() {
        display_field!("Icon:", &view.icon);
    }
    display_field!("Category:", view.category);
    display_field!("Depends on:", name_list(&view.dependencies));
    display_field!(
        "Required by:",
        name_list(&dependents.iter().cloned().collect::<Vec<_>>())
    );
    println!("    {}", Style::new().bold().apply_to("Tables:"));
    for table in &view.tables {
        println!("      - {}", Style::new().cyan().apply_to(table));
    }
}

/// Display the gaps of an incomplete selection
pub fn display_validation(result: &SelectionValidationResult) {
    if result.valid {
        println!(
            "{} Selection is complete",
            Style::new().green().bold().apply_to("✓")
        );
        return;
    }

    println!(
        "{} Selection is missing dependencies:",
        Style::new().red().bold().apply_to("✗")
    );
    for (module, missing) in &result.missing {
        println!(
            "  {} needs {}",
            Style::new().bold().apply_to(module),
            Style::new().yellow().apply_to(missing.join(", "))
        );
    }
}

/// Display an installation plan as a numbered list
pub fn display_plan(plan: &InstallationPlan, requested: &BTreeSet<String>) {
    if plan.is_empty() {
        println!("Nothing to install.");
        return;
    }

    println!("Installation order:");
    for (index, module) in plan.iter().enumerate() {
        let note = if requested.contains(module) {
            String::new()
        } else {
            format!(" {}", Style::new().dim().apply_to("(dependency)"))
        };
        println!("  {:>2}. {module}{note}", index + 1);
    }
}

/// Display the per-module outcome of a run and the retry hint
pub fn display_report(report: &InstallationReport) {
    if report.is_empty() {
        println!("Nothing to install; every selected module is already installed.");
        return;
    }

    for result in report.results() {
        let mark = if result.success() {
            Style::new().green().apply_to("✓")
        } else {
            Style::new().red().apply_to("✗")
        };
        println!("  {mark} {:<12} {}", result.module(), result.message());
    }

    println!(
        "\n{} succeeded, {} failed",
        report.succeeded_count(),
        report.failed_count()
    );
    if report.audit_failures > 0 {
        println!(
            "{} {} audit entries could not be written",
            Style::new().yellow().bold().apply_to("Warning:"),
            report.audit_failures
        );
    }

    let retry = report.retry_set();
    if !retry.is_empty() {
        println!(
            "Retry with: {}",
            Style::new()
                .bold()
                .apply_to(format!("modsmith install {}", retry.into_iter().collect::<Vec<_>>().join(" ")))
        );
    }
}

/// Display audit log entries, oldest first
pub fn display_audit_entries(entries: &[AuditEntry]) {
    if entries.is_empty() {
        println!("No audit entries.");
        return;
    }

    for entry in entries {
        let status = match entry.status {
            AuditStatus::Success => Style::new().green().apply_to(entry.status.as_str()),
            AuditStatus::Failed => Style::new().red().apply_to(entry.status.as_str()),
        };
        println!(
            "{}  {:<7}  {:<12}  {:<10}  {}",
            Style::new().dim().apply_to(entry.timestamp.format("%Y-%m-%d %H:%M:%S")),
            status,
            entry.module,
            entry.user_id,
            entry.message
        );
    }
}

/// Display a progress snapshot
pub fn display_progress(snapshot: &ProgressSnapshot) {
    if snapshot.in_progress {
        println!(
            "Installing {} ({}/{} done, {}%)",
            Style::new()
                .bold()
                .apply_to(snapshot.current_module.as_deref().unwrap_or("-")),
            snapshot.completed_count,
            snapshot.total,
            snapshot.percentage
        );
    } else if snapshot.is_complete() {
        println!(
            "Last run finished: {}/{} modules (100%)",
            snapshot.completed_count, snapshot.total
        );
    } else {
        println!("No installation in progress.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(name: &str, category: Category) -> ModuleView {
        ModuleView {
            name: name.to_string(),
            display_name: name.to_uppercase(),
            description: String::new(),
            icon: String::new(),
            category,
            tables: vec![format!("{name}_main")],
            dependencies: Vec::new(),
            installed: false,
        }
    }

    #[test]
    fn test_group_by_category_follows_display_order() {
        let views: BTreeMap<String, ModuleView> = [
            view("payroll", Category::HumanResources),
            view("crm", Category::Crm),
            view("visits", Category::Crm),
        ]
        .into_iter()
        .map(|v| (v.name.clone(), v))
        .collect();

        let groups = group_by_category(&views);
        let categories: Vec<Category> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(categories, vec![Category::Crm, Category::HumanResources]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn test_name_list_joins() {
        assert_eq!(
            name_list(&["crm".to_string(), "employees".to_string()]),
            "crm, employees"
        );
    }
}
