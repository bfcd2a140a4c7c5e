//! Interactive module selection

use std::collections::{BTreeMap, BTreeSet};

use inquire::{Confirm, MultiSelect};

use crate::domain::ModuleView;
use crate::error::Result;

/// Menu line for a module: `name (Display Name · category)`
fn menu_item(view: &ModuleView) -> String {
    format!("{} ({} · {})", view.name, view.display_name, view.category)
}

/// Module name from a menu line (the part before " (")
fn item_name(item: &str) -> &str {
    item.split(" (").next().unwrap_or(item).trim()
}

/// Scorer that matches only by module name, so typing does not match words
/// in display names or categories
#[allow(clippy::ptr_arg)]
pub fn score_by_name(input: &str, _opt: &String, string_value: &str, _idx: usize) -> Option<i64> {
    if input.is_empty() {
        return Some(0);
    }
    item_name(string_value)
        .to_lowercase()
        .contains(&input.to_lowercase())
        .then_some(0)
}

/// Pick modules to install from those not installed yet
///
/// Returns an empty set when nothing is available or the prompt is skipped.
pub fn select_modules(views: &BTreeMap<String, ModuleView>) -> Result<BTreeSet<String>> {
    let items: Vec<String> = views
        .values()
        .filter(|v| !v.installed)
        .map(menu_item)
        .collect();
    if items.is_empty() {
        println!("Every module is already installed.");
        return Ok(BTreeSet::new());
    }

    let selection = match MultiSelect::new("Select modules to install", items)
        .with_page_size(10)
        .with_help_message("  ↑↓ navigate  space select  enter confirm  type to filter  q/esc cancel")
        .with_scorer(&score_by_name)
        .prompt_skippable()?
    {
        Some(sel) => sel,
        None => return Ok(BTreeSet::new()),
    };

    Ok(selection
        .iter()
        .map(|item| item_name(item).to_string())
        .collect())
}

/// Ask whether to add the missing dependencies to the selection
pub fn confirm_add_dependencies(missing: &BTreeSet<String>) -> Result<bool> {
    let names = missing.iter().cloned().collect::<Vec<_>>().join(", ");
    Ok(Confirm::new(&format!("Also install the missing dependencies ({names})?"))
        .with_default(true)
        .prompt_skippable()?
        .unwrap_or(false))
}
