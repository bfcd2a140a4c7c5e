//! Selection validation
//!
//! A selection is complete when every direct dependency of every selected
//! module is either installed or selected too. Incomplete selections are
//! reported, never repaired.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::graph::DependencyGraph;
use crate::error::{Result, deps};

/// Outcome of validating a selection
///
/// `missing` maps each incomplete module to its sorted missing dependencies
/// and is empty exactly when `valid` is true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionValidationResult {
    pub valid: bool,
    pub missing: BTreeMap<String, Vec<String>>,
}

impl SelectionValidationResult {
    fn from_missing(missing: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            valid: missing.is_empty(),
            missing,
        }
    }

    /// Every dependency missing from the selection, deduplicated
    pub fn missing_modules(&self) -> BTreeSet<String> {
        self.missing.values().flatten().cloned().collect()
    }

    /// `Err(IncompleteSelection)` when invalid
    pub fn into_result(self) -> Result<()> {
        if self.valid {
            Ok(())
        } else {
            Err(deps::incomplete_selection(self.missing))
        }
    }
}

/// Check one-hop completeness of `selected` against `installed`
pub fn validate_selection(
    graph: &DependencyGraph,
    selected: &BTreeSet<String>,
    installed: &BTreeSet<String>,
) -> SelectionValidationResult {
    let mut missing = BTreeMap::new();
    for module in selected {
        let absent: Vec<String> = graph
            .direct_dependencies(module)
            .iter()
            .filter(|dep| !installed.contains(*dep) && !selected.contains(*dep))
            .cloned()
            .collect();
        if !absent.is_empty() {
            missing.insert(module.clone(), absent);
        }
    }
    SelectionValidationResult::from_missing(missing)
}

/// Selected modules that would become incomplete if `module` were deselected
pub fn blocking_dependents(
    graph: &DependencyGraph,
    module: &str,
    selected: &BTreeSet<String>,
) -> BTreeSet<String> {
    graph
        .dependents(module)
        .iter()
        .filter(|dependent| selected.contains(*dependent))
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::ModsmithError;
    use crate::registry::tests::create_test_registry;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    fn create_test_graph() -> DependencyGraph {
        DependencyGraph::from_registry(&create_test_registry(&[
            ("employees", &[]),
            ("catalog", &[]),
            ("crm", &["employees"]),
            ("invoicing", &["crm", "catalog"]),
        ]))
    }

    #[test]
    fn test_missing_dependency_reported() {
        let result = validate_selection(&create_test_graph(), &set(&["crm"]), &set(&[]));
        assert!(!result.valid);
        assert_eq!(result.missing.get("crm"), Some(&vec!["employees".to_string()]));
    }

    #[test]
    fn test_selected_dependency_satisfies() {
        let result =
            validate_selection(&create_test_graph(), &set(&["employees", "crm"]), &set(&[]));
        assert!(result.valid);
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_installed_dependency_satisfies() {
        let result = validate_selection(&create_test_graph(), &set(&["crm"]), &set(&["employees"]));
        assert!(result.valid);
    }

    #[test]
    fn test_only_direct_dependencies_checked() {
        // crm selected covers invoicing; crm's own gap is reported under crm
        let result = validate_selection(
            &create_test_graph(),
            &set(&["invoicing", "crm", "catalog"]),
            &set(&[]),
        );
        assert_eq!(result.missing.len(), 1);
        assert_eq!(result.missing_modules(), set(&["employees"]));
    }

    #[test]
    fn test_missing_lists_are_sorted() {
        let result = validate_selection(&create_test_graph(), &set(&["invoicing"]), &set(&[]));
        assert_eq!(
            result.missing.get("invoicing"),
            Some(&vec!["catalog".to_string(), "crm".to_string()])
        );
        let err = result.into_result().expect_err("invalid selection");
        assert!(matches!(err, ModsmithError::IncompleteSelection { .. }));
    }

    #[test]
    fn test_empty_selection_is_valid() {
        let result = validate_selection(&create_test_graph(), &set(&[]), &set(&[]));
        assert!(result.valid);
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn test_blocking_dependents() {
        let graph = create_test_graph();
        let selected = set(&["employees", "crm", "catalog"]);
        assert_eq!(blocking_dependents(&graph, "employees", &selected), set(&["crm"]));
        assert!(blocking_dependents(&graph, "catalog", &selected).is_empty());
    }
}
