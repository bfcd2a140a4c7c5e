//! Selection and dependency errors

use std::collections::BTreeMap;

use super::ModsmithError;

impl_error_constructors! {
    InvalidUserId as invalid_user(user_id),
    InstallationIncomplete as incomplete(failed),
}

/// Creates a circular dependency error naming every module left on the cycle
pub fn circular(modules: Vec<String>) -> ModsmithError {
    let chain = modules.join(", ");
    ModsmithError::CircularDependency { modules, chain }
}

/// Creates an incomplete selection error from the per-module missing map
pub fn incomplete_selection(missing: BTreeMap<String, Vec<String>>) -> ModsmithError {
    let summary = missing
        .iter()
        .map(|(module, deps)| format!("{module} needs {}", deps.join(", ")))
        .collect::<Vec<_>>()
        .join("; ");
    ModsmithError::IncompleteSelection { missing, summary }
}
