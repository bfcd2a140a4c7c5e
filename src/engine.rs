//! Caller-facing module management API
//!
//! [`ModuleManager`] owns the registry, dependency graph, installed-state
//! prober, setup procedures, audit sink and progress tracker, and exposes the
//! three operations a front end needs: discover modules, submit a selection,
//! and poll progress.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::Settings;
use crate::domain::{Category, InstallationReport, ModuleView, is_valid_module_name};
use crate::error::{Result, module};
use crate::installer::Installer;
use crate::installer::audit::{AuditSink, FileAuditLog, MemoryAuditLog};
use crate::installer::progress::{ProgressSnapshot, ProgressTracker};
use crate::installer::setup::SetupRegistry;
use crate::registry::ModuleRegistry;
use crate::resolver::{
    DependencyGraph, InstallationPlan, Planner, SelectionValidationResult, blocking_dependents,
    validate_selection,
};
use crate::storage::{FileStorage, InstalledStateProber, MemoryStorage, StorageBackend};
use crate::ui::{ProgressReporter, SilentProgressReporter};

/// Narrows [`ModuleManager::discover`]; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleFilter {
    pub names: Option<BTreeSet<String>>,
    pub category: Option<Category>,
    pub installed: Option<bool>,
}

impl ModuleFilter {
    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn installed(mut self, installed: bool) -> Self {
        self.installed = Some(installed);
        self
    }

    pub fn matches(&self, view: &ModuleView) -> bool {
        self.names.as_ref().is_none_or(|n| n.contains(&view.name))
            && self.category.is_none_or(|c| c == view.category)
            && self.installed.is_none_or(|i| i == view.installed)
    }
}

/// Result of submitting a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The selection misses dependencies; nothing was executed
    Rejected(SelectionValidationResult),
    /// The selection ran; individual modules may still have failed
    Completed(InstallationReport),
}

/// Module discovery, validation and installation over one storage backend
pub struct ModuleManager {
    registry: ModuleRegistry,
    graph: DependencyGraph,
    prober: InstalledStateProber,
    setups: SetupRegistry,
    audit: Box<dyn AuditSink>,
    tracker: ProgressTracker,
}

impl ModuleManager {
    pub fn new(
        registry: ModuleRegistry,
        storage: Box<dyn StorageBackend>,
        audit: Box<dyn AuditSink>,
    ) -> Self {
        let graph = DependencyGraph::from_registry(&registry);
        Self {
            registry,
            graph,
            prober: InstalledStateProber::new(storage),
            setups: SetupRegistry::with_builtins(),
            audit,
            tracker: ProgressTracker::new(),
        }
    }

    /// Manager wired to the files named by `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let registry = ModuleRegistry::load_or_builtin(settings.catalog.as_deref())?;
        let tracker = ProgressTracker::new().with_snapshot_file(&settings.progress_file);
        Ok(Self::new(
            registry,
            Box::new(FileStorage::new(&settings.storage)),
            Box::new(FileAuditLog::new(&settings.audit_log)),
        )
        .with_tracker(tracker))
    }

    pub fn with_setup_registry(mut self, setups: SetupRegistry) -> Self {
        self.setups = setups;
        self
    }

    pub fn with_tracker(mut self, tracker: ProgressTracker) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn setups_mut(&mut self) -> &mut SetupRegistry {
        &mut self.setups
    }

    /// Module views with their installed flag, optionally filtered
    pub fn discover(&mut self, filter: Option<&ModuleFilter>) -> Result<BTreeMap<String, ModuleView>> {
        self.prober.invalidate();
        let states = self.prober.installed_states(&self.registry)?;
        let mut views = BTreeMap::new();
        for (name, module) in self.registry.list_modules() {
            let installed = states.get(name).copied().unwrap_or(false);
            let view = ModuleView::new(module, installed);
            if filter.is_none_or(|f| f.matches(&view)) {
                views.insert(name.clone(), view);
            }
        }
        Ok(views)
    }

    /// Names of every installed module, probed fresh from storage
    pub fn installed_modules(&mut self) -> Result<BTreeSet<String>> {
        self.prober.invalidate();
        self.prober.installed_set(&self.registry)
    }

    /// Check a selection against the current installed state
    pub fn validate(&mut self, names: &BTreeSet<String>) -> Result<SelectionValidationResult> {
        self.check_names(names)?;
        let installed = self.installed_modules()?;
        let pending: BTreeSet<String> = names.difference(&installed).cloned().collect();
        Ok(validate_selection(&self.graph, &pending, &installed))
    }

    /// Modules in `remaining` that still need `module` once it is deselected
    ///
    /// Empty when `module` is installed, since installed modules satisfy
    /// their dependents without being selected.
    pub fn blocking_deselection(
        &mut self,
        module: &str,
        remaining: &BTreeSet<String>,
    ) -> Result<BTreeSet<String>> {
        let module = self.registry.get(module)?;
        self.prober.invalidate();
        if self.prober.is_installed(module)? {
            return Ok(BTreeSet::new());
        }
        Ok(blocking_dependents(&self.graph, &module.name, remaining))
    }

    /// `names` plus every dependency that is not installed yet
    pub fn expand_selection(&mut self, names: &BTreeSet<String>) -> Result<BTreeSet<String>> {
        self.check_names(names)?;
        let installed = self.installed_modules()?;
        Ok(self.graph.with_missing_dependencies(names, &installed))
    }

    /// Installation order for `names`, validating first
    pub fn plan(&mut self, names: &BTreeSet<String>) -> Result<InstallationPlan> {
        self.validate(names)?.into_result()?;
        let installed = self.installed_modules()?;
        let pending: BTreeSet<String> = names.difference(&installed).cloned().collect();
        Planner::new(&self.graph, &installed).resolve_installation_order(&pending)
    }

    /// Validate and, when complete, install a selection
    pub fn submit_selection(&mut self, names: &BTreeSet<String>, user_id: &str) -> Result<SubmissionOutcome> {
        self.submit_with_reporter(names, user_id, &mut SilentProgressReporter)
    }

    /// Like [`ModuleManager::submit_selection`], also feeding `reporter`
    pub fn submit_with_reporter(
        &mut self,
        names: &BTreeSet<String>,
        user_id: &str,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<SubmissionOutcome> {
        let validation = self.validate(names)?;
        if !validation.valid {
            tracing::info!(missing = ?validation.missing, "selection rejected");
            return Ok(SubmissionOutcome::Rejected(validation));
        }

        let report = Installer::new(
            &self.registry,
            &self.graph,
            &mut self.prober,
            &self.setups,
            self.audit.as_mut(),
            &self.tracker,
        )
        .install_with_reporter(names, user_id, reporter)?;
        Ok(SubmissionOutcome::Completed(report))
    }

    /// Run a selection against an in-memory copy of storage
    ///
    /// Nothing is written to the real backend, the audit log or the
    /// progress mirror.
    pub fn dry_run(&mut self, names: &BTreeSet<String>, user_id: &str) -> Result<SubmissionOutcome> {
        let validation = self.validate(names)?;
        if !validation.valid {
            return Ok(SubmissionOutcome::Rejected(validation));
        }

        let mut prober =
            InstalledStateProber::new(Box::new(MemoryStorage::snapshot_of(self.prober.storage())?));
        let mut audit = MemoryAuditLog::new();
        let tracker = ProgressTracker::new();
        let report = Installer::new(
            &self.registry,
            &self.graph,
            &mut prober,
            &self.setups,
            &mut audit,
            &tracker,
        )
        .install(names, user_id)?;
        Ok(SubmissionOutcome::Completed(report))
    }

    /// Current progress of this manager's runs
    pub fn progress(&self) -> ProgressSnapshot {
        self.tracker.snapshot()
    }

    /// Shared handle for polling from another thread
    pub fn tracker(&self) -> ProgressTracker {
        self.tracker.clone()
    }

    fn check_names(&self, names: &BTreeSet<String>) -> Result<()> {
        for name in names {
            if !is_valid_module_name(name) {
                return Err(module::invalid_name(name));
            }
            self.registry.get(name)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for ModuleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleManager")
            .field("modules", &self.registry.len())
            .field("prober", &self.prober)
            .field("setups", &self.setups)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::TableSchema;
    use crate::installer::audit::AuditStatus;
    use tempfile::TempDir;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    fn create_test_manager() -> (ModuleManager, MemoryAuditLog) {
        let audit = MemoryAuditLog::new();
        let manager = ModuleManager::new(
            ModuleRegistry::builtin().expect("built-in catalog"),
            Box::new(MemoryStorage::new()),
            Box::new(audit.clone()),
        );
        (manager, audit)
    }

    #[test]
    fn test_discover_merges_installed_flag() {
        let (mut manager, _) = create_test_manager();
        manager
            .submit_selection(&set(&["employees"]), "admin")
            .expect("install");

        let views = manager.discover(None).expect("discover");
        assert_eq!(views.len(), 10);
        assert!(views["employees"].installed);
        assert!(!views["crm"].installed);

        let installed = manager
            .discover(Some(&ModuleFilter::default().installed(true)))
            .expect("discover");
        assert_eq!(installed.keys().collect::<Vec<_>>(), vec!["employees"]);

        let crm = manager
            .discover(Some(&ModuleFilter::default().category(Category::Crm)))
            .expect("discover");
        assert_eq!(crm.keys().collect::<Vec<_>>(), vec!["crm", "visits"]);
    }

    #[test]
    fn test_submit_rejects_incomplete_selection() {
        let (mut manager, audit) = create_test_manager();
        let outcome = manager
            .submit_selection(&set(&["crm"]), "admin")
            .expect("submit");
        match outcome {
            SubmissionOutcome::Rejected(result) => {
                assert_eq!(result.missing.get("crm"), Some(&vec!["employees".to_string()]));
            }
            other => panic!("Expected Rejected, got {other:?}"),
        }
        assert!(audit.entries().is_empty());
        assert_eq!(manager.progress(), ProgressSnapshot::idle());
    }

    #[test]
    fn test_submit_completes_and_audits() {
        let (mut manager, audit) = create_test_manager();
        let outcome = manager
            .submit_selection(&set(&["employees", "crm"]), "admin")
            .expect("submit");
        let SubmissionOutcome::Completed(report) = outcome else {
            panic!("Expected Completed");
        };
        assert!(report.is_success());
        let entries = audit.entries();
        assert_eq!(
            entries.iter().map(|e| e.module.as_str()).collect::<Vec<_>>(),
            vec!["employees", "crm"]
        );
        assert!(entries.iter().all(|e| e.status == AuditStatus::Success));
        assert_eq!(manager.progress().percentage, 100);
    }

    #[test]
    fn test_expand_selection_adds_missing_dependencies() {
        let (mut manager, _) = create_test_manager();
        let expanded = manager.expand_selection(&set(&["visits"])).expect("expand");
        assert_eq!(expanded, set(&["crm", "employees", "visits"]));
        let plan = manager.plan(&expanded).expect("plan");
        assert_eq!(plan.modules(), ["employees", "crm", "visits"]);
    }

    #[test]
    fn test_dry_run_leaves_storage_untouched() {
        let (mut manager, audit) = create_test_manager();
        let outcome = manager
            .dry_run(&set(&["employees"]), "admin")
            .expect("dry run");
        assert!(matches!(outcome, SubmissionOutcome::Completed(ref r) if r.is_success()));
        assert!(manager.installed_modules().expect("installed").is_empty());
        assert!(audit.entries().is_empty());
    }

    #[test]
    fn test_external_schema_changes_are_seen() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("schema.json");
        let mut manager = ModuleManager::new(
            ModuleRegistry::builtin().expect("built-in catalog"),
            Box::new(FileStorage::new(&path)),
            Box::new(MemoryAuditLog::new()),
        );
        assert!(!manager.discover(None).expect("discover")["employees"].installed);

        let mut other = FileStorage::new(&path);
        other
            .create_table(&TableSchema::new("employees", &["id"]))
            .expect("create employees");
        other
            .create_table(&TableSchema::new("departments", &["id"]))
            .expect("create departments");

        assert!(manager.discover(None).expect("discover")["employees"].installed);
        assert!(manager.validate(&set(&["crm"])).expect("validate").valid);

        let other = FileStorage::new(&path);
        std::fs::remove_file(&path).expect("drop schema");
        assert!(other.tables().expect("tables").is_empty());
        assert!(manager.installed_modules().expect("installed").is_empty());
        assert!(!manager.validate(&set(&["crm"])).expect("validate").valid);
    }

    #[test]
    fn test_blocking_deselection() {
        let (mut manager, _) = create_test_manager();
        let remaining = set(&["crm", "payroll"]);
        assert_eq!(
            manager.blocking_deselection("employees", &remaining).expect("check"),
            set(&["crm", "payroll"])
        );

        manager
            .submit_selection(&set(&["employees"]), "admin")
            .expect("install");
        assert!(
            manager
                .blocking_deselection("employees", &remaining)
                .expect("check")
                .is_empty()
        );
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let (mut manager, _) = create_test_manager();
        assert!(manager.validate(&set(&["astrology"])).is_err());
        assert!(manager.validate(&set(&["Bad Name"])).is_err());
    }
}
