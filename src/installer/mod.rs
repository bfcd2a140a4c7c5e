//! Installation executor
//!
//! This module handles:
//! - Filtering out modules that are already installed
//! - Validating and planning the remaining selection
//! - Running each module's setup procedure in plan order
//! - Recording one result and one audit entry per attempted module
//! - Driving the shared progress tracker
//!
//! A failing, panicking or unknown setup procedure only fails its own module;
//! the run always continues with the next module in the plan.

pub mod audit;
pub mod progress;
pub mod setup;

use std::collections::BTreeSet;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::domain::{InstallationReport, InstallationResult, is_valid_module_name, is_valid_user_id};
use crate::error::{Result, deps, module};
use crate::registry::ModuleRegistry;
use crate::resolver::{DependencyGraph, InstallationPlan, Planner, validate_selection};
use crate::storage::InstalledStateProber;
use crate::ui::{ProgressReporter, SilentProgressReporter};

use audit::{AuditEntry, AuditSink};
use progress::ProgressTracker;
use setup::{SetupContext, SetupOutcome, SetupRegistry};

/// Lifecycle of one module within a run
///
/// `Pending -> Running -> Succeeded | Failed`; both end states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl ModuleState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ModuleState::Succeeded | ModuleState::Failed)
    }

    /// Whether moving to `next` is a legal transition
    pub fn can_move_to(self, next: ModuleState) -> bool {
        matches!(
            (self, next),
            (ModuleState::Pending, ModuleState::Running)
                | (ModuleState::Running, ModuleState::Succeeded | ModuleState::Failed)
        )
    }
}

/// Executes installation runs against borrowed engine state
pub struct Installer<'a> {
    registry: &'a ModuleRegistry,
    graph: &'a DependencyGraph,
    prober: &'a mut InstalledStateProber,
    setups: &'a SetupRegistry,
    audit: &'a mut dyn AuditSink,
    tracker: &'a ProgressTracker,
    states: Vec<(String, ModuleState)>,
}

impl<'a> Installer<'a> {
    pub fn new(
        registry: &'a ModuleRegistry,
        graph: &'a DependencyGraph,
        prober: &'a mut InstalledStateProber,
        setups: &'a SetupRegistry,
        audit: &'a mut dyn AuditSink,
        tracker: &'a ProgressTracker,
    ) -> Self {
        Self {
            registry,
            graph,
            prober,
            setups,
            audit,
            tracker,
            states: Vec::new(),
        }
    }

    /// Validate, plan and execute `selected`
    ///
    /// # Errors
    ///
    /// Fails before anything executes on unknown modules, an invalid user id,
    /// an incomplete selection, a dependency cycle or an unreachable storage
    /// backend. Setup failures never surface here; they are failed results
    /// inside the report.
    pub fn install(&mut self, selected: &BTreeSet<String>, user_id: &str) -> Result<InstallationReport> {
        self.install_with_reporter(selected, user_id, &mut SilentProgressReporter)
    }

    /// Like [`Installer::install`], also feeding `reporter`
    pub fn install_with_reporter(
        &mut self,
        selected: &BTreeSet<String>,
        user_id: &str,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<InstallationReport> {
        let plan = self.prepare(selected, user_id)?;
        Ok(self.execute(&plan, user_id, reporter))
    }

    /// Check the request and compute the plan without executing anything
    pub fn prepare(&mut self, selected: &BTreeSet<String>, user_id: &str) -> Result<InstallationPlan> {
        for name in selected {
            if !is_valid_module_name(name) {
                return Err(module::invalid_name(name));
            }
            self.registry.get(name)?;
        }
        if !is_valid_user_id(user_id) {
            return Err(deps::invalid_user(user_id));
        }

        let installed = self.prober.installed_set(self.registry)?;
        let pending: BTreeSet<String> = selected.difference(&installed).cloned().collect();
        let skipped = selected.len() - pending.len();
        if skipped > 0 {
            tracing::info!(skipped, "skipping modules that are already installed");
        }

        validate_selection(self.graph, &pending, &installed).into_result()?;

        Planner::new(self.graph, &installed).resolve_installation_order(&pending)
    }

    /// Run every module of `plan` in order
    pub fn execute(
        &mut self,
        plan: &InstallationPlan,
        user_id: &str,
        reporter: &mut dyn ProgressReporter,
    ) -> InstallationReport {
        tracing::info!(modules = plan.len(), user = user_id, "starting installation run");
        self.states = plan
            .iter()
            .map(|m| (m.to_string(), ModuleState::Pending))
            .collect();
        self.tracker.begin(plan.modules());
        reporter.begin(plan.modules());

        let mut results = Vec::with_capacity(plan.len());
        let mut audit_failures = 0;

        for (index, name) in plan.iter().enumerate() {
            self.tracker.start_module(index);
            reporter.start_module(name, index, plan.len());
            self.set_state(index, ModuleState::Running);

            let result = self.run_module(name, user_id);
            self.set_state(
                index,
                if result.success() {
                    ModuleState::Succeeded
                } else {
                    ModuleState::Failed
                },
            );

            if let Err(e) = self.audit.append(&AuditEntry::from_result(&result, user_id)) {
                audit_failures += 1;
                tracing::error!(module = name, error = %e, "could not record audit entry");
            }
            self.prober.invalidate();

            self.tracker.finish_module();
            reporter.finish_module(&result);
            results.push(result);
        }

        self.tracker.finish();
        let report = InstallationReport::new(results, audit_failures);
        reporter.finish(&report);
        tracing::info!(
            succeeded = report.succeeded_count(),
            failed = report.failed_count(),
            "installation run finished"
        );
        report
    }

    /// State of every module of the last run, in plan order
    pub fn module_states(&self) -> &[(String, ModuleState)] {
        &self.states
    }

    fn set_state(&mut self, index: usize, next: ModuleState) {
        if let Some((name, state)) = self.states.get_mut(index) {
            debug_assert!(state.can_move_to(next), "{name}: {state:?} -> {next:?}");
            *state = next;
        }
    }

    fn run_module(&mut self, name: &str, user_id: &str) -> InstallationResult {
        let module = match self.registry.get(name) {
            Ok(module) => module,
            Err(e) => return InstallationResult::failed(name, e.to_string()),
        };
        let Some(procedure) = self.setups.get(&module.setup) else {
            tracing::warn!(module = name, setup = %module.setup, "unknown setup procedure");
            return InstallationResult::failed(
                name,
                format!("Unknown setup procedure '{}'", module.setup),
            );
        };

        tracing::info!(module = name, "installing module");
        let mut ctx = SetupContext {
            module,
            storage: self.prober.storage_mut(),
            user_id,
        };
        match catch_unwind(AssertUnwindSafe(|| procedure.run(&mut ctx))) {
            Ok(SetupOutcome::Success(message)) => InstallationResult::succeeded(name, message),
            Ok(SetupOutcome::Failure(message)) => {
                tracing::warn!(module = name, %message, "setup procedure failed");
                InstallationResult::failed(name, message)
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                tracing::error!(module = name, %reason, "setup procedure panicked");
                InstallationResult::failed(name, format!("Setup procedure panicked: {reason}"))
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::error::ModsmithError;
    use crate::registry::tests::create_test_module;
    use crate::storage::{MemoryStorage, StorageBackend};
    use audit::{AuditStatus, MemoryAuditLog};

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    struct Fixture {
        registry: ModuleRegistry,
        graph: DependencyGraph,
        prober: InstalledStateProber,
        setups: SetupRegistry,
        audit: MemoryAuditLog,
        tracker: ProgressTracker,
    }

    impl Fixture {
        fn new(modules: Vec<crate::domain::Module>, storage: MemoryStorage) -> Self {
            let registry = ModuleRegistry::from_modules(modules).expect("registry");
            let graph = DependencyGraph::from_registry(&registry);
            Self {
                registry,
                graph,
                prober: InstalledStateProber::new(Box::new(storage)),
                setups: SetupRegistry::with_builtins(),
                audit: MemoryAuditLog::new(),
                tracker: ProgressTracker::new(),
            }
        }

        fn crm() -> Self {
            Self::new(
                vec![
                    create_test_module("employees", &[]),
                    create_test_module("crm", &["employees"]),
                ],
                MemoryStorage::new(),
            )
        }

        fn install(&mut self, selected: &[&str]) -> Result<InstallationReport> {
            let mut sink = self.audit.clone();
            Installer::new(
                &self.registry,
                &self.graph,
                &mut self.prober,
                &self.setups,
                &mut sink,
                &self.tracker,
            )
            .install(&set(selected), "admin")
        }
    }

    #[test]
    fn test_installs_in_dependency_order() {
        let mut fx = Fixture::crm();
        let report = fx.install(&["crm", "employees"]).expect("install");
        let modules: Vec<&str> = report.results().iter().map(InstallationResult::module).collect();
        assert_eq!(modules, vec!["employees", "crm"]);
        assert!(report.is_success());
        assert!(fx.prober.storage().table_exists("crm_main").expect("probe"));
        assert!(fx.tracker.snapshot().is_complete());
    }

    #[test]
    fn test_incomplete_selection_executes_nothing() {
        let mut fx = Fixture::crm();
        let err = fx.install(&["crm"]).expect_err("missing employees");
        match err {
            ModsmithError::IncompleteSelection { missing, .. } => {
                assert_eq!(missing.get("crm"), Some(&vec!["employees".to_string()]));
            }
            other => panic!("Expected IncompleteSelection, got {other:?}"),
        }
        assert!(fx.audit.entries().is_empty());
        assert_eq!(fx.tracker.snapshot().total, 0);
    }

    #[test]
    fn test_installed_dependency_satisfies_selection() {
        let mut fx = Fixture::new(
            vec![
                create_test_module("employees", &[]),
                create_test_module("crm", &["employees"]),
            ],
            MemoryStorage::with_tables(["employees_main"]),
        );
        let report = fx.install(&["crm"]).expect("install");
        assert_eq!(report.results().len(), 1);
        assert_eq!(report.results()[0].module(), "crm");
    }

    #[test]
    fn test_already_installed_modules_are_skipped() {
        let mut fx = Fixture::crm();
        fx.install(&["employees", "crm"]).expect("first run");
        let report = fx.install(&["employees", "crm"]).expect("second run");
        assert!(report.is_empty());
        assert_eq!(fx.audit.entries().len(), 2);
        assert_eq!(fx.tracker.snapshot().percentage, 100);
    }

    #[test]
    fn test_cycle_executes_nothing() {
        let mut fx = Fixture::new(
            vec![
                create_test_module("a", &["b"]),
                create_test_module("b", &["c"]),
                create_test_module("c", &["a"]),
            ],
            MemoryStorage::new(),
        );
        let err = fx.install(&["a", "b", "c"]).expect_err("cycle");
        assert!(matches!(err, ModsmithError::CircularDependency { .. }));
        assert!(fx.audit.entries().is_empty());
        assert!(fx.prober.storage().tables().expect("tables").is_empty());
    }

    #[test]
    fn test_failure_is_isolated_and_audited() {
        let mut fx = Fixture::new(
            vec![
                create_test_module("employees", &[]),
                {
                    let mut crm = create_test_module("crm", &["employees"]);
                    crm.setup = "broken".to_string();
                    crm
                },
                create_test_module("payroll", &["employees"]),
            ],
            MemoryStorage::new(),
        );
        fx.setups.register("broken", |_: &mut SetupContext<'_>| {
            SetupOutcome::Failure("constraint violated".to_string())
        });

        let report = fx.install(&["employees", "crm", "payroll"]).expect("install");
        let summary: Vec<(&str, bool)> = report
            .results()
            .iter()
            .map(|r| (r.module(), r.success()))
            .collect();
        assert_eq!(
            summary,
            vec![("employees", true), ("crm", false), ("payroll", true)]
        );
        assert_eq!(report.retry_set(), set(&["crm"]));

        let entries = fx.audit.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].status, AuditStatus::Failed);
        assert_eq!(entries[1].message, "constraint violated");
        assert_eq!(entries[1].user_id, "admin");
    }

    #[test]
    fn test_panic_becomes_failed_result() {
        let mut fx = Fixture::crm();
        fx.setups.register("create_tables", |_: &mut SetupContext<'_>| -> SetupOutcome {
            panic!("schema exploded")
        });
        let report = fx.install(&["employees"]).expect("install");
        assert!(!report.results()[0].success());
        assert!(report.results()[0].message().contains("schema exploded"));
        assert_eq!(fx.audit.entries().len(), 1);
    }

    #[test]
    fn test_unknown_setup_reference() {
        let mut fx = Fixture::crm();
        fx.setups = SetupRegistry::empty();
        let report = fx.install(&["employees"]).expect("install");
        assert!(report.results()[0].message().contains("Unknown setup procedure"));
    }

    #[test]
    fn test_audit_failure_does_not_abort() {
        let mut fx = Fixture::crm();
        let mut sink = MemoryAuditLog::failing("read-only file system");
        let report = Installer::new(
            &fx.registry,
            &fx.graph,
            &mut fx.prober,
            &fx.setups,
            &mut sink,
            &fx.tracker,
        )
        .install(&set(&["employees", "crm"]), "admin")
        .expect("install");
        assert!(report.is_success());
        assert_eq!(report.audit_failures, 2);
    }

    #[test]
    fn test_rejects_invalid_user_and_unknown_module() {
        let mut fx = Fixture::crm();
        let err = fx.install(&["payroll"]).expect_err("unknown module");
        assert!(matches!(err, ModsmithError::ModuleNotFound { .. }));

        let mut sink = fx.audit.clone();
        let err = Installer::new(
            &fx.registry,
            &fx.graph,
            &mut fx.prober,
            &fx.setups,
            &mut sink,
            &fx.tracker,
        )
        .install(&set(&["employees"]), "ad|min")
        .expect_err("invalid user");
        assert!(matches!(err, ModsmithError::InvalidUserId { .. }));
    }

    #[test]
    fn test_storage_outage_is_an_error() {
        let mut storage = MemoryStorage::new();
        storage.set_offline("connection refused");
        let mut fx = Fixture::new(vec![create_test_module("employees", &[])], storage);
        let err = fx.install(&["employees"]).expect_err("offline");
        assert!(matches!(err, ModsmithError::StorageUnavailable { .. }));
    }

    #[test]
    fn test_module_states_are_terminal() {
        let mut fx = Fixture::crm();
        let mut sink = fx.audit.clone();
        let mut installer = Installer::new(
            &fx.registry,
            &fx.graph,
            &mut fx.prober,
            &fx.setups,
            &mut sink,
            &fx.tracker,
        );
        installer
            .install(&set(&["employees", "crm"]), "admin")
            .expect("install");
        assert!(installer.module_states().iter().all(|(_, s)| s.is_terminal()));
        assert!(ModuleState::Pending.can_move_to(ModuleState::Running));
        assert!(!ModuleState::Succeeded.can_move_to(ModuleState::Running));
    }
}
