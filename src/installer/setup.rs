//! Setup procedures
//!
//! Each module names the procedure that creates its schema through the
//! `setup` field of its catalog entry. Procedures report failure through
//! [`SetupOutcome`] instead of errors; the installer also catches panics at
//! the module boundary, so one broken procedure never stops a run.
//!
//! Built-in procedures:
//! - `create_tables`: create every table in the module's schema descriptor,
//!   skipping tables that already exist
//! - `noop`: succeed without touching storage

use std::collections::BTreeMap;

use crate::domain::Module;
use crate::storage::StorageBackend;

/// Name of the built-in table creation procedure
pub const CREATE_TABLES: &str = "create_tables";

/// Name of the built-in no-op procedure
pub const NOOP: &str = "noop";

/// Result of running one setup procedure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    Success(String),
    Failure(String),
}

impl SetupOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SetupOutcome::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            SetupOutcome::Success(message) | SetupOutcome::Failure(message) => message,
        }
    }
}

/// Everything a procedure may touch while installing one module
pub struct SetupContext<'a> {
    pub module: &'a Module,
    pub storage: &'a mut dyn StorageBackend,
    pub user_id: &'a str,
}

/// A schema setup routine
pub trait SetupProcedure: Send + Sync {
    fn run(&self, ctx: &mut SetupContext<'_>) -> SetupOutcome;
}

impl<F> SetupProcedure for F
where
    F: Fn(&mut SetupContext<'_>) -> SetupOutcome + Send + Sync,
{
    fn run(&self, ctx: &mut SetupContext<'_>) -> SetupOutcome {
        self(ctx)
    }
}

/// Creates every table of the module's schema descriptor
#[derive(Debug, Default, Clone, Copy)]
pub struct CreateTables;

impl SetupProcedure for CreateTables {
    fn run(&self, ctx: &mut SetupContext<'_>) -> SetupOutcome {
        let mut created = 0;
        let mut present = 0;
        for table in &ctx.module.tables {
            match ctx.storage.table_exists(&table.name) {
                Ok(true) => {
                    present += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => return SetupOutcome::Failure(format!("table {}: {e}", table.name)),
            }
            if let Err(e) = ctx.storage.create_table(table) {
                return SetupOutcome::Failure(format!("table {}: {e}", table.name));
            }
            created += 1;
        }

        let mut message = format!(
            "Created {created} table{}",
            if created == 1 { "" } else { "s" }
        );
        if present > 0 {
            message.push_str(&format!(" ({present} already present)"));
        }
        SetupOutcome::Success(message)
    }
}

/// Succeeds without doing anything
#[derive(Debug, Default, Clone, Copy)]
pub struct Noop;

impl SetupProcedure for Noop {
    fn run(&self, _ctx: &mut SetupContext<'_>) -> SetupOutcome {
        SetupOutcome::Success("Nothing to set up".to_string())
    }
}

/// Procedures addressable by name
pub struct SetupRegistry {
    procedures: BTreeMap<String, Box<dyn SetupProcedure>>,
}

impl SetupRegistry {
    /// Registry without any procedure
    pub fn empty() -> Self {
        Self {
            procedures: BTreeMap::new(),
        }
    }

    /// Registry with `create_tables` and `noop`
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(CREATE_TABLES, CreateTables);
        registry.register(NOOP, Noop);
        registry
    }

    /// Add or replace a procedure
    pub fn register(&mut self, name: impl Into<String>, procedure: impl SetupProcedure + 'static) {
        self.procedures.insert(name.into(), Box::new(procedure));
    }

    pub fn get(&self, name: &str) -> Option<&dyn SetupProcedure> {
        self.procedures.get(name).map(|p| p.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.procedures.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.procedures.keys().map(String::as_str)
    }
}

impl Default for SetupRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for SetupRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.procedures.keys()).finish()
    }
}
