//! Installation planning
//!
//! The plan covers the selection plus every transitive dependency that is
//! not installed yet, in dependency order.

use std::collections::BTreeSet;

use serde::Serialize;

use super::graph::DependencyGraph;
use super::sort::topological_sort;
use crate::error::{Result, module};

/// Ordered, duplicate-free list of modules to install
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InstallationPlan {
    modules: Vec<String>,
}

impl InstallationPlan {
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(String::as_str)
    }

    /// Position of `module` in the plan
    pub fn position(&self, module: &str) -> Option<usize> {
        self.modules.iter().position(|m| m == module)
    }

    pub fn into_modules(self) -> Vec<String> {
        self.modules
    }
}

/// Computes installation orders against a fixed installed set
#[derive(Debug)]
pub struct Planner<'a> {
    graph: &'a DependencyGraph,
    installed: &'a BTreeSet<String>,
}

impl<'a> Planner<'a> {
    pub fn new(graph: &'a DependencyGraph, installed: &'a BTreeSet<String>) -> Self {
        Self { graph, installed }
    }

    /// Order `selected` plus its missing transitive dependencies
    ///
    /// Every selected module appears exactly once, installed or not.
    ///
    /// # Errors
    ///
    /// `ModuleNotFound` for names outside the graph, `CircularDependency`
    /// when the working set contains a cycle.
    pub fn resolve_installation_order(&self, selected: &BTreeSet<String>) -> Result<InstallationPlan> {
        if let Some(unknown) = selected.iter().find(|m| !self.graph.contains(m)) {
            return Err(module::not_found(unknown));
        }

        let working_set = self.graph.with_missing_dependencies(selected, self.installed);
        let modules = topological_sort(self.graph, &working_set)?;
        tracing::debug!(?modules, "resolved installation order");
        Ok(InstallationPlan { modules })
    }
}
