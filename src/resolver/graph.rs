//! Module dependency graph
//!
//! Edges point from a dependent module to the module it requires:
//!
//! ```text
//! crm ──> employees
//! visits ──> crm, employees
//! ```
//!
//! Both directions are stored. Every edge is inserted into the forward and
//! reverse adjacency in the same call, so `b ∈ direct_dependencies(a)` holds
//! exactly when `a ∈ dependents(b)`.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::registry::ModuleRegistry;

static NO_MODULES: BTreeSet<String> = BTreeSet::new();

/// Adjacency-set dependency graph over module names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    forward: BTreeMap<String, BTreeSet<String>>,
    reverse: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph of every module in the registry
    pub fn from_registry(registry: &ModuleRegistry) -> Self {
        let mut graph = Self::new();
        for (name, module) in registry.list_modules() {
            graph.add_module(name);
            for dep in &module.dependencies {
                graph.add_edge(name, dep);
            }
        }
        graph
    }

    /// Register a node with no edges
    pub fn add_module(&mut self, name: &str) {
        self.forward.entry(name.to_string()).or_default();
        self.reverse.entry(name.to_string()).or_default();
    }

    /// Record that `dependent` requires `dependency`
    pub fn add_edge(&mut self, dependent: &str, dependency: &str) {
        self.add_module(dependent);
        self.add_module(dependency);
        self.forward
            .entry(dependent.to_string())
            .or_default()
            .insert(dependency.to_string());
        self.reverse
            .entry(dependency.to_string())
            .or_default()
            .insert(dependent.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.forward.contains_key(name)
    }

    /// All module names, sorted
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.forward.keys().map(String::as_str)
    }

    /// Exactly the declared dependencies of `module`
    pub fn direct_dependencies(&self, module: &str) -> &BTreeSet<String> {
        self.forward.get(module).unwrap_or(&NO_MODULES)
    }

    /// Every module that declares `module` as a direct dependency
    pub fn dependents(&self, module: &str) -> &BTreeSet<String> {
        self.reverse.get(module).unwrap_or(&NO_MODULES)
    }

    /// Everything `module` requires, directly or indirectly
    ///
    /// The module itself is only included when it sits on a cycle.
    pub fn transitive_dependencies(&self, module: &str) -> BTreeSet<String> {
        walk(&self.forward, module)
    }

    /// Everything that requires `module`, directly or indirectly
    pub fn transitive_dependents(&self, module: &str) -> BTreeSet<String> {
        walk(&self.reverse, module)
    }

    /// Selection expanded with every missing transitive dependency
    ///
    /// This is the explicit "add required modules" action; validation never
    /// applies it on its own.
    pub fn with_missing_dependencies(
        &self,
        selected: &BTreeSet<String>,
        installed: &BTreeSet<String>,
    ) -> BTreeSet<String> {
        let mut expanded = selected.clone();
        for module in selected {
            expanded.extend(
                self.transitive_dependencies(module)
                    .into_iter()
                    .filter(|dep| !installed.contains(dep)),
            );
        }
        expanded
    }
}

fn walk(adjacency: &BTreeMap<String, BTreeSet<String>>, start: &str) -> BTreeSet<String> {
    let mut seen = BTreeSet::new();
    let mut queue: VecDeque<&str> = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        for next in adjacency.get(current).into_iter().flatten() {
            if seen.insert(next.clone()) {
                queue.push_back(next);
            }
        }
    }
    seen
}
