//! Dependency resolution for modules
//!
//! This module handles:
//! - Building the dependency graph from the registry
//! - Validating that a selection carries its dependencies
//! - Topological sorting to determine installation order
//! - Circular dependency detection

pub mod graph;
pub mod planner;
pub mod sort;
pub mod validation;

pub use graph::DependencyGraph;
pub use planner::{InstallationPlan, Planner};
pub use sort::topological_sort;
pub use validation::{SelectionValidationResult, blocking_dependents, validate_selection};
