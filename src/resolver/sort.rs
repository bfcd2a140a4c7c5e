//! Topological sort using Kahn's algorithm
//!
//! ## Algorithm
//!
//! 1. Count, for every node, how many of its dependencies are in the node set
//! 2. Seed the ready queue with every node whose count is zero
//! 3. Repeatedly emit the smallest ready node and decrement its dependents
//!
//! The ready queue is a `BTreeSet`, so among several ready nodes the
//! lexicographically smallest is always emitted first. Identical inputs give
//! identical orders.
//!
//! Nodes still holding a non-zero count when the queue drains sit on a cycle
//! or behind one; they are reported together instead of emitting a partial
//! order.

use std::collections::{BTreeMap, BTreeSet};

use super::graph::DependencyGraph;
use crate::error::{Result, deps};

/// Order `nodes` so that every in-set dependency precedes its dependents
///
/// Dependencies outside `nodes` are ignored.
///
/// # Errors
///
/// Returns `CircularDependency` naming every node that could not be ordered.
///
/// # Example
///
/// ```text
/// crm -> employees, visits -> crm, visits -> employees
///
/// Nodes:  {visits, crm, employees}
/// Result: [employees, crm, visits]
/// ```
pub fn topological_sort(graph: &DependencyGraph, nodes: &BTreeSet<String>) -> Result<Vec<String>> {
    let mut pending: BTreeMap<&str, usize> = nodes
        .iter()
        .map(|node| {
            let in_set = graph
                .direct_dependencies(node)
                .iter()
                .filter(|dep| nodes.contains(*dep))
                .count();
            (node.as_str(), in_set)
        })
        .collect();

    let mut ready: BTreeSet<&str> = pending
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(node, _)| *node)
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(node) = ready.pop_first() {
        pending.remove(node);
        order.push(node.to_string());

        for dependent in graph.dependents(node) {
            if let Some(count) = pending.get_mut(dependent.as_str()) {
                *count -= 1;
                if *count == 0 {
                    ready.insert(dependent.as_str());
                }
            }
        }
    }

    if !pending.is_empty() {
        let unresolved: Vec<String> = pending.keys().map(|n| (*n).to_string()).collect();
        tracing::debug!(?unresolved, "dependency cycle detected");
        return Err(deps::circular(unresolved));
    }

    Ok(order)
}
