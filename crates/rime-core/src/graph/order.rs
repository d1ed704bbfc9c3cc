//! Deterministic dependency-first ordering.
//!
//! Kahn's algorithm over outgoing edges: a node becomes eligible once every
//! node it depends on has been emitted. Among eligible nodes the one inserted
//! first into the graph goes first, so the result depends only on declaration
//! order and never on hashing.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::graph::NodeIndex;

use super::build::DependencyGraph;
use crate::model::QualifiedName;

/// Compute the instantiation order of every node in `graph`.
///
/// Dependencies come before their dependents. Sockets and nodes without
/// dependencies are eligible immediately. Virtual nodes appear inline.
///
/// # Returns
///
/// The node indices in instantiation order, or `None` if the graph contains a
/// cycle. Run the cycle detector first to find out which.
#[must_use]
pub fn instantiation_order(graph: &DependencyGraph) -> Option<Vec<NodeIndex>> {
    let count = graph.node_count();

    // Outstanding dependency edges per node; parallel edges count twice.
    let mut pending: Vec<usize> = graph
        .node_indices()
        .map(|idx| graph.outgoing(idx).len())
        .collect();

    let mut ready: BinaryHeap<Reverse<NodeIndex>> = graph
        .node_indices()
        .filter(|idx| pending[idx.index()] == 0)
        .map(Reverse)
        .collect();

    let mut order = Vec::with_capacity(count);
    while let Some(Reverse(idx)) = ready.pop() {
        order.push(idx);
        for dependent in graph.dependents(idx) {
            let slot = &mut pending[dependent.index()];
            *slot -= 1;
            if *slot == 0 {
                ready.push(Reverse(dependent));
            }
        }
    }

    (order.len() == count).then_some(order)
}

/// Like [`instantiation_order`], resolved to node names.
#[must_use]
pub fn resolve(graph: &DependencyGraph) -> Option<Vec<QualifiedName>> {
    let order = instantiation_order(graph)?;
    Some(
        order
            .into_iter()
            .filter_map(|idx| graph.node(idx).map(|node| node.name().clone()))
            .collect(),
    )
}
