//! Simple-cycle enumeration over a module's dependency graph.
//!
//! # Algorithm
//!
//! 1. Tarjan's SCC isolates the cyclic regions. Nodes outside a non-trivial
//!    SCC (or a self-loop) can't be on a cycle and are never searched, so an
//!    acyclic graph costs O(V+E).
//! 2. From every cyclic node, in insertion order, an iterative path-stack DFS
//!    follows outgoing edges in insertion order while staying inside the
//!    node's SCC. Reaching a node that is already on the stack records the
//!    stack slice from that node to the top as a cycle; the search does not
//!    continue past it.
//! 3. Once a start node is exhausted every cycle through it has been found,
//!    so later searches never enter it again.
//! 4. A cycle is identified by its `(node, label)` sequence rotated to start
//!    at the smallest node index, so the same loop reached from different
//!    entry points is reported once, in the rotation it was first discovered
//!    in.
//!
//! Parallel edges with different labels therefore give distinct cycles;
//! a dependency declared twice with the same label does not.

use std::collections::{HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{EdgeIndex, NodeIndex};
use tracing::debug;

use super::build::{DependencyGraph, EdgeLabel};
use crate::model::QualifiedName;

// ---------------------------------------------------------------------------
// Cycle
// ---------------------------------------------------------------------------

/// One hop of a cycle: a node and the edge leaving it toward the next node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleStep {
    pub node: QualifiedName,
    pub edge: EdgeLabel,
}

/// A simple cycle `n0 → n1 → … → n(k-1) → n0`.
///
/// `steps[i].edge` is the edge from `steps[i].node` to the next node; the
/// last step's edge closes the loop back to the first node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    steps: Vec<CycleStep>,
    reportable: Vec<QualifiedName>,
}

impl Cycle {
    /// Number of distinct nodes in the cycle.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn steps(&self) -> &[CycleStep] {
        &self.steps
    }

    /// Node names in traversal order, starting at the discovery point.
    pub fn nodes(&self) -> impl Iterator<Item = &QualifiedName> {
        self.steps.iter().map(|step| &step.node)
    }

    /// Nodes that receive their own diagnostic, in traversal order.
    #[must_use]
    pub fn reportable(&self) -> &[QualifiedName] {
        &self.reportable
    }

    /// Returns `true` if a single node depends on itself.
    #[must_use]
    pub const fn is_self_loop(&self) -> bool {
        self.steps.len() == 1
    }

    #[must_use]
    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.nodes().any(|node| node == name)
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Check whether the graph has any cycle at all.
///
/// Cheaper than [`find_cycles`] when only a yes/no answer is needed.
#[must_use]
pub fn has_cycles(graph: &DependencyGraph) -> bool {
    !cyclic_components(graph).is_empty()
}

/// Find every simple cycle in `graph`, in discovery order.
#[must_use]
pub fn find_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    let component_of = cyclic_components(graph);
    if component_of.is_empty() {
        return Vec::new();
    }

    let mut starts: Vec<NodeIndex> = component_of.keys().copied().collect();
    starts.sort_unstable();

    let mut search = CycleSearch {
        graph,
        component_of: &component_of,
        exhausted: HashSet::new(),
        seen: HashSet::new(),
        cycles: Vec::new(),
    };
    for start in starts {
        search.run_from(start);
        search.exhausted.insert(start);
    }

    debug!(
        module = %graph.module(),
        cycles = search.cycles.len(),
        "cycle detection finished"
    );
    search.cycles
}

/// Map every node on some cycle to the id of its SCC.
fn cyclic_components(graph: &DependencyGraph) -> HashMap<NodeIndex, usize> {
    let inner = graph.inner();
    let mut component_of = HashMap::new();

    for (id, component) in tarjan_scc(inner).into_iter().enumerate() {
        let cyclic = component.len() > 1
            || component
                .first()
                .is_some_and(|&node| inner.find_edge(node, node).is_some());
        if cyclic {
            for node in component {
                component_of.insert(node, id);
            }
        }
    }

    component_of
}

/// Iterative DFS frame: a node and a cursor into its outgoing edges.
struct Frame {
    node: NodeIndex,
    edges: Vec<EdgeIndex>,
    next: usize,
}

struct CycleSearch<'g> {
    graph: &'g DependencyGraph,
    component_of: &'g HashMap<NodeIndex, usize>,
    /// Start nodes whose cycles have all been found.
    exhausted: HashSet<NodeIndex>,
    /// Canonical keys of the cycles recorded so far.
    seen: HashSet<Vec<(NodeIndex, String)>>,
    cycles: Vec<Cycle>,
}

impl CycleSearch<'_> {
    fn run_from(&mut self, start: NodeIndex) {
        let mut stack: Vec<Frame> = vec![self.frame(start)];
        // Edge taken from stack[i] to stack[i + 1].
        let mut path: Vec<EdgeIndex> = Vec::new();
        let mut position: HashMap<NodeIndex, usize> = HashMap::from([(start, 0)]);

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.edges.len() {
                position.remove(&frame.node);
                stack.pop();
                path.pop();
                continue;
            }

            let edge = frame.edges[frame.next];
            frame.next += 1;
            let current = frame.node;

            let Some((_, target, _)) = self.graph.edge(edge) else {
                continue;
            };
            if self.component_of.get(&target) != self.component_of.get(&current)
                || self.exhausted.contains(&target)
            {
                continue;
            }

            if let Some(&at) = position.get(&target) {
                let mut edges = path[at..].to_vec();
                edges.push(edge);
                let nodes: Vec<NodeIndex> = stack[at..].iter().map(|f| f.node).collect();
                self.record(&nodes, &edges);
            } else {
                position.insert(target, stack.len());
                path.push(edge);
                stack.push(self.frame(target));
            }
        }
    }

    fn frame(&self, node: NodeIndex) -> Frame {
        Frame {
            node,
            edges: self.graph.outgoing(node),
            next: 0,
        }
    }

    fn record(&mut self, nodes: &[NodeIndex], edges: &[EdgeIndex]) {
        let key: Vec<(NodeIndex, String)> = nodes
            .iter()
            .zip(edges)
            .filter_map(|(&idx, &edge)| {
                self.graph
                    .edge(edge)
                    .map(|(_, _, label)| (idx, label.label.clone()))
            })
            .collect();
        if !self.seen.insert(canonical_rotation(key)) {
            return;
        }

        let mut steps = Vec::with_capacity(nodes.len());
        let mut reportable = Vec::new();
        for (&idx, &edge) in nodes.iter().zip(edges) {
            let (Some(node), Some((_, _, label))) = (self.graph.node(idx), self.graph.edge(edge))
            else {
                continue;
            };
            if node.is_reportable() {
                reportable.push(node.name().clone());
            }
            steps.push(CycleStep {
                node: node.name().clone(),
                edge: label.clone(),
            });
        }

        debug!(
            length = steps.len(),
            start = %steps.first().map(|s| s.node.to_string()).unwrap_or_default(),
            "cycle found"
        );
        self.cycles.push(Cycle { steps, reportable });
    }
}

/// Rotate a cycle key so the smallest node index comes first.
fn canonical_rotation(mut key: Vec<(NodeIndex, String)>) -> Vec<(NodeIndex, String)> {
    let pivot = key
        .iter()
        .enumerate()
        .min_by_key(|(_, (node, _))| *node)
        .map_or(0, |(i, _)| i);
    key.rotate_left(pivot);
    key
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
