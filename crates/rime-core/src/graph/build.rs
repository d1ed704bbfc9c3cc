//! Dependency graph construction from a module's declarations.
//!
//! # Overview
//!
//! [`DependencyGraph::build`] turns one [`ModuleDeclaration`] into a
//! petgraph directed graph. Nodes are beans, sockets and synthetic virtual
//! nodes; an edge `A → B` means "A needs B", so B must be instantiated first.
//!
//! ## Insertion Order
//!
//! Beans are inserted first, in declaration order, then sockets, then any
//! virtual nodes as dependencies are walked. Edges are inserted in bean
//! declaration order and, within a bean, in dependency order. Both orders are
//! observable: node indices drive tie-breaking in the resolver, and edge
//! indices drive the order in which cycles are discovered and drawn.
//!
//! ## Nested Dependencies
//!
//! A nested dependency declared on bean `D` with target `T` and path
//! `[s1, s2]` produces:
//!
//! ```text
//! D ──label──▶ T.s1.s2 ──(nested)──▶ T.s1 ──(nested)──▶ T
//! ```
//!
//! Virtual nodes are created once and shared by every dependency that
//! navigates the same members, so each of them has exactly one outgoing
//! edge.
//!
//! ## Cache Invalidation
//!
//! [`DependencyGraph::content_hash`] is a BLAKE3 hash of the edge list in
//! insertion order. Code generation can compare it against the hash stored
//! with a previous descriptor to skip unchanged modules.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::{instrument, trace, warn};

use crate::model::{BeanDeclaration, ModuleDeclaration, ModuleName, QualifiedName, SocketDeclaration};

/// Label carried by the synthetic edges of a nested chain.
pub const NESTED_LABEL: &str = "(nested)";

// ---------------------------------------------------------------------------
// Nodes and edges
// ---------------------------------------------------------------------------

/// One hop of a nested dependency chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualNode {
    /// `<owner>.<path joined by dots>`.
    pub name: QualifiedName,
    /// The bean whose members are navigated.
    pub owner: QualifiedName,
    /// Member path from the owner to this hop.
    pub path: Vec<String>,
}

impl VirtualNode {
    /// Whether this is the hop directly attached to its owning bean.
    #[must_use]
    pub const fn is_first_hop(&self) -> bool {
        self.path.len() == 1
    }
}

/// A node of the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Bean(BeanDeclaration),
    Socket(SocketDeclaration),
    Virtual(VirtualNode),
}

impl Node {
    #[must_use]
    pub const fn name(&self) -> &QualifiedName {
        match self {
            Self::Bean(bean) => &bean.name,
            Self::Socket(socket) => &socket.name,
            Self::Virtual(node) => &node.name,
        }
    }

    #[must_use]
    pub const fn as_bean(&self) -> Option<&BeanDeclaration> {
        match self {
            Self::Bean(bean) => Some(bean),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        matches!(self, Self::Virtual(_))
    }

    #[must_use]
    pub const fn is_socket(&self) -> bool {
        matches!(self, Self::Socket(_))
    }

    /// Whether a cycle through this node gets its own diagnostic.
    ///
    /// Beans always do. Of a nested chain only the first hop does; deeper
    /// hops have no declaration site of their own.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        match self {
            Self::Bean(_) => true,
            Self::Socket(_) => false,
            Self::Virtual(node) => node.is_first_hop(),
        }
    }
}

/// Edge weight: the injection label and whether the edge is a nested hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLabel {
    pub label: String,
    pub nested: bool,
}

impl EdgeLabel {
    fn direct(label: &str) -> Self {
        Self {
            label: label.to_string(),
            nested: false,
        }
    }

    fn nested() -> Self {
        Self {
            label: NESTED_LABEL.to_string(),
            nested: true,
        }
    }
}

/// A borrowed view of one edge with its endpoint names resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyEdge<'a> {
    pub from: &'a QualifiedName,
    pub to: &'a QualifiedName,
    pub label: &'a str,
    pub nested: bool,
}

// ---------------------------------------------------------------------------
// DependencyGraph
// ---------------------------------------------------------------------------

/// The dependency graph of a single module.
///
/// Immutable once built; build a new one if declarations change. Nothing in
/// it refers to another module's graph.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    module: ModuleName,
    graph: DiGraph<Node, EdgeLabel>,
    node_map: HashMap<QualifiedName, NodeIndex>,
}

impl DependencyGraph {
    /// Build the graph for `module`.
    ///
    /// Never fails. A dependency whose target is neither a bean nor a
    /// socket of the module is skipped with a warning; callers that need the
    /// reference check run [`crate::validate::validate_module`] first.
    #[must_use]
    #[instrument(skip_all, fields(module = %module.name))]
    pub fn build(module: &ModuleDeclaration) -> Self {
        let node_count = module.beans.len() + module.sockets.len();
        let mut this = Self {
            module: module.name.clone(),
            graph: DiGraph::with_capacity(node_count, node_count),
            node_map: HashMap::with_capacity(node_count),
        };

        for bean in &module.beans {
            this.insert_node(Node::Bean(bean.clone()));
        }
        for socket in &module.sockets {
            this.insert_node(Node::Socket(socket.clone()));
        }

        for bean in &module.beans {
            let Some(from) = this.node_index(&bean.name) else {
                continue;
            };
            for dependency in &bean.dependencies {
                let Some(owner) = this.node_index(&dependency.target) else {
                    warn!(
                        bean = %bean.name,
                        target = %dependency.target,
                        "dependency target is not declared in module; edge skipped"
                    );
                    continue;
                };
                let to = if dependency.is_nested() {
                    this.insert_nested_chain(&dependency.target, owner, dependency.path())
                } else {
                    owner
                };
                this.graph.add_edge(from, to, EdgeLabel::direct(&dependency.label));
            }
        }

        trace!(
            nodes = this.node_count(),
            edges = this.edge_count(),
            "dependency graph built"
        );
        this
    }

    /// Insert the virtual nodes for `owner.path[..]`, returning the deepest.
    fn insert_nested_chain(
        &mut self,
        owner_name: &QualifiedName,
        owner: NodeIndex,
        path: &[String],
    ) -> NodeIndex {
        let mut parent = owner;
        for depth in 1..=path.len() {
            let name = owner_name.member(&path[..depth]);
            parent = if let Some(existing) = self.node_index(&name) {
                existing
            } else {
                let hop = self.insert_node(Node::Virtual(VirtualNode {
                    name,
                    owner: owner_name.clone(),
                    path: path[..depth].to_vec(),
                }));
                self.graph.add_edge(hop, parent, EdgeLabel::nested());
                hop
            };
        }
        parent
    }

    fn insert_node(&mut self, node: Node) -> NodeIndex {
        let name = node.name().clone();
        if let Some(existing) = self.node_map.get(&name) {
            warn!(node = %name, "duplicate declaration; keeping the first one");
            return *existing;
        }
        let idx = self.graph.add_node(node);
        self.node_map.insert(name, idx);
        idx
    }

    #[must_use]
    pub const fn module(&self) -> &ModuleName {
        &self.module
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for a qualified name.
    #[must_use]
    pub fn node_index(&self, name: &QualifiedName) -> Option<NodeIndex> {
        self.node_map.get(name).copied()
    }

    #[must_use]
    pub fn node(&self, idx: NodeIndex) -> Option<&Node> {
        self.graph.node_weight(idx)
    }

    #[must_use]
    pub fn node_by_name(&self, name: &QualifiedName) -> Option<&Node> {
        self.node_index(name).and_then(|idx| self.node(idx))
    }

    /// Node indices in insertion order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = DependencyEdge<'_>> {
        self.graph.edge_references().map(|edge| DependencyEdge {
            from: self.graph[edge.source()].name(),
            to: self.graph[edge.target()].name(),
            label: &edge.weight().label,
            nested: edge.weight().nested,
        })
    }

    /// Outgoing edges of `idx` in insertion order.
    ///
    /// petgraph walks adjacency lists newest-first, so the ids are sorted
    /// back into insertion order here.
    #[must_use]
    pub fn outgoing(&self, idx: NodeIndex) -> Vec<EdgeIndex> {
        let mut ids: Vec<EdgeIndex> = self.graph.edges(idx).map(|edge| edge.id()).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of edges pointing at `idx` (nodes that depend on it).
    #[must_use]
    pub fn incoming_count(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Incoming).count()
    }

    /// Sources of the edges pointing at `idx`, one entry per edge.
    pub fn dependents(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .map(|edge| edge.source())
    }

    /// Endpoints and weight of an edge.
    #[must_use]
    pub fn edge(&self, id: EdgeIndex) -> Option<(NodeIndex, NodeIndex, &EdgeLabel)> {
        let (from, to) = self.graph.edge_endpoints(id)?;
        Some((from, to, self.graph.edge_weight(id)?))
    }

    /// Borrow the underlying petgraph graph.
    #[must_use]
    pub const fn inner(&self) -> &DiGraph<Node, EdgeLabel> {
        &self.graph
    }

    /// BLAKE3 hash of the edge list, stable for identical declarations.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.module.as_str().as_bytes());
        hasher.update(b"\n");
        for edge in self.edges() {
            hasher.update(edge.from.to_string().as_bytes());
            hasher.update(b"\x00");
            hasher.update(edge.to.to_string().as_bytes());
            hasher.update(b"\x00");
            hasher.update(edge.label.as_bytes());
            hasher.update(if edge.nested { b"\x01" } else { b"\x00" });
        }
        format!("blake3:{}", hasher.finalize())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
