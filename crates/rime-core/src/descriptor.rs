//! Summary of a resolved module handed to code generation.

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::graph::{DependencyGraph, Node};
use crate::model::{ModuleName, QualifiedName};

/// One wiring edge, `from` needs `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WiringEdge {
    pub from: QualifiedName,
    pub to: QualifiedName,
    pub label: String,
    pub nested: bool,
}

/// What code generation needs to emit a module, without the graph itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub module: ModuleName,
    pub version: u32,
    /// Beans in instantiation order. Sockets and virtual nodes are omitted.
    pub beans: Vec<QualifiedName>,
    pub required_sockets: Vec<QualifiedName>,
    pub optional_sockets: Vec<QualifiedName>,
    pub edges: Vec<WiringEdge>,
    /// `blake3:<hex>` over the edge list.
    pub content_hash: String,
}

impl ModuleDescriptor {
    /// Describe `graph` resolved in `order`.
    #[must_use]
    pub fn new(version: u32, graph: &DependencyGraph, order: &[NodeIndex]) -> Self {
        let beans = order
            .iter()
            .filter_map(|&idx| graph.node(idx))
            .filter_map(Node::as_bean)
            .map(|bean| bean.name.clone())
            .collect();

        let mut required_sockets = Vec::new();
        let mut optional_sockets = Vec::new();
        for node in graph.nodes() {
            if let Node::Socket(socket) = node {
                if socket.required {
                    required_sockets.push(socket.name.clone());
                } else {
                    optional_sockets.push(socket.name.clone());
                }
            }
        }

        let edges = graph
            .edges()
            .map(|edge| WiringEdge {
                from: edge.from.clone(),
                to: edge.to.clone(),
                label: edge.label.to_string(),
                nested: edge.nested,
            })
            .collect();

        Self {
            module: graph.module().clone(),
            version,
            beans,
            required_sockets,
            optional_sockets,
            edges,
            content_hash: graph.content_hash(),
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Whether a previously generated descriptor can be reused as is.
    #[must_use]
    pub fn is_unchanged_from(&self, previous: &Self) -> bool {
        self.module == previous.module && self.content_hash == previous.content_hash
    }
}
