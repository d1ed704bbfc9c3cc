//! Per-module resolution: validate, build, detect cycles, order.
//!
//! A module either resolves completely or fails with every problem found in
//! one pass. There is no partial result: a cyclic module never gets an
//! instantiation order.

use petgraph::graph::NodeIndex;
use tracing::{debug, info, instrument, trace, warn};

use crate::config::CompilerConfig;
use crate::descriptor::ModuleDescriptor;
use crate::error::{CycleError, ResolveError};
use crate::graph::{
    DependencyEdge, DependencyGraph, Node, cycle_diagnostics, find_cycles, instantiation_order,
};
use crate::model::{BeanDeclaration, ModuleDeclaration, ModuleName, QualifiedName};
use crate::validate::validate_module;

/// Resolves modules one at a time. Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: CompilerConfig,
}

impl Resolver {
    #[must_use]
    pub const fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Resolve one module.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::ForeignDeclaration`],
    ///   [`ResolveError::DuplicateDeclaration`] or
    ///   [`ResolveError::MalformedDeclaration`] if the declarations are
    ///   inconsistent.
    /// - [`ResolveError::Cycles`] with one diagnostic per reportable node of
    ///   every cycle if the graph is cyclic.
    #[instrument(skip_all, fields(module = %module.name))]
    pub fn resolve(&self, module: &ModuleDeclaration) -> Result<ResolvedModule, ResolveError> {
        validate_module(module)?;

        let graph = DependencyGraph::build(module);
        if self.config.debug {
            for edge in graph.edges() {
                debug!(
                    from = %edge.from,
                    to = %edge.to,
                    label = edge.label,
                    nested = edge.nested,
                    "edge"
                );
            }
        }

        let cycles = find_cycles(&graph);
        if !cycles.is_empty() {
            let diagnostics = cycle_diagnostics(&module.name, &cycles);
            warn!(
                cycles = cycles.len(),
                diagnostics = diagnostics.len(),
                "module has dependency cycles"
            );
            return Err(CycleError {
                module: module.name.clone(),
                diagnostics,
            }
            .into());
        }

        // Only reachable with a cycle, which find_cycles has just ruled out.
        let Some(order) = instantiation_order(&graph) else {
            return Err(CycleError {
                module: module.name.clone(),
                diagnostics: Vec::new(),
            }
            .into());
        };

        let descriptor = self
            .config
            .generate_descriptor
            .then(|| ModuleDescriptor::new(module.version, &graph, &order));

        let resolved = ResolvedModule {
            version: module.version,
            graph,
            order,
            descriptor,
        };

        if self.config.verbose {
            info!(
                beans = resolved.instantiation_order().count(),
                nodes = resolved.graph.node_count(),
                edges = resolved.graph.edge_count(),
                "module resolved"
            );
        } else {
            debug!(
                beans = resolved.instantiation_order().count(),
                nodes = resolved.graph.node_count(),
                edges = resolved.graph.edge_count(),
                "module resolved"
            );
        }
        trace!(order = ?resolved.order_names().collect::<Vec<_>>(), "instantiation order");

        Ok(resolved)
    }
}

/// Resolve `module` with default settings.
///
/// # Errors
///
/// See [`Resolver::resolve`].
pub fn resolve_module(module: &ModuleDeclaration) -> Result<ResolvedModule, ResolveError> {
    Resolver::default().resolve(module)
}

// ---------------------------------------------------------------------------
// ResolvedModule
// ---------------------------------------------------------------------------

/// A module whose graph is acyclic, with its instantiation order.
#[derive(Debug, Clone)]
pub struct ResolvedModule {
    version: u32,
    graph: DependencyGraph,
    order: Vec<NodeIndex>,
    descriptor: Option<ModuleDescriptor>,
}

impl ResolvedModule {
    #[must_use]
    pub const fn module(&self) -> &ModuleName {
        self.graph.module()
    }

    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    #[must_use]
    pub const fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Every node, sockets and virtual nodes included, dependencies first.
    pub fn order_names(&self) -> impl Iterator<Item = &QualifiedName> {
        self.order
            .iter()
            .filter_map(|&idx| self.graph.node(idx))
            .map(Node::name)
    }

    /// Full order as owned names.
    #[must_use]
    pub fn order(&self) -> Vec<QualifiedName> {
        self.order_names().cloned().collect()
    }

    /// Beans only, dependencies first.
    pub fn instantiation_order(&self) -> impl DoubleEndedIterator<Item = &BeanDeclaration> {
        self.order
            .iter()
            .filter_map(|&idx| self.graph.node(idx))
            .filter_map(Node::as_bean)
    }

    /// Beans only, dependents first.
    pub fn destroy_order(&self) -> impl Iterator<Item = &BeanDeclaration> {
        self.instantiation_order().rev()
    }

    #[must_use]
    pub fn bean(&self, name: &QualifiedName) -> Option<&BeanDeclaration> {
        self.graph.node_by_name(name).and_then(Node::as_bean)
    }

    /// Wiring edges in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = DependencyEdge<'_>> {
        self.graph.edges()
    }

    /// Present when descriptor generation is enabled.
    #[must_use]
    pub const fn descriptor(&self) -> Option<&ModuleDescriptor> {
        self.descriptor.as_ref()
    }
}
