//! Per-module dependency graph: construction, cycles, rendering and order.
//!
//! # Overview
//!
//! Every module is processed on its own. Nothing in a [`DependencyGraph`]
//! points into another module; sockets stand in for whatever a composing
//! module will eventually plug in.
//!
//! ## Pipeline
//!
//! ```text
//! ModuleDeclaration
//!        ↓  build::DependencyGraph::build()
//! DependencyGraph (beans, sockets, virtual nested hops)
//!        ↓  cycles::find_cycles()
//! Vec<Cycle> ──non-empty──▶ diagram::render() per cycle → diagnostics
//!        ↓  empty
//! order::resolve() → instantiation order (reverse = destroy order)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use rime_core::graph::{DependencyGraph, find_cycles, render, resolve};
//!
//! let graph = DependencyGraph::build(&module);
//! let cycles = find_cycles(&graph);
//! if cycles.is_empty() {
//!     let order = resolve(&graph).unwrap_or_default();
//! } else {
//!     for cycle in &cycles {
//!         eprintln!("{}", render(cycle));
//!     }
//! }
//! ```

pub mod build;
pub mod cycles;
pub mod diagram;
pub mod order;

pub use build::{DependencyEdge, DependencyGraph, EdgeLabel, NESTED_LABEL, Node, VirtualNode};
pub use cycles::{Cycle, CycleStep, find_cycles, has_cycles};
pub use diagram::{cycle_diagnostics, render};
pub use order::{instantiation_order, resolve};
