//! Cycles that cross a module boundary.
//!
//! The root graph sees a component bean as a socket, which has no outgoing
//! edges. The loop `root bean → component bean → component socket → root
//! bean bound to that socket` is therefore invisible to the root's own
//! resolution. [`boundary_cycles`] rebuilds the root with every used
//! component bean standing in as a node that depends on the root providers
//! bound to the sockets it reaches.

use std::collections::HashSet;

use rime_core::graph::{DependencyGraph, cycle_diagnostics, find_cycles};
use rime_core::{
    BeanDeclaration, CycleError, ModuleDeclaration, ModuleImport, QualifiedName,
};
use tracing::debug;

/// Root providers bound to the sockets `bean` of `component` reaches through
/// its dependencies, as `(socket local name, provider)` in socket declaration
/// order.
#[must_use]
pub fn bound_providers<'a>(
    import: &'a ModuleImport,
    component: &ModuleDeclaration,
    bean: &QualifiedName,
) -> Vec<(&'a str, &'a QualifiedName)> {
    let mut reached: HashSet<&QualifiedName> = HashSet::new();
    let mut stack = vec![bean];
    while let Some(name) = stack.pop() {
        if !reached.insert(name) {
            continue;
        }
        if let Some(declared) = component.bean(name) {
            stack.extend(declared.dependencies.iter().map(|dependency| &dependency.target));
        }
    }

    component
        .sockets
        .iter()
        .filter(|socket| reached.contains(&socket.name))
        .filter_map(|socket| {
            import
                .bindings
                .get_key_value(socket.name.local())
                .map(|(local, provider)| (local.as_str(), provider))
        })
        .collect()
}

/// Copy of `root` in which every component bean it depends on is declared
/// as a bean depending on its [`bound_providers`].
#[must_use]
pub fn boundary_view(
    root: &ModuleDeclaration,
    components: &[(&ModuleImport, &ModuleDeclaration)],
) -> ModuleDeclaration {
    let mut view = root.clone();
    let mut added: HashSet<&QualifiedName> = HashSet::new();

    for bean in &root.beans {
        for dependency in &bean.dependencies {
            let target = &dependency.target;
            if target.module() == &root.name || root.declares(target) || added.contains(target) {
                continue;
            }
            let Some((import, component)) = components
                .iter()
                .find(|(_, component)| &component.name == target.module())
            else {
                continue;
            };
            if component.bean(target).is_none() {
                continue;
            }

            let stand_in = bound_providers(import, component, target).into_iter().fold(
                BeanDeclaration::singleton(target.clone()),
                |stand_in, (socket, provider)| stand_in.depends_on(provider.clone(), socket),
            );
            view.beans.push(stand_in);
            added.insert(target);
        }
    }

    view
}

/// Check the root against the components it was resolved with.
///
/// Only diagnostics anchored in the root are kept; every cycle found here
/// runs through at least one root bean.
///
/// # Errors
///
/// Returns a [`CycleError`] for the root module if any cycle closes through
/// a component.
pub fn boundary_cycles(
    root: &ModuleDeclaration,
    components: &[(&ModuleImport, &ModuleDeclaration)],
) -> Result<(), CycleError> {
    if components.is_empty() {
        return Ok(());
    }

    let graph = DependencyGraph::build(&boundary_view(root, components));
    let cycles = find_cycles(&graph);
    if cycles.is_empty() {
        return Ok(());
    }

    debug!(cycles = cycles.len(), "cycle through component module");
    let diagnostics = cycle_diagnostics(&root.name, &cycles)
        .into_iter()
        .filter(|diagnostic| diagnostic.anchor.module() == &root.name)
        .collect();
    Err(CycleError {
        module: root.name.clone(),
        diagnostics,
    })
}
